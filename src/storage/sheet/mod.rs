//! Tabular backing store: one header row followed by data rows, addressed
//! with 1-based row/column coordinates like a spreadsheet.

use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::MemorySheet;
pub use postgres::PostgresSheet;

/// Failure of the backing store itself (connectivity, bad coordinates).
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("row {row} is out of range (sheet has {rows} rows)")]
    RowOutOfRange { row: u32, rows: u32 },

    #[error("column {col} is out of range")]
    ColumnOutOfRange { col: u32 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("backing store unavailable: {0}")]
    Unavailable(String),

    #[error("id counter exhausted after {last}")]
    IdsExhausted { last: i64 },
}

/// Operations the roster needs from a sheet.
///
/// Rows and columns are 1-based; row 1 is the header. Every call is a single
/// round trip and either fully applies or fails.
#[async_trait]
pub trait SheetBackend: Send + Sync {
    /// Every row, header included, as cell text.
    async fn get_all_values(&self) -> Result<Vec<Vec<String>>, SheetError>;

    /// Appends a row after the last one.
    async fn append_row(&self, values: Vec<String>) -> Result<(), SheetError>;

    async fn update_cell(&self, row: u32, col: u32, value: String) -> Result<(), SheetError>;

    /// Overwrites `values.len()` cells of `row` starting at `start_col` in one
    /// atomic write.
    async fn update_row_range(
        &self,
        row: u32,
        start_col: u32,
        values: Vec<String>,
    ) -> Result<(), SheetError>;

    /// Removes `row`; every following row moves up by one.
    async fn delete_row(&self, row: u32) -> Result<(), SheetError>;

    /// Issues an identity that is at least `floor` and has never been issued
    /// by this sheet before.
    async fn allocate_id(&self, floor: i64) -> Result<i64, SheetError>;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), SheetError> {
        self.get_all_values().await.map(|_| ())
    }
}

/// Writes `values` into `row` starting at 1-based `start_col`, padding with
/// empty cells when the row is shorter.
pub(crate) fn splice_cells(row: &mut Vec<String>, start_col: u32, values: Vec<String>) -> Result<(), SheetError> {
    if start_col == 0 {
        return Err(SheetError::ColumnOutOfRange { col: start_col });
    }
    let start = (start_col - 1) as usize;
    let end = start + values.len();
    if row.len() < end {
        row.resize(end, String::new());
    }
    for (cell, value) in row[start..end].iter_mut().zip(values) {
        *cell = value;
    }
    Ok(())
}
