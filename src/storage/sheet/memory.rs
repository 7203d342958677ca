//! In-process sheet. Used by tests and by the `memory` backend.

use crate::storage::sheet::{splice_cells, SheetBackend, SheetError};
use async_trait::async_trait;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<Vec<String>>,
    last_id: Option<i64>,
}

#[derive(Debug, Default)]
pub struct MemorySheet {
    state: Mutex<MemoryState>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet pre-filled with `rows` (header first).
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            state: Mutex::new(MemoryState { rows, last_id: None }),
        }
    }

    /// Copy of the current contents.
    pub async fn rows(&self) -> Vec<Vec<String>> {
        self.state.lock().await.rows.clone()
    }
}

fn row_index(row: u32, rows: usize) -> Result<usize, SheetError> {
    if row == 0 || row as usize > rows {
        return Err(SheetError::RowOutOfRange {
            row,
            rows: rows as u32,
        });
    }
    Ok(row as usize - 1)
}

#[async_trait]
impl SheetBackend for MemorySheet {
    async fn get_all_values(&self) -> Result<Vec<Vec<String>>, SheetError> {
        Ok(self.state.lock().await.rows.clone())
    }

    async fn append_row(&self, values: Vec<String>) -> Result<(), SheetError> {
        self.state.lock().await.rows.push(values);
        Ok(())
    }

    async fn update_cell(&self, row: u32, col: u32, value: String) -> Result<(), SheetError> {
        let mut state = self.state.lock().await;
        let idx = row_index(row, state.rows.len())?;
        splice_cells(&mut state.rows[idx], col, vec![value])
    }

    async fn update_row_range(
        &self,
        row: u32,
        start_col: u32,
        values: Vec<String>,
    ) -> Result<(), SheetError> {
        let mut state = self.state.lock().await;
        let idx = row_index(row, state.rows.len())?;
        splice_cells(&mut state.rows[idx], start_col, values)
    }

    async fn delete_row(&self, row: u32) -> Result<(), SheetError> {
        let mut state = self.state.lock().await;
        let idx = row_index(row, state.rows.len())?;
        state.rows.remove(idx);
        Ok(())
    }

    async fn allocate_id(&self, floor: i64) -> Result<i64, SheetError> {
        let mut state = self.state.lock().await;
        let id = match state.last_id {
            Some(last) => last
                .checked_add(1)
                .ok_or(SheetError::IdsExhausted { last })?
                .max(floor),
            None => floor,
        };
        state.last_id = Some(id);
        Ok(id)
    }
}
