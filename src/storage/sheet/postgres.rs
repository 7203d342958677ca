//! Sheet persisted in PostgreSQL.
//!
//! Each sheet row is one `sheet_rows` row keyed by `(sheet_name, row_index)`
//! with its cells in a `TEXT[]`. Row indexes are kept dense (1..=n) so that
//! physical positions behave like a spreadsheet's.

use crate::storage::sheet::{splice_cells, SheetBackend, SheetError};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

/// A sheet stored in a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresSheet {
    pool: PgPool,
    sheet_name: String,
}

impl PostgresSheet {
    /// Connects to `database_url` and creates the backing tables if needed.
    pub async fn connect(database_url: &str, sheet_name: &str) -> Result<Self, SheetError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Self::new_with_pool(pool, sheet_name).await
    }

    pub async fn new_with_pool(pool: PgPool, sheet_name: &str) -> Result<Self, SheetError> {
        // Deferred so the row shift in `delete_row` can pass through
        // temporarily duplicated indexes.
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS sheet_rows (
                sheet_name TEXT NOT NULL,
                row_index BIGINT NOT NULL,
                cells TEXT[] NOT NULL,
                PRIMARY KEY (sheet_name, row_index) DEFERRABLE INITIALLY DEFERRED
            )",
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS sheet_counters (
                sheet_name TEXT PRIMARY KEY,
                last_id BIGINT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self {
            pool,
            sheet_name: sheet_name.to_string(),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Removes every row and the id counter of this sheet.
    pub async fn clear(&self) -> Result<(), SheetError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM sheet_rows WHERE sheet_name = $1")
            .bind(&self.sheet_name)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM sheet_counters WHERE sheet_name = $1")
            .bind(&self.sheet_name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn row_count(&self, tx: &mut sqlx::Transaction<'_, sqlx::Postgres>) -> Result<u32, SheetError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sheet_rows WHERE sheet_name = $1")
            .bind(&self.sheet_name)
            .fetch_one(&mut **tx)
            .await?;
        Ok(count as u32)
    }

    /// Read-modify-write of one row inside a single transaction.
    async fn splice_row(&self, row: u32, start_col: u32, values: Vec<String>) -> Result<(), SheetError> {
        let mut tx = self.pool.begin().await?;
        let existing = sqlx::query(
            "SELECT cells FROM sheet_rows WHERE sheet_name = $1 AND row_index = $2 FOR UPDATE",
        )
        .bind(&self.sheet_name)
        .bind(i64::from(row))
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            let rows = self.row_count(&mut tx).await?;
            return Err(SheetError::RowOutOfRange { row, rows });
        };
        let mut cells: Vec<String> = existing.try_get("cells")?;
        splice_cells(&mut cells, start_col, values)?;

        sqlx::query("UPDATE sheet_rows SET cells = $3 WHERE sheet_name = $1 AND row_index = $2")
            .bind(&self.sheet_name)
            .bind(i64::from(row))
            .bind(&cells)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl SheetBackend for PostgresSheet {
    async fn get_all_values(&self) -> Result<Vec<Vec<String>>, SheetError> {
        let rows = sqlx::query("SELECT cells FROM sheet_rows WHERE sheet_name = $1 ORDER BY row_index")
            .bind(&self.sheet_name)
            .fetch_all(&self.pool)
            .await?;
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            values.push(row.try_get::<Vec<String>, _>("cells")?);
        }
        Ok(values)
    }

    async fn append_row(&self, values: Vec<String>) -> Result<(), SheetError> {
        let mut tx = self.pool.begin().await?;
        // Serialize appends per sheet so two writers cannot pick the same index.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&self.sheet_name)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO sheet_rows (sheet_name, row_index, cells)
             SELECT $1, COALESCE(MAX(row_index), 0) + 1, $2 FROM sheet_rows WHERE sheet_name = $1",
        )
        .bind(&self.sheet_name)
        .bind(&values)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_cell(&self, row: u32, col: u32, value: String) -> Result<(), SheetError> {
        self.splice_row(row, col, vec![value]).await
    }

    async fn update_row_range(
        &self,
        row: u32,
        start_col: u32,
        values: Vec<String>,
    ) -> Result<(), SheetError> {
        self.splice_row(row, start_col, values).await
    }

    async fn delete_row(&self, row: u32) -> Result<(), SheetError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&self.sheet_name)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM sheet_rows WHERE sheet_name = $1 AND row_index = $2")
            .bind(&self.sheet_name)
            .bind(i64::from(row))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            let rows = self.row_count(&mut tx).await?;
            return Err(SheetError::RowOutOfRange { row, rows });
        }
        sqlx::query(
            "UPDATE sheet_rows SET row_index = row_index - 1 WHERE sheet_name = $1 AND row_index > $2",
        )
        .bind(&self.sheet_name)
        .bind(i64::from(row))
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn allocate_id(&self, floor: i64) -> Result<i64, SheetError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO sheet_counters (sheet_name, last_id) VALUES ($1, $2)
             ON CONFLICT (sheet_name) DO UPDATE
             SET last_id = GREATEST(sheet_counters.last_id + 1, $2)
             RETURNING last_id",
        )
        .bind(&self.sheet_name)
        .bind(floor)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn ping(&self) -> Result<(), SheetError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
