//! Roster store adapter: crew records on top of a [`SheetBackend`].
//!
//! Every operation starts from a fresh full read, so a key is always
//! resolved against the sheet as it is right before the write.

use crate::domain::crew::{
    validate_draft, CrewDraft, CrewId, CrewPatch, CrewRecord, CrewStatus, RecordKey,
};
use crate::domain::status::{derive_statuses, SweepReport};
use crate::error::{RosterError, RosterResult};
use crate::storage::roster::layout::{Column, SheetLayout};
use crate::storage::roster::snapshot::RosterSnapshot;
use crate::storage::sheet::SheetBackend;
use chrono::NaiveDate;
use std::sync::Arc;

/// How new identities are chosen on append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityScheme {
    /// Counter persisted by the sheet; ids are never reused.
    #[default]
    Monotonic,
    /// Current row count including the header. Compatible with sheets kept
    /// by the legacy tool, but can repeat ids after deletions.
    RowCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RosterStoreOptions {
    pub identity: IdentityScheme,
    /// Header written to an empty sheet includes `Expected Relief Date`.
    pub extended_schema: bool,
}

/// What a delete removed.
#[derive(Debug, Clone)]
pub struct RemovedRow {
    pub row: u32,
    pub id: Option<CrewId>,
    pub record: Option<CrewRecord>,
}

pub struct RosterStore {
    sheet: Arc<dyn SheetBackend>,
    options: RosterStoreOptions,
}

impl RosterStore {
    pub fn new(sheet: Arc<dyn SheetBackend>, options: RosterStoreOptions) -> Self {
        Self { sheet, options }
    }

    pub fn sheet(&self) -> &Arc<dyn SheetBackend> {
        &self.sheet
    }

    pub fn options(&self) -> RosterStoreOptions {
        self.options
    }

    /// Full read of the sheet. Writes the default header first if the sheet
    /// is completely empty.
    pub async fn load(&self) -> RosterResult<RosterSnapshot> {
        let mut values = self.sheet.get_all_values().await?;
        if values.is_empty() {
            let header = SheetLayout::default_header(self.options.extended_schema);
            tracing::info!(columns = header.len(), "initialising empty roster sheet with header");
            self.sheet.append_row(header.clone()).await?;
            values.push(header);
        }
        RosterSnapshot::from_values(values)
    }

    /// Decoded records in store order.
    pub async fn list(&self) -> RosterResult<Vec<CrewRecord>> {
        Ok(self.load().await?.records())
    }

    async fn next_id(&self, snapshot: &RosterSnapshot) -> RosterResult<CrewId> {
        match self.options.identity {
            IdentityScheme::Monotonic => {
                let floor = match snapshot.max_id() {
                    None => 1,
                    Some(max) => max.0.checked_add(1).ok_or_else(|| {
                        RosterError::Layout(format!("id {} leaves no room for a new id", max))
                    })?,
                };
                Ok(CrewId(self.sheet.allocate_id(floor).await?))
            }
            IdentityScheme::RowCount => Ok(CrewId(snapshot.total_rows() as i64)),
        }
    }

    /// Validates `draft` and appends it as a new row.
    pub async fn append(&self, draft: CrewDraft) -> RosterResult<CrewRecord> {
        validate_draft(&draft)?;
        let snapshot = self.load().await?;
        let id = self.next_id(&snapshot).await?;
        let record = CrewRecord::from_draft(id, draft);
        let row = snapshot.layout().encode(&record, &[]);
        self.sheet.append_row(row).await?;
        tracing::info!(id = %record.id, name = %record.name, vessel = %record.vessel, "crew record appended");
        Ok(record)
    }

    /// Applies `patch` to the record addressed by `key` and rewrites every
    /// non-identity column of its row in a single write.
    pub async fn update(&self, key: &RecordKey, patch: CrewPatch) -> RosterResult<CrewRecord> {
        let snapshot = self.load().await?;
        let row = snapshot.resolve(key)?;
        let current = row.decoded()?;

        let draft = patch.apply_to(current.to_draft());
        validate_draft(&draft)?;
        let updated = CrewRecord::from_draft(current.id, draft);

        let cells = snapshot.layout().encode(&updated, &row.cells);
        // Identity is always column 1.
        let tail: Vec<String> = cells.into_iter().skip(1).collect();
        self.sheet
            .update_row_range(row.position.physical(), 2, tail)
            .await?;
        tracing::info!(id = %updated.id, row = row.position.physical(), "crew record updated");
        Ok(updated)
    }

    /// Deletes the row addressed by `key`. Every later row moves up by one.
    pub async fn remove(&self, key: &RecordKey) -> RosterResult<RemovedRow> {
        let snapshot = self.load().await?;
        let row = snapshot.resolve(key)?;
        let physical = row.position.physical();
        self.sheet.delete_row(physical).await?;
        tracing::info!(row = physical, key = %key, "crew record deleted");
        Ok(RemovedRow {
            row: physical,
            id: row.id,
            record: row.record.as_ref().ok().cloned(),
        })
    }

    /// Runs the status sweep and writes only the status cells that changed.
    pub async fn sweep_statuses(&self, today: NaiveDate, warning_days: u32) -> RosterResult<SweepReport> {
        let snapshot = self.load().await?;
        let status_col = snapshot
            .layout()
            .sheet_col(Column::Status)
            .ok_or_else(|| RosterError::Layout("missing 'Status' column".to_string()))?;

        let decoded: Vec<_> = snapshot
            .rows()
            .iter()
            .filter_map(|r| r.record.as_ref().ok().map(|rec| (r.position, rec.clone())))
            .collect();
        let before: Vec<CrewStatus> = decoded.iter().map(|(_, rec)| rec.status).collect();
        let mut records: Vec<CrewRecord> = decoded.iter().map(|(_, rec)| rec.clone()).collect();

        let mut report = derive_statuses(&mut records, today, warning_days);

        for (((position, _), old), record) in decoded.iter().zip(&before).zip(&records) {
            if record.status != *old {
                self.sheet
                    .update_cell(position.physical(), status_col, record.status.as_sheet_str().to_string())
                    .await?;
            }
        }

        let mut rejects = snapshot.rejects();
        for skipped in &rejects {
            tracing::warn!(row = ?skipped.row, reason = %skipped.reason, "row skipped by status sweep");
        }
        rejects.append(&mut report.skipped);
        report.skipped = rejects;

        tracing::info!(
            %today,
            warning_days,
            changed = report.changed(),
            skipped = report.skipped.len(),
            "status sweep finished"
        );
        Ok(report)
    }
}
