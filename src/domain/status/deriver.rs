//! Date-driven relief status derivation.
//!
//! For a record that is currently `OnBoard`:
//! - relief date before `today` -> `OverdueForRelief`
//! - relief date within `[today, today + warning_days]` -> `DueForRelief`
//! - otherwise the status is left alone.
//!
//! Any other status is never touched. Leaving `OnBoard` is one-way: a later
//! edit that moves the relief date back out of the window does not restore it.

use crate::domain::crew::{CrewId, CrewRecord, CrewStatus};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// Default warning window, in days.
pub const DEFAULT_WARNING_DAYS: u32 = 7;

/// One status transition produced by a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusChange {
    pub id: CrewId,
    pub name: String,
    pub from: CrewStatus,
    pub to: CrewStatus,
    #[schema(value_type = String, format = Date)]
    pub relief_date: NaiveDate,
}

/// A record the sweep could not evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SkippedRecord {
    /// Physical sheet row when known (rows that failed to decode), else `None`.
    pub row: Option<u32>,
    pub id: Option<CrewId>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SweepReport {
    pub changes: Vec<StatusChange>,
    pub skipped: Vec<SkippedRecord>,
}

impl SweepReport {
    pub fn changed(&self) -> usize {
        self.changes.len()
    }
}

/// Status `record` should move to, or `None` when it stays as it is.
///
/// `Err` carries the reason the record cannot be evaluated.
pub fn derive_status(
    record: &CrewRecord,
    today: NaiveDate,
    warning_days: u32,
) -> Result<Option<CrewStatus>, String> {
    if record.status != CrewStatus::OnBoard {
        return Ok(None);
    }
    let relief = record.relief_date().ok_or_else(|| {
        format!(
            "relief date out of range (sign-on {} + {} days)",
            record.sign_on, record.contract_days
        )
    })?;

    if relief < today {
        return Ok(Some(CrewStatus::OverdueForRelief));
    }
    let remaining = (relief - today).num_days();
    if remaining <= i64::from(warning_days) {
        Ok(Some(CrewStatus::DueForRelief))
    } else {
        Ok(None)
    }
}

/// Applies [`derive_status`] to every record in place.
///
/// Records that cannot be evaluated are logged and reported, never aborting
/// the sweep.
pub fn derive_statuses(
    records: &mut [CrewRecord],
    today: NaiveDate,
    warning_days: u32,
) -> SweepReport {
    let mut report = SweepReport::default();

    for record in records.iter_mut() {
        match derive_status(record, today, warning_days) {
            Ok(Some(next)) => {
                // derive_status only yields a transition when the relief date exists.
                let Some(relief_date) = record.relief_date() else {
                    continue;
                };
                tracing::debug!(id = %record.id, from = %record.status, to = %next, "status transition");
                report.changes.push(StatusChange {
                    id: record.id,
                    name: record.name.clone(),
                    from: record.status,
                    to: next,
                    relief_date,
                });
                record.status = next;
            }
            Ok(None) => {}
            Err(reason) => {
                tracing::warn!(id = %record.id, %reason, "skipping record in status sweep");
                report.skipped.push(SkippedRecord {
                    row: None,
                    id: Some(record.id),
                    reason,
                });
            }
        }
    }

    report
}
