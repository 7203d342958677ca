//! The roster service.
//!
//! Sits between the transports (HTTP, CLI) and the roster store:
//! 1.  Every call reloads the roster from the sheet.
//! 2.  Writes go through validation and key resolution in the store.
//! 3.  The status sweep and the calendar/timeline views are built on the
//!     freshly loaded records.

use crate::domain::crew::{CrewDraft, CrewPatch, CrewRecord, RecordKey};
use crate::domain::status::{SkippedRecord, SweepReport};
use crate::domain::views::{self, CalendarEvent, FilterOptions, RosterFilter, TimelineBar};
use crate::error::{RosterError, RosterResult};
use crate::infra::config::{AppConfig, BackendKind};
use crate::storage::roster::{RemovedRow, RosterStore, RosterStoreOptions};
use crate::storage::sheet::{MemorySheet, PostgresSheet, SheetBackend};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// A listed record with its current sheet position.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub record: CrewRecord,
    /// Physical sheet row at load time.
    pub row: u32,
    #[schema(value_type = Option<String>, format = Date)]
    pub relief_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RosterListing {
    pub entries: Vec<RosterEntry>,
    /// Rows present in the sheet that could not be decoded.
    pub rejected: Vec<SkippedRecord>,
}

pub struct RosterService {
    store: RosterStore,
    warning_days: u32,
}

impl RosterService {
    pub fn new(store: RosterStore, warning_days: u32) -> Self {
        Self {
            store,
            warning_days,
        }
    }

    /// Builds the backing sheet selected by `config` and wraps it.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let sheet: Arc<dyn SheetBackend> = match &config.backend {
            BackendKind::Memory => {
                tracing::info!("using in-memory roster sheet (data is not persisted)");
                Arc::new(MemorySheet::new())
            }
            BackendKind::Postgres { database_url } => {
                tracing::info!(sheet = %config.sheet_name, "connecting to postgres roster sheet");
                Arc::new(PostgresSheet::connect(database_url, &config.sheet_name).await?)
            }
        };
        let options = RosterStoreOptions {
            identity: config.identity,
            extended_schema: config.extended_schema,
        };
        Ok(Self::new(RosterStore::new(sheet, options), config.warning_days))
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    pub fn warning_days(&self) -> u32 {
        self.warning_days
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub async fn list(&self, filter: &RosterFilter) -> RosterResult<RosterListing> {
        let snapshot = self.store.load().await?;
        let matches = filter.matcher().map_err(RosterError::Filter)?;

        let entries = snapshot
            .rows()
            .iter()
            .filter_map(|row| {
                let record = row.record.as_ref().ok()?;
                Some(RosterEntry {
                    record: record.clone(),
                    row: row.position.physical(),
                    relief_date: record.relief_date(),
                })
            })
            .filter(|e| matches(&e.record))
            .collect();

        Ok(RosterListing {
            entries,
            rejected: snapshot.rejects(),
        })
    }

    pub async fn add(&self, draft: CrewDraft) -> RosterResult<CrewRecord> {
        self.store.append(draft).await
    }

    pub async fn update(&self, key: &RecordKey, patch: CrewPatch) -> RosterResult<CrewRecord> {
        self.store.update(key, patch).await
    }

    pub async fn remove(&self, key: &RecordKey) -> RosterResult<RemovedRow> {
        self.store.remove(key).await
    }

    /// One record with its current position.
    pub async fn get(&self, key: &RecordKey) -> RosterResult<RosterEntry> {
        let snapshot = self.store.load().await?;
        let row = snapshot.resolve(key)?;
        let record = row.decoded()?;
        Ok(RosterEntry {
            record: record.clone(),
            row: row.position.physical(),
            relief_date: record.relief_date(),
        })
    }

    /// Runs the status sweep. `today` defaults to the local date and the
    /// warning window to the configured one.
    pub async fn sweep(
        &self,
        today: Option<NaiveDate>,
        warning_days: Option<u32>,
    ) -> RosterResult<SweepReport> {
        let today = today.unwrap_or_else(Self::today);
        let warning_days = warning_days.unwrap_or(self.warning_days);
        self.store.sweep_statuses(today, warning_days).await
    }

    pub async fn filter_options(&self) -> RosterResult<FilterOptions> {
        Ok(views::filter_options(&self.store.list().await?))
    }

    pub async fn calendar(&self, filter: &RosterFilter) -> RosterResult<Vec<CalendarEvent>> {
        let records = self.store.list().await?;
        let selected = filter.apply(&records).map_err(RosterError::Filter)?;
        Ok(views::calendar_events(selected))
    }

    pub async fn timeline(&self, filter: &RosterFilter) -> RosterResult<Vec<TimelineBar>> {
        let records = self.store.list().await?;
        let selected = filter.apply(&records).map_err(RosterError::Filter)?;
        Ok(views::timeline(selected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crew::{CrewId, CrewStatus};
    use crate::storage::roster::IdentityScheme;

    fn service() -> RosterService {
        let store = RosterStore::new(
            Arc::new(MemorySheet::new()),
            RosterStoreOptions {
                identity: IdentityScheme::Monotonic,
                extended_schema: false,
            },
        );
        RosterService::new(store, 7)
    }

    fn draft(name: &str, vessel: &str, status: CrewStatus) -> CrewDraft {
        CrewDraft {
            name: name.to_string(),
            rank: "Bosun".to_string(),
            vessel: vessel.to_string(),
            sign_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            contract_days: 90,
            status,
        }
    }

    #[tokio::test]
    async fn list_filters_and_reports_rows() {
        let svc = service();
        svc.add(draft("Ana", "Aurora", CrewStatus::OnBoard)).await.unwrap();
        svc.add(draft("Ben", "Nordic Star", CrewStatus::OnLeave)).await.unwrap();

        let all = svc.list(&RosterFilter::default()).await.unwrap();
        assert_eq!(all.entries.len(), 2);
        assert_eq!(all.entries[1].row, 3);

        let filter = RosterFilter::from_selection(Some("Nordic Star"), Some(CrewStatus::OnLeave));
        let hits = svc.list(&filter).await.unwrap();
        assert_eq!(hits.entries.len(), 1);
        assert_eq!(hits.entries[0].record.name, "Ben");
    }

    #[tokio::test]
    async fn bad_status_filter_is_rejected() {
        let svc = service();
        let filter = RosterFilter {
            vessel: None,
            status: Some("Sleeping".to_string()),
        };
        assert!(matches!(svc.list(&filter).await, Err(RosterError::Filter(_))));
    }

    #[tokio::test]
    async fn sweep_uses_configured_window_by_default() {
        let svc = service();
        svc.add(draft("Ana", "Aurora", CrewStatus::OnBoard)).await.unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 25);

        let report = svc.sweep(today, None).await.unwrap();
        assert_eq!(report.changed(), 1);
        assert_eq!(report.changes[0].id, CrewId(1));
        assert_eq!(report.changes[0].to, CrewStatus::DueForRelief);
    }

    #[tokio::test]
    async fn calendar_follows_filter() {
        let svc = service();
        svc.add(draft("Ana", "Aurora", CrewStatus::OnBoard)).await.unwrap();
        svc.add(draft("Ben", "Nordic Star", CrewStatus::OnBoard)).await.unwrap();

        let filter = RosterFilter::from_selection(Some("Aurora"), None);
        let events = svc.calendar(&filter).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Ana");
        assert_eq!(events[0].end, "2024-03-31");

        let bars = svc.timeline(&RosterFilter::default()).await.unwrap();
        assert_eq!(bars.len(), 2);
    }

    #[tokio::test]
    async fn get_reports_current_row() {
        let svc = service();
        let ana = svc.add(draft("Ana", "Aurora", CrewStatus::OnBoard)).await.unwrap();
        let ben = svc.add(draft("Ben", "Aurora", CrewStatus::OnBoard)).await.unwrap();
        assert_eq!(svc.get(&RecordKey::Id(ben.id)).await.unwrap().row, 3);

        svc.remove(&RecordKey::Id(ana.id)).await.unwrap();
        let entry = svc.get(&RecordKey::Id(ben.id)).await.unwrap();
        assert_eq!(entry.row, 2);
        assert_eq!(entry.relief_date, NaiveDate::from_ymd_opt(2024, 3, 31));
    }
}
