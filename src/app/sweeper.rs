//! Background status sweep on a fixed interval.

use crate::app::roster_service::RosterService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;

/// Handle to a running periodic sweep. Dropping it leaves the task running;
/// call [`PeriodicSweep::stop`] to end it.
pub struct PeriodicSweep {
    shutdown: Arc<Notify>,
    handle: JoinHandle<usize>,
}

impl PeriodicSweep {
    /// Sweeps immediately, then every `period`, until stopped.
    pub fn start(roster: Arc<Mutex<RosterService>>, period: Duration) -> Self {
        let shutdown = Arc::new(Notify::new());
        let stop = shutdown.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            let mut runs = 0usize;
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let roster = roster.lock().await;
                        match roster.sweep(None, None).await {
                            Ok(report) => tracing::info!(
                                changed = report.changed(),
                                skipped = report.skipped.len(),
                                "periodic status sweep finished"
                            ),
                            Err(e) => tracing::error!(error = %e, "periodic status sweep failed"),
                        }
                        runs += 1;
                    }
                    _ = stop.notified() => break,
                }
            }
            runs
        });
        Self { shutdown, handle }
    }

    /// Signals the task and waits for it. Returns how many sweeps ran.
    pub async fn stop(self) -> Result<usize, tokio::task::JoinError> {
        // `notify_one` keeps a permit, so a stop issued mid-sweep is not lost.
        self.shutdown.notify_one();
        self.handle.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crew::{CrewDraft, CrewStatus};
    use crate::storage::roster::{RosterStore, RosterStoreOptions};
    use crate::storage::sheet::MemorySheet;
    use chrono::{Days, Local};

    #[tokio::test]
    async fn sweeps_until_stopped() {
        let store = RosterStore::new(Arc::new(MemorySheet::new()), RosterStoreOptions::default());
        let service = RosterService::new(store, 7);
        // Relief date already passed relative to the local date.
        let sign_on = Local::now().date_naive().checked_sub_days(Days::new(40)).unwrap();
        service
            .add(CrewDraft {
                name: "Ana".to_string(),
                rank: "AB".to_string(),
                vessel: "Aurora".to_string(),
                sign_on,
                contract_days: 30,
                status: CrewStatus::OnBoard,
            })
            .await
            .unwrap();
        let roster = Arc::new(Mutex::new(service));

        let sweep = PeriodicSweep::start(roster.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        let runs = tokio::time::timeout(Duration::from_secs(5), sweep.stop())
            .await
            .expect("sweep task did not stop")
            .unwrap();
        assert!(runs >= 1);

        let records = roster.lock().await.store().list().await.unwrap();
        assert_eq!(records[0].status, CrewStatus::OverdueForRelief);
    }

    #[tokio::test]
    async fn stop_right_after_start_is_not_lost() {
        let store = RosterStore::new(Arc::new(MemorySheet::new()), RosterStoreOptions::default());
        let roster = Arc::new(Mutex::new(RosterService::new(store, 7)));
        let sweep = PeriodicSweep::start(roster, Duration::from_secs(3600));
        let stopped = tokio::time::timeout(Duration::from_secs(5), sweep.stop()).await;
        assert!(stopped.is_ok(), "sweep task did not stop");
    }
}
