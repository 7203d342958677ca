//! Restart test against PostgreSQL:
//! 1) Write a roster through one store.
//! 2) Drop it (simulated restart) and open a second store on the same sheet.
//! 3) Records, positions and the id counter survive; deletes shift rows.
//!
//! Skipped when DATABASE_URL is not set.

use chrono::NaiveDate;
use crew_roster::storage::roster::{IdentityScheme, RosterStore, RosterStoreOptions};
use crew_roster::{CrewDraft, CrewPatch, CrewStatus, PostgresSheet, RecordKey};
use std::env;
use std::sync::Arc;

fn draft(name: &str, contract_days: u32) -> CrewDraft {
    CrewDraft {
        name: name.to_string(),
        rank: "Master".to_string(),
        vessel: "Aurora".to_string(),
        sign_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        contract_days,
        status: CrewStatus::OnBoard,
    }
}

fn options() -> RosterStoreOptions {
    RosterStoreOptions {
        identity: IdentityScheme::Monotonic,
        extended_schema: true,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_roster_survives_restart() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(database_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping postgres roster test");
        return Ok(());
    };
    let sheet_name = "crew_roster_restart_test";

    // --- Phase A ---
    let sheet_a = PostgresSheet::connect(&database_url, sheet_name).await?;
    sheet_a.clear().await?;
    let store_a = RosterStore::new(Arc::new(sheet_a), options());
    let ana = store_a.append(draft("Ana", 90)).await?;
    let ben = store_a.append(draft("Ben", 60)).await?;
    store_a
        .update(
            &RecordKey::Id(ben.id),
            CrewPatch {
                status: Some(CrewStatus::OnLeave),
                ..CrewPatch::default()
            },
        )
        .await?;
    drop(store_a);

    // --- Phase B: fresh connection, no in-process state carried over ---
    let sheet_b = PostgresSheet::connect(&database_url, sheet_name).await?;
    let store_b = RosterStore::new(Arc::new(sheet_b), options());
    let snapshot = store_b.load().await?;
    assert!(snapshot.layout().has_relief_date());
    let records = snapshot.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].status, CrewStatus::OnLeave);

    let removed = store_b.remove(&RecordKey::Id(ana.id)).await?;
    assert_eq!(removed.row, 2);
    let snapshot = store_b.load().await?;
    assert_eq!(snapshot.position_of(ben.id)?.physical(), 2);

    // Deleted ids are not reissued.
    let carl = store_b.append(draft("Carl", 30)).await?;
    assert!(carl.id > ben.id);

    let report = store_b
        .sweep_statuses(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), 7)
        .await?;
    assert_eq!(report.changed(), 1);
    assert_eq!(report.changes[0].id, carl.id);
    assert_eq!(report.changes[0].to, CrewStatus::OverdueForRelief);

    Ok(())
}
