//! One-shot status sweep.
//!
//! Loads the configured roster, moves due and overdue crew to their relief
//! statuses, prints the changes and exits. Meant for cron-style scheduling
//! when the API server's periodic sweep is not enabled.

use chrono::NaiveDate;
use crew_roster::domain::crew::DATE_FORMAT;
use crew_roster::infra::logging;
use crew_roster::{AppConfig, RosterService};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin crew-roster -- [--today YYYY-MM-DD] [--warning-days N]\n\
         \n\
         Reads ROSTER_BACKEND, DATABASE_URL, ROSTER_SHEET, ROSTER_WARNING_DAYS,\n\
         ROSTER_ID_SCHEME and ROSTER_EXTENDED_SCHEMA from the environment (or .env).\n"
    );
    std::process::exit(2);
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let today = match flag_value(&args, "--today") {
        Some(v) => Some(
            NaiveDate::parse_from_str(v, DATE_FORMAT)
                .map_err(|e| anyhow::anyhow!("--today must be YYYY-MM-DD: {}", e))?,
        ),
        None => None,
    };
    let warning_days = match flag_value(&args, "--warning-days") {
        Some(v) => Some(
            v.parse::<u32>()
                .map_err(|e| anyhow::anyhow!("--warning-days must be a non-negative integer: {}", e))?,
        ),
        None => None,
    };

    let config = AppConfig::from_env()?;
    let service = RosterService::from_config(&config).await?;
    let report = service.sweep(today, warning_days).await?;

    if report.changes.is_empty() {
        println!("> No status changes.");
    }
    for change in &report.changes {
        println!(
            "> #{} {}: {} -> {} (relief {})",
            change.id, change.name, change.from, change.to, change.relief_date
        );
    }
    for skipped in &report.skipped {
        eprintln!(
            "> skipped row {}: {}",
            skipped
                .row
                .map(|r| r.to_string())
                .unwrap_or_else(|| "?".to_string()),
            skipped.reason
        );
    }
    println!("> {} record(s) updated.", report.changed());
    Ok(())
}
