use crew_roster::infra::config::{AppConfig, BackendKind};
use crew_roster::infra::logging;
use crew_roster::storage::roster::RosterSnapshot;
use crew_roster::RosterService;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--init-header-if-missing]\n\
         \n\
         Reads env vars:\n\
           ROSTER_BACKEND (memory|postgres), DATABASE_URL, ROSTER_SHEET,\n\
           ROSTER_WARNING_DAYS, ROSTER_ID_SCHEME, ROSTER_EXTENDED_SCHEMA\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let init_header_if_missing = args.iter().any(|a| a == "--init-header-if-missing");

    // Force-read config (nice error messages if anything is malformed)
    let config = AppConfig::from_env()?;

    println!("> Preflight:");
    match &config.backend {
        BackendKind::Memory => println!("  ROSTER_BACKEND=memory (nothing is persisted)"),
        BackendKind::Postgres { .. } => println!("  ROSTER_BACKEND=postgres"),
    }
    println!("  ROSTER_SHEET={}", config.sheet_name);
    println!("  ROSTER_WARNING_DAYS={}", config.warning_days);
    println!("  ROSTER_ID_SCHEME={:?}", config.identity);
    println!("  ROSTER_EXTENDED_SCHEMA={}", config.extended_schema);

    let service = RosterService::from_config(&config).await?;
    let sheet = service.store().sheet();

    // Basic connectivity
    sheet
        .ping()
        .await
        .map_err(|e| anyhow::anyhow!("Roster sheet is unreachable: {}", e))?;
    println!("  Backing store reachable.");

    let values = sheet.get_all_values().await?;
    let snapshot = if values.is_empty() {
        if !init_header_if_missing {
            return Err(anyhow::anyhow!(
                "Roster sheet is empty. Re-run with --init-header-if-missing"
            ));
        }
        println!("  Sheet empty -> writing default header...");
        service.store().load().await?
    } else {
        RosterSnapshot::from_values(values)
            .map_err(|e| anyhow::anyhow!("Roster header is not usable: {}", e))?
    };

    let layout = snapshot.layout();
    println!(
        "  Header OK: {} column(s), relief date column: {}",
        layout.width(),
        if layout.has_relief_date() { "yes" } else { "no" }
    );
    println!(
        "  Rows: {} record(s), {} undecodable",
        snapshot.records().len(),
        snapshot.rejects().len()
    );
    for reject in snapshot.rejects() {
        eprintln!(
            "  Warning: row {} cannot be decoded: {}",
            reject
                .row
                .map(|r| r.to_string())
                .unwrap_or_else(|| "?".to_string()),
            reject.reason
        );
    }

    println!("> Preflight OK.");
    Ok(())
}
