// src/bin/api_server.rs

use crew_roster::app::sweeper::PeriodicSweep;
use crew_roster::infra::config::AppConfig;
use crew_roster::infra::logging;
use crew_roster::transport;
use crew_roster::RosterService;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    // --- Configuration ---
    let config = AppConfig::from_env()?;
    tracing::info!(
        sheet = %config.sheet_name,
        warning_days = config.warning_days,
        identity = ?config.identity,
        extended_schema = config.extended_schema,
        "configuration loaded"
    );

    // --- Service Initialization ---
    let service = RosterService::from_config(&config).await?;
    // Fails fast on a sheet whose header cannot be mapped.
    let snapshot = service.store().load().await?;
    tracing::info!(
        records = snapshot.records().len(),
        rejected = snapshot.rejects().len(),
        "roster loaded"
    );
    let app_state = transport::http::AppState::new(service);

    let roster = app_state.roster.clone();

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("API server listening on http://{}", config.bind_addr);
    tracing::info!("Swagger UI available at /swagger-ui");

    let sweeper = config.sweep_interval.map(|period| {
        tracing::info!(every_secs = period.as_secs(), "periodic status sweep enabled");
        PeriodicSweep::start(roster, period)
    });

    let served = tokio::select! {
        result = axum::serve(listener, app) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received (Ctrl+C)");
            Ok(())
        }
    };

    // The sweep task is stopped on every exit path, including a server error.
    if let Some(sweeper) = sweeper {
        match sweeper.stop().await {
            Ok(runs) => tracing::info!(runs, "periodic status sweep stopped"),
            Err(e) => tracing::warn!(error = %e, "periodic sweep task did not stop cleanly"),
        }
    }
    served?;
    tracing::info!("graceful shutdown complete");

    Ok(())
}
