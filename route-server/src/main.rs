use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use route_server::catalog::CatalogClient;
use route_server::planner::RoutePlanner;
use route_server::routing::RoutingClient;
use route_server::settings::Settings;
use route_server::telemetry::TelemetryClient;
use route_server::web::{AppState, create_router};

const DEFAULT_LOG_FILTER: &str = "route_server=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let catalog = CatalogClient::new(settings.catalog_config())?;
    let routing = RoutingClient::new(settings.routing_config())?;
    let telemetry = settings
        .telemetry_config()
        .map(TelemetryClient::new)
        .transpose()?;
    if telemetry.is_none() {
        info!("station telemetry not configured, workload uses baseline only");
    }

    let planner = RoutePlanner::new(catalog, routing, telemetry, settings.planner_config());
    let app = create_router(AppState::new(planner));

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    info!(addr = %settings.bind_addr, "route planner listening");
    info!("  GET  /health                         - Health check");
    info!("  GET  /api/v1/status                  - Server status");
    info!("  POST /api/v1/routes/build_routes     - Build routes");

    axum::serve(listener, app).await?;
    Ok(())
}
