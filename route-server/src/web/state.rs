//! Application state for the web layer.

use std::sync::Arc;
use std::time::Instant;

use crate::catalog::CatalogClient;
use crate::planner::RoutePlanner;
use crate::routing::RoutingClient;
use crate::telemetry::TelemetryClient;

/// The planner wired to the live provider clients.
pub type Planner = RoutePlanner<CatalogClient, RoutingClient, TelemetryClient>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Route planner, shared by every request
    pub planner: Arc<Planner>,

    /// When the server started, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create a new app state.
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(planner),
            started_at: Instant::now(),
        }
    }
}
