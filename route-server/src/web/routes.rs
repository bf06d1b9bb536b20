//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::domain::SelectionResult;

use super::dto::*;
use super::state::AppState;

const ENDPOINTS: [&str; 4] = [
    "GET /health",
    "GET /api/v1/status",
    "POST /api/v1/routes/build_routes",
    "GET /",
];

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/v1/status", get(status))
        .route("/api/v1/routes/build_routes", post(build_routes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Public transport route planner".to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

/// Build the fastest, balanced and least crowded routes.
async fn build_routes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SelectionResult>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: BuildRoutesRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid build_routes request");
        AppError::BadRequest {
            message: format!("Invalid request: {e}"),
        }
    })?;

    if req.transport_type != "public_transport" {
        debug!(transport_type = %req.transport_type, "ignoring transport type, planning public transport");
    }

    let outcome = state.planner.plan(req.start, req.end).await;

    if outcome.stats.upstream_failed() {
        return Err(AppError::BadGateway {
            message: "Route providers are unavailable".to_string(),
        });
    }

    Ok(Json(outcome.selection))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    BadGateway { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
