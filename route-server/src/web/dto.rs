//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::Coordinate;

fn default_transport_type() -> String {
    "public_transport".to_string()
}

/// Request to build routes between two points.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildRoutesRequest {
    pub start: Coordinate,
    pub end: Coordinate,

    /// Accepted for compatibility; only public transport is planned.
    #[serde(default = "default_transport_type")]
    pub transport_type: String,
}

/// Service banner.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub endpoints: Vec<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,

    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Server status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,

    /// Seconds since startup
    pub uptime: f64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn build_routes_request_defaults_transport_type() {
        let req: BuildRoutesRequest = serde_json::from_value(json!({
            "start": {"latitude": 43.5855, "longitude": 39.7231},
            "end": {"latitude": 43.6028, "longitude": 39.7342}
        }))
        .unwrap();

        assert_eq!(req.transport_type, "public_transport");
        assert_eq!(req.start.latitude(), 43.5855);
        assert_eq!(req.end.longitude(), 39.7342);
    }

    #[test]
    fn build_routes_request_rejects_out_of_range_coordinates() {
        let result: Result<BuildRoutesRequest, _> = serde_json::from_value(json!({
            "start": {"latitude": 95.0, "longitude": 39.7231},
            "end": {"latitude": 43.6028, "longitude": 39.7342}
        }));

        assert!(result.is_err());
    }
}
