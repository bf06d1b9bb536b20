//! Routing API request DTOs.
//!
//! Responses deserialize straight into [`RouteCandidate`](crate::domain::RouteCandidate).

use serde::Serialize;

use crate::domain::{Coordinate, TransportMode};

/// JSON body of a public transport routing request.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingRequestBody {
    pub source: EndpointDto,
    pub target: EndpointDto,
    pub transport: Vec<TransportMode>,
    pub max_result_count: u32,
    pub enable_schedule: bool,
    pub locale: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointDto {
    pub point: PointDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointDto {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl EndpointDto {
    /// An endpoint snapped to a stop.
    pub fn stop(coordinate: Coordinate) -> Self {
        Self {
            point: PointDto {
                lat: coordinate.latitude(),
                lon: coordinate.longitude(),
                kind: "stop",
            },
        }
    }
}
