//! Transit access points (stops and stations).

use serde::Serialize;

use super::Coordinate;

/// A transit stop usable as a route endpoint.
///
/// Produced by the stop locator and consumed within a single request.
/// `raw` keeps the provider's item untouched for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessPoint {
    pub id: String,
    pub name: Option<String>,
    pub coordinate: Coordinate,
    pub raw: serde_json::Value,
}

impl AccessPoint {
    pub fn new(id: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: None,
            coordinate,
            raw: serde_json::Value::Null,
        }
    }
}
