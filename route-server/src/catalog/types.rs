//! Catalog API response DTOs.
//!
//! Items are kept as raw JSON at the envelope level so that one malformed
//! item can be skipped without failing the whole response.

use serde::Deserialize;

use crate::domain::{AccessPoint, Coordinate};

/// Top-level response from the items endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResponse {
    pub meta: Option<CatalogMeta>,
    pub result: Option<CatalogResult>,
}

/// Response metadata. `code` mirrors an HTTP status.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogMeta {
    pub code: Option<u16>,
    pub error: Option<CatalogMetaError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogMetaError {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResult {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

/// A single item, as far as we interpret it.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: Option<String>,
    pub point: Option<ItemPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemPoint {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl CatalogResponse {
    /// The `meta.code` error, if the provider reported one.
    ///
    /// A 404 here means "no results" and is not an error.
    pub fn meta_error(&self) -> Option<(u16, String)> {
        let meta = self.meta.as_ref()?;
        let code = meta.code?;
        if code < 400 || code == 404 {
            return None;
        }
        let message = meta
            .error
            .as_ref()
            .and_then(|e| e.message.clone().or_else(|| e.kind.clone()))
            .unwrap_or_default();
        Some((code, message))
    }
}

/// Convert a raw item to an access point.
///
/// Returns `None` for items without an id or a valid point.
pub(super) fn item_to_access_point(raw: serde_json::Value) -> Option<AccessPoint> {
    let item: CatalogItem = serde_json::from_value(raw.clone()).ok()?;
    let point = item.point?;
    let coordinate = Coordinate::new(point.lat?, point.lon?).ok()?;

    Some(AccessPoint {
        id: item.id,
        name: item.name,
        coordinate,
        raw,
    })
}
