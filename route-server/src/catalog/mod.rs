//! Catalog (point-of-interest search) client.
//!
//! Queries the provider's items endpoint for transit stops around a point.
//! Key characteristics of the catalog API:
//! - Points are passed as `"lon,lat"`, longitude first
//! - "Nothing found" is reported in the response `meta`, not as an HTTP 404
//! - Items may omit their `point` unless `fields=items.point` is requested

mod client;
mod error;
mod types;

pub use client::{CatalogClient, CatalogConfig, SearchQuery};
pub use error::CatalogError;
