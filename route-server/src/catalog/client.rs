//! Catalog HTTP client.
//!
//! Provides an async search for transit stops around a point, sorted by
//! distance, and converts provider items to [`AccessPoint`]s.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{AccessPoint, Coordinate};
use crate::planner::{PoiSearch, ProviderError};

use super::error::CatalogError;
use super::types::{CatalogResponse, item_to_access_point};

/// Default base URL for the catalog API.
const DEFAULT_BASE_URL: &str = "https://catalog.api.2gis.com/3.0";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl CatalogConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Parameters of one point-of-interest search. Results are always sorted
/// by distance from `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Free-text query, e.g. "bus stop"
    pub text: String,
    pub center: Coordinate,
    pub radius_m: u32,
    /// Provider item type, e.g. "station"
    pub type_filter: String,
    pub max_results: u32,
}

/// Catalog API client.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl CatalogClient {
    /// Create a new catalog client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Search for items around a point, nearest first.
    ///
    /// Items without a usable id or point are skipped, not reported.
    pub async fn search_items(&self, query: &SearchQuery) -> Result<Vec<AccessPoint>, CatalogError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| CatalogError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/items", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query.text.clone()),
                ("point", query.center.to_lon_lat_string()),
                ("fields", "items.point".to_string()),
                ("key", self.api_key.clone()),
                ("sort", "distance".to_string()),
                ("radius", query.radius_m.to_string()),
                ("type", query.type_filter.clone()),
                ("page_size", query.max_results.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(CatalogError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: CatalogResponse =
            serde_json::from_str(&body).map_err(|e| CatalogError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if let Some((status, message)) = parsed.meta_error() {
            return Err(match status {
                401 | 403 => CatalogError::Unauthorized,
                429 => CatalogError::RateLimited,
                _ => CatalogError::Api { status, message },
            });
        }

        let items = parsed.result.map(|r| r.items).unwrap_or_default();
        let total = items.len();
        let points: Vec<AccessPoint> = items.into_iter().filter_map(item_to_access_point).collect();

        if points.len() < total {
            debug!(
                skipped = total - points.len(),
                "skipped catalog items without a usable point"
            );
        }

        Ok(points)
    }
}

impl PoiSearch for CatalogClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<AccessPoint>, ProviderError> {
        Ok(self.search_items(query).await?)
    }
}
