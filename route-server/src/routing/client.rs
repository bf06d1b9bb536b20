//! Routing HTTP client.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Coordinate, RouteCandidate, TransportMode};
use crate::planner::{ProviderError, RouteProvider};

use super::error::RoutingError;
use super::types::{EndpointDto, RoutingRequestBody};

/// Default URL of the public transport routing endpoint.
const DEFAULT_BASE_URL: &str = "https://routing.api.2gis.com/public_transport/2.0";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Configuration for the routing client.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Endpoint URL (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RoutingConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 15,
        }
    }

    /// Set a custom endpoint URL (for testing).
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

/// One routing request between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub source: Coordinate,
    pub target: Coordinate,
    pub modes: Vec<TransportMode>,
    pub max_results: u32,
    pub schedule_aware: bool,
    pub locale: String,
}

impl RouteRequest {
    fn to_body(&self) -> RoutingRequestBody {
        RoutingRequestBody {
            source: EndpointDto::stop(self.source),
            target: EndpointDto::stop(self.target),
            transport: self.modes.clone(),
            max_result_count: self.max_results,
            enable_schedule: self.schedule_aware,
            locale: self.locale.clone(),
        }
    }
}

/// Public transport routing API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct RoutingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl RoutingClient {
    /// Create a new routing client with the given configuration.
    pub fn new(config: RoutingConfig) -> Result<Self, RoutingError> {
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

    /// Request routes between two points, best first.
    pub async fn find_routes(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<RouteCandidate>, RoutingError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| RoutingError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self
            .http
            .post(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request.to_body())
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RoutingError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimited);
        }

        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let items: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| RoutingError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        let total = items.len();
        let routes: Vec<RouteCandidate> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(route) => Some(route),
                Err(e) => {
                    debug!(error = %e, "skipping unreadable route candidate");
                    None
                }
            })
            .collect();

        if routes.len() < total {
            debug!(skipped = total - routes.len(), kept = routes.len(), "dropped malformed routes");
        }

        Ok(routes)
    }
}

impl RouteProvider for RoutingClient {
    async fn route(&self, request: &RouteRequest) -> Result<Vec<RouteCandidate>, ProviderError> {
        Ok(self.find_routes(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    #[test]
    fn config_defaults() {
        let config = RoutingConfig::new("test-key");

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn client_creation() {
        assert!(RoutingClient::new(RoutingConfig::new("test-key")).is_ok());
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn request() -> RouteRequest {
        RouteRequest {
            source: Coordinate::new(43.58, 39.72).unwrap(),
            target: Coordinate::new(43.60, 39.74).unwrap(),
            modes: TransportMode::ALL.to_vec(),
            max_results: 1,
            schedule_aware: true,
            locale: "ru_RU".to_string(),
        }
    }

    #[tokio::test]
    async fn posts_body_and_parses_candidates() {
        let router = Router::new().route(
            "/pt",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["max_result_count"], json!(1));
                assert_eq!(body["enable_schedule"], json!(true));
                assert_eq!(body["transport"].as_array().unwrap().len(), 17);
                assert_eq!(body["source"]["point"]["type"], json!("stop"));
                Json(json!([
                    {"id": "r1", "pedestrian": false, "total_duration": 900, "total_distance": 5000,
                     "waypoints": [{"routes_names": ["12"]}]}
                ]))
            }),
        );
        let base = serve(router).await;
        let client =
            RoutingClient::new(RoutingConfig::new("k").with_base_url(format!("{base}/pt"))).unwrap();

        let routes = client.find_routes(&request()).await.unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].id(), Some("r1"));
        assert_eq!(routes[0].total_duration, Some(900.0));
    }

    #[tokio::test]
    async fn no_content_is_empty() {
        let router = Router::new().route("/pt", post(|| async { StatusCode::NO_CONTENT }));
        let base = serve(router).await;
        let client =
            RoutingClient::new(RoutingConfig::new("k").with_base_url(format!("{base}/pt"))).unwrap();

        assert!(client.find_routes(&request()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let router = Router::new().route(
            "/pt",
            post(|| async { (StatusCode::BAD_REQUEST, "points are too close") }),
        );
        let base = serve(router).await;
        let client =
            RoutingClient::new(RoutingConfig::new("k").with_base_url(format!("{base}/pt"))).unwrap();

        let err = client.find_routes(&request()).await.unwrap_err();
        match err {
            RoutingError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "points are too close");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let router = Router::new().route("/pt", post(|| async { "{\"not\": \"an array\"}" }));
        let base = serve(router).await;
        let client =
            RoutingClient::new(RoutingConfig::new("k").with_base_url(format!("{base}/pt"))).unwrap();

        let err = client.route(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
    }

    #[tokio::test]
    async fn unreadable_candidate_does_not_sink_its_siblings() {
        let router = Router::new().route(
            "/pt",
            post(|| async {
                Json(json!([
                    {"id": "good", "total_duration": 900, "total_distance": 5000,
                     "waypoints": [{"routes_names": ["12"]}]},
                    {"id": "nulls", "total_duration": null, "total_distance": null, "waypoints": null},
                    {"id": "broken", "total_duration": "soon", "waypoints": 7}
                ]))
            }),
        );
        let base = serve(router).await;
        let client =
            RoutingClient::new(RoutingConfig::new("k").with_base_url(format!("{base}/pt"))).unwrap();

        let routes = client.route(&request()).await.unwrap();

        let ids: Vec<_> = routes.iter().map(|r| r.id()).collect();
        assert_eq!(ids, [Some("good"), Some("nulls")]);
        assert_eq!(routes[1].total_distance, 0.0);
        assert!(routes[1].waypoints.is_empty());
    }

    #[tokio::test]
    async fn zero_concurrency_still_admits_one_request() {
        let router = Router::new().route("/pt", post(|| async { Json(json!([])) }));
        let base = serve(router).await;
        let config = RoutingConfig::new("k")
            .with_base_url(format!("{base}/pt"))
            .with_max_concurrent(0);
        let client = RoutingClient::new(config).unwrap();

        let routes = tokio::time::timeout(Duration::from_secs(5), client.find_routes(&request()))
            .await
            .expect("request should not wait for a permit forever")
            .unwrap();
        assert!(routes.is_empty());
    }
}
