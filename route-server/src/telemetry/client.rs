//! Station workload HTTP client.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::planner::{MAX_OCCUPANCY, ProviderError, WorkloadTelemetry};

use super::error::TelemetryError;

/// Body of the workload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkloadResponse {
    pub workload: i64,
}

const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the telemetry client.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Base URL of the telemetry service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum in-flight requests
    pub max_concurrent: usize,
}

impl TelemetryConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 3,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
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

/// Client for the station workload endpoint.
#[derive(Debug, Clone)]
pub struct TelemetryClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl TelemetryClient {
    pub fn new(config: TelemetryConfig) -> Result<Self, TelemetryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch the current station workload, clamped to `0..=MAX_OCCUPANCY`.
    pub async fn current_workload(&self) -> Result<u32, TelemetryError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| TelemetryError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/api/v1/workload", self.base_url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TelemetryError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: WorkloadResponse =
            serde_json::from_str(&body).map_err(|e| TelemetryError::Json {
                message: e.to_string(),
            })?;

        Ok(parsed.workload.clamp(0, i64::from(MAX_OCCUPANCY)) as u32)
    }
}

impl WorkloadTelemetry for TelemetryClient {
    async fn station_workload(&self) -> Result<u32, ProviderError> {
        Ok(self.current_workload().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn trailing_slash_trimmed() {
        let client = TelemetryClient::new(TelemetryConfig::new("http://telemetry:9000/")).unwrap();
        assert_eq!(client.base_url, "http://telemetry:9000");
    }

    #[tokio::test]
    async fn reads_workload() {
        let router = Router::new().route(
            "/api/v1/workload",
            get(|| async { Json(json!({"workload": 17})) }),
        );
        let client = TelemetryClient::new(TelemetryConfig::new(serve(router).await)).unwrap();

        assert_eq!(client.current_workload().await.unwrap(), 17);
    }

    #[tokio::test]
    async fn clamps_out_of_range_values() {
        let router = Router::new().route(
            "/api/v1/workload",
            get(|| async { Json(json!({"workload": 250})) }),
        );
        let client = TelemetryClient::new(TelemetryConfig::new(serve(router).await)).unwrap();

        assert_eq!(client.current_workload().await.unwrap(), MAX_OCCUPANCY);
    }

    #[tokio::test]
    async fn missing_field_is_json_error() {
        let router = Router::new().route(
            "/api/v1/workload",
            get(|| async { Json(json!({"load": 3})) }),
        );
        let client = TelemetryClient::new(TelemetryConfig::new(serve(router).await)).unwrap();

        assert!(matches!(
            client.current_workload().await,
            Err(TelemetryError::Json { .. })
        ));
    }

    #[test]
    fn config_defaults() {
        let config = TelemetryConfig::new("http://telemetry");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
    }

    #[tokio::test]
    async fn in_flight_requests_are_bounded() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let router = Router::new().route(
            "/api/v1/workload",
            get({
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                move || async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Json(json!({"workload": 5}))
                }
            }),
        );
        let config = TelemetryConfig::new(serve(router).await).with_max_concurrent(2);
        let client = TelemetryClient::new(config).unwrap();

        let readings =
            futures::future::join_all((0..8).map(|_| client.current_workload())).await;

        assert!(readings.iter().all(|r| matches!(r, Ok(5))));
        assert!(peak.load(Ordering::SeqCst) <= 2, "peak {}", peak.load(Ordering::SeqCst));
    }
}
