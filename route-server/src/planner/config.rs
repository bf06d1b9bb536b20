//! Planner configuration.

use std::time::Duration;

use super::retry::RetryPolicy;

/// Catalog query text for stop lookups ("bus stop"); the catalog matches
/// it against its Russian-language index.
pub const DEFAULT_STOP_QUERY: &str = "остановка автобуса";

/// Configuration parameters for route planning.
///
/// Built once at startup and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Radius of the initial nearest-stop lookup (meters).
    pub nearest_search_radius_m: u32,

    /// Added to the distance to the nearest stop to get the radius of the
    /// second, wider lookup (meters).
    pub search_margin_m: f64,

    /// Maximum number of stops used at each end of the trip.
    pub max_stop_count: u32,

    /// How many items the nearest-stop lookup asks for. The first one with
    /// a usable point is taken as the nearest stop.
    pub nearest_probe_limit: u32,

    /// Catalog free-text query for stops.
    pub stop_query: String,

    /// Catalog item type filter for stops.
    pub stop_type: String,

    /// Routes requested from the routing provider per stop pair.
    pub routes_per_pair: u32,

    /// Ask the routing provider to honour timetables.
    pub schedule_aware: bool,

    /// Locale sent to the routing provider.
    pub locale: String,

    /// Maximum number of route requests in flight for one plan.
    pub max_concurrent_routes: usize,

    /// Deadline for any single provider call (seconds).
    pub call_timeout_secs: u64,

    /// Fixed seed for the workload baseline. `None` seeds from entropy on
    /// every request.
    pub workload_seed: Option<u64>,

    /// Retry policy for catalog and routing calls.
    pub retry: RetryPolicy,
}

impl PlannerConfig {
    /// Returns the per-call deadline as a Duration.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn with_search_margin(mut self, meters: f64) -> Self {
        self.search_margin_m = meters;
        self
    }

    pub fn with_max_stop_count(mut self, n: u32) -> Self {
        self.max_stop_count = n;
        self
    }

    pub fn with_max_concurrent_routes(mut self, n: usize) -> Self {
        self.max_concurrent_routes = n;
        self
    }

    pub fn with_call_timeout(mut self, secs: u64) -> Self {
        self.call_timeout_secs = secs;
        self
    }

    pub fn with_workload_seed(mut self, seed: Option<u64>) -> Self {
        self.workload_seed = seed;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            nearest_search_radius_m: 10_000,
            search_margin_m: 500.0,
            max_stop_count: 5,
            nearest_probe_limit: 10,
            stop_query: DEFAULT_STOP_QUERY.to_string(),
            stop_type: "station".to_string(),
            routes_per_pair: 1,
            schedule_aware: true,
            locale: "ru_RU".to_string(),
            max_concurrent_routes: 8,
            call_timeout_secs: 20,
            workload_seed: None,
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.nearest_search_radius_m, 10_000);
        assert_eq!(config.search_margin_m, 500.0);
        assert_eq!(config.max_stop_count, 5);
        assert_eq!(config.routes_per_pair, 1);
        assert!(config.schedule_aware);
        assert_eq!(config.locale, "ru_RU");
        assert_eq!(config.stop_type, "station");
        assert_eq!(config.workload_seed, None);
        assert_eq!(config.retry.max_retries, 2);
    }

    #[test]
    fn builder_methods() {
        let config = PlannerConfig::default()
            .with_search_margin(250.0)
            .with_max_stop_count(3)
            .with_max_concurrent_routes(2)
            .with_call_timeout(7)
            .with_workload_seed(Some(42))
            .with_retry(RetryPolicy::none());

        assert_eq!(config.search_margin_m, 250.0);
        assert_eq!(config.max_stop_count, 3);
        assert_eq!(config.max_concurrent_routes, 2);
        assert_eq!(config.call_timeout(), Duration::from_secs(7));
        assert_eq!(config.workload_seed, Some(42));
        assert_eq!(config.retry.max_retries, 0);
    }
}
