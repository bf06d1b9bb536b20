//! Process configuration from `API_`-prefixed environment variables.

use std::net::SocketAddr;
use std::str::FromStr;

use crate::catalog::CatalogConfig;
use crate::planner::PlannerConfig;
use crate::routing::RoutingConfig;
use crate::telemetry::TelemetryConfig;

const PREFIX: &str = "API_";

const DEFAULT_MAX_CONCURRENT_TELEMETRY: usize = 4;

/// Errors reading settings.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SettingsError {
    #[error("required setting {0} is not set")]
    Missing(String),

    #[error("invalid value {value:?} for {key}: {message}")]
    Invalid {
        key: String,
        value: String,
        message: String,
    },
}

/// Server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Key for the catalog and routing APIs.
    pub gis_api_key: String,
    pub catalog_url: Option<String>,
    pub routing_url: Option<String>,
    /// Station telemetry base URL; telemetry is disabled when unset.
    pub station_workload_url: Option<String>,
    /// Meters added to the nearest-stop distance when searching for stops.
    pub transport_search_radius: f64,
    pub max_stop_count: u32,
    pub workload_seed: Option<u64>,
    pub request_timeout_secs: u64,
    pub max_concurrent_routes: usize,
    /// In-flight telemetry requests per process.
    pub max_concurrent_telemetry: usize,
    pub bind_addr: SocketAddr,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which is given full variable names.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let vars = Vars(lookup);

        let gis_api_key = vars
            .get("GIS_API_KEY")
            .ok_or_else(|| SettingsError::Missing(format!("{PREFIX}GIS_API_KEY")))?;

        Ok(Self {
            gis_api_key,
            catalog_url: vars.get("CATALOG_URL"),
            routing_url: vars.get("ROUTING_URL"),
            station_workload_url: vars.get("STATION_WORKLOAD_URL"),
            transport_search_radius: vars
                .parse_checked(
                    "TRANSPORT_SEARCH_RADIUS",
                    |r: &f64| r.is_finite() && *r >= 0.0,
                    "must be a finite number of meters, not negative",
                )?
                .unwrap_or(500.0),
            max_stop_count: vars
                .parse_checked("MAX_STOP_COUNT", |n: &u32| *n > 0, "must be at least 1")?
                .unwrap_or(5),
            workload_seed: vars.parse("WORKLOAD_SEED")?,
            request_timeout_secs: vars
                .parse_checked("REQUEST_TIMEOUT_SECS", |n: &u64| *n > 0, "must be at least 1")?
                .unwrap_or(15),
            max_concurrent_routes: vars
                .parse_checked("MAX_CONCURRENT_ROUTES", |n: &usize| *n > 0, "must be at least 1")?
                .unwrap_or(8),
            max_concurrent_telemetry: vars
                .parse_checked("MAX_CONCURRENT_TELEMETRY", |n: &usize| *n > 0, "must be at least 1")?
                .unwrap_or(DEFAULT_MAX_CONCURRENT_TELEMETRY),
            bind_addr: vars
                .parse("BIND_ADDR")?
                .unwrap_or(SocketAddr::from(([127, 0, 0, 1], 8000))),
        })
    }

    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig::default()
            .with_search_margin(self.transport_search_radius)
            .with_max_stop_count(self.max_stop_count)
            .with_max_concurrent_routes(self.max_concurrent_routes)
            .with_call_timeout(self.request_timeout_secs)
            .with_workload_seed(self.workload_seed)
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        let config = CatalogConfig::new(&self.gis_api_key).with_timeout(self.request_timeout_secs);
        match &self.catalog_url {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }

    pub fn routing_config(&self) -> RoutingConfig {
        let config = RoutingConfig::new(&self.gis_api_key)
            .with_timeout(self.request_timeout_secs)
            .with_max_concurrent(self.max_concurrent_routes);
        match &self.routing_url {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }

    pub fn telemetry_config(&self) -> Option<TelemetryConfig> {
        self.station_workload_url.as_ref().map(|url| {
            TelemetryConfig::new(url).with_max_concurrent(self.max_concurrent_telemetry)
        })
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(&format!("{PREFIX}{name}"))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T>(&self, name: &str) -> Result<Option<T>, SettingsError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.parse_checked(name, |_: &T| true, "")
    }

    /// Like [`parse`](Self::parse), also rejecting values failing `valid`.
    fn parse_checked<T>(
        &self,
        name: &str,
        valid: impl Fn(&T) -> bool,
        requirement: &str,
    ) -> Result<Option<T>, SettingsError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let invalid = |value: String, message: String| SettingsError::Invalid {
            key: format!("{PREFIX}{name}"),
            value,
            message,
        };
        match value.parse() {
            Ok(parsed) if valid(&parsed) => Ok(Some(parsed)),
            Ok(_) => Err(invalid(value, requirement.to_string())),
            Err(e) => Err(invalid(value, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, SettingsError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_only_api_key() {
        let s = settings(&[("API_GIS_API_KEY", "secret")]).unwrap();

        assert_eq!(s.gis_api_key, "secret");
        assert_eq!(s.transport_search_radius, 500.0);
        assert_eq!(s.max_stop_count, 5);
        assert_eq!(s.workload_seed, None);
        assert_eq!(s.station_workload_url, None);
        assert_eq!(s.bind_addr, "127.0.0.1:8000".parse().unwrap());
        assert!(s.telemetry_config().is_none());
    }

    #[test]
    fn missing_api_key() {
        let err = settings(&[("API_MAX_STOP_COUNT", "3")]).unwrap_err();
        assert_eq!(err, SettingsError::Missing("API_GIS_API_KEY".to_string()));

        let err = settings(&[("API_GIS_API_KEY", "  ")]).unwrap_err();
        assert!(matches!(err, SettingsError::Missing(_)));
    }

    #[test]
    fn invalid_number_names_the_variable() {
        let err = settings(&[("API_GIS_API_KEY", "k"), ("API_MAX_STOP_COUNT", "many")]).unwrap_err();

        match err {
            SettingsError::Invalid { key, value, .. } => {
                assert_eq!(key, "API_MAX_STOP_COUNT");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for (key, value) in [
            ("API_MAX_CONCURRENT_ROUTES", "0"),
            ("API_MAX_CONCURRENT_TELEMETRY", "0"),
            ("API_MAX_STOP_COUNT", "0"),
            ("API_REQUEST_TIMEOUT_SECS", "0"),
            ("API_TRANSPORT_SEARCH_RADIUS", "NaN"),
            ("API_TRANSPORT_SEARCH_RADIUS", "inf"),
            ("API_TRANSPORT_SEARCH_RADIUS", "-50"),
        ] {
            let err = settings(&[("API_GIS_API_KEY", "k"), (key, value)]).unwrap_err();
            match err {
                SettingsError::Invalid { key: k, value: v, .. } => {
                    assert_eq!(k, key);
                    assert_eq!(v, value);
                }
                other => panic!("{key}={value}: unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn zero_search_radius_is_allowed() {
        let s = settings(&[("API_GIS_API_KEY", "k"), ("API_TRANSPORT_SEARCH_RADIUS", "0")]).unwrap();
        assert_eq!(s.transport_search_radius, 0.0);
    }

    #[test]
    fn overrides_flow_into_component_configs() {
        let s = settings(&[
            ("API_GIS_API_KEY", "k"),
            ("API_CATALOG_URL", "http://catalog.local"),
            ("API_STATION_WORKLOAD_URL", "http://telemetry.local"),
            ("API_TRANSPORT_SEARCH_RADIUS", "750"),
            ("API_MAX_STOP_COUNT", "3"),
            ("API_WORKLOAD_SEED", "42"),
            ("API_REQUEST_TIMEOUT_SECS", "4"),
            ("API_MAX_CONCURRENT_ROUTES", "2"),
            ("API_MAX_CONCURRENT_TELEMETRY", "3"),
            ("API_BIND_ADDR", "0.0.0.0:9000"),
        ])
        .unwrap();

        let planner = s.planner_config();
        assert_eq!(planner.search_margin_m, 750.0);
        assert_eq!(planner.max_stop_count, 3);
        assert_eq!(planner.workload_seed, Some(42));
        assert_eq!(planner.call_timeout_secs, 4);
        assert_eq!(planner.max_concurrent_routes, 2);

        let catalog = s.catalog_config();
        assert_eq!(catalog.base_url, "http://catalog.local");
        assert_eq!(catalog.timeout_secs, 4);

        let routing = s.routing_config();
        assert_eq!(routing.api_key, "k");
        assert_eq!(routing.max_concurrent, 2);

        let telemetry = s.telemetry_config().unwrap();
        assert_eq!(telemetry.base_url, "http://telemetry.local");
        assert_eq!(telemetry.max_concurrent, 3);
        assert_eq!(s.bind_addr.port(), 9000);
    }
}
