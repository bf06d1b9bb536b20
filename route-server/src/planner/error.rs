//! Provider failure type seen by the planner.
//!
//! Every client error is folded into [`ProviderError`] at the trait seam.
//! The planner never propagates these: a failed lookup or route request
//! degrades to "no result" for that sub-operation.

use crate::catalog::CatalogError;
use crate::routing::RoutingError;
use crate::telemetry::TelemetryError;

/// Which external collaborator a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Catalog,
    Routing,
    Telemetry,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Provider::Catalog => "catalog",
            Provider::Routing => "routing",
            Provider::Telemetry => "telemetry",
        })
    }
}

/// A failed call to an external provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The call did not complete within its deadline
    #[error("{provider} request timed out")]
    Timeout { provider: Provider },

    /// Network-level failure
    #[error("{provider} transport error: {message}")]
    Transport { provider: Provider, message: String },

    /// Non-success status from the provider
    #[error("{provider} returned status {status}: {message}")]
    Status {
        provider: Provider,
        status: u16,
        message: String,
    },

    /// The response could not be interpreted
    #[error("{provider} returned a malformed payload: {message}")]
    Malformed { provider: Provider, message: String },
}

impl ProviderError {
    /// Whether retrying the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Timeout { .. } | ProviderError::Transport { .. } => true,
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            ProviderError::Malformed { .. } => false,
        }
    }
}

fn from_reqwest(provider: Provider, err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout { provider }
    } else if let Some(status) = err.status() {
        ProviderError::Status {
            provider,
            status: status.as_u16(),
            message: err.to_string(),
        }
    } else if err.is_decode() {
        ProviderError::Malformed {
            provider,
            message: err.to_string(),
        }
    } else {
        ProviderError::Transport {
            provider,
            message: err.to_string(),
        }
    }
}

impl From<CatalogError> for ProviderError {
    fn from(err: CatalogError) -> Self {
        let provider = Provider::Catalog;
        match err {
            CatalogError::Http(e) => from_reqwest(provider, &e),
            CatalogError::Api { status, message } => ProviderError::Status {
                provider,
                status,
                message,
            },
            CatalogError::Json { message, .. } => ProviderError::Malformed { provider, message },
            CatalogError::Unauthorized => ProviderError::Status {
                provider,
                status: 401,
                message: "unauthorized".to_string(),
            },
            CatalogError::RateLimited => ProviderError::Status {
                provider,
                status: 429,
                message: "rate limited".to_string(),
            },
        }
    }
}

impl From<RoutingError> for ProviderError {
    fn from(err: RoutingError) -> Self {
        let provider = Provider::Routing;
        match err {
            RoutingError::Http(e) => from_reqwest(provider, &e),
            RoutingError::Api { status, message } => ProviderError::Status {
                provider,
                status,
                message,
            },
            RoutingError::Json { message, .. } => ProviderError::Malformed { provider, message },
            RoutingError::Unauthorized => ProviderError::Status {
                provider,
                status: 401,
                message: "unauthorized".to_string(),
            },
            RoutingError::RateLimited => ProviderError::Status {
                provider,
                status: 429,
                message: "rate limited".to_string(),
            },
        }
    }
}

impl From<TelemetryError> for ProviderError {
    fn from(err: TelemetryError) -> Self {
        let provider = Provider::Telemetry;
        match err {
            TelemetryError::Http(e) => from_reqwest(provider, &e),
            TelemetryError::Api { status, message } => ProviderError::Status {
                provider,
                status,
                message,
            },
            TelemetryError::Json { message } => ProviderError::Malformed { provider, message },
        }
    }
}
