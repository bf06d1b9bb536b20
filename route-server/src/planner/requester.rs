//! Route requester: one routing call per stop pair.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::warn;

use crate::domain::{Coordinate, RouteCandidate, TransportMode};
use crate::routing::RouteRequest;

use super::config::PlannerConfig;
use super::error::{Provider, ProviderError};
use super::retry::with_deadline;

/// Transit routing, as consumed by the planner.
pub trait RouteProvider {
    /// Route candidates for `request`, best first.
    fn route(
        &self,
        request: &RouteRequest,
    ) -> impl Future<Output = Result<Vec<RouteCandidate>, ProviderError>> + Send;
}

/// Requests the best route between two access points.
///
/// Failed requests read as "no route" to the caller and are tallied in
/// [`failures`](Self::failures).
pub struct RouteRequester<'a, P: RouteProvider> {
    provider: &'a P,
    config: &'a PlannerConfig,
    failures: AtomicUsize,
}

impl<'a, P: RouteProvider> RouteRequester<'a, P> {
    pub fn new(provider: &'a P, config: &'a PlannerConfig) -> Self {
        Self {
            provider,
            config,
            failures: AtomicUsize::new(0),
        }
    }

    /// How many [`request_route`](Self::request_route) calls failed so far.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// The request sent for a pair: every mode, schedule-aware, best
    /// `routes_per_pair` results.
    pub fn route_request(&self, start: Coordinate, end: Coordinate) -> RouteRequest {
        RouteRequest {
            source: start,
            target: end,
            modes: TransportMode::ALL.to_vec(),
            max_results: self.config.routes_per_pair,
            schedule_aware: self.config.schedule_aware,
            locale: self.config.locale.clone(),
        }
    }

    /// The provider's top-ranked route, `Ok(None)` if it has none, or the
    /// provider failure after retries.
    async fn try_request_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Option<RouteCandidate>, ProviderError> {
        let request = self.route_request(start, end);
        let deadline = self.config.call_timeout();

        let routes = self
            .config
            .retry
            .run(|| with_deadline(Provider::Routing, deadline, self.provider.route(&request)))
            .await?;

        Ok(routes.into_iter().next())
    }

    /// The provider's top-ranked route, or `None` on any failure.
    pub async fn request_route(&self, start: Coordinate, end: Coordinate) -> Option<RouteCandidate> {
        match self.try_request_route(start, end).await {
            Ok(route) => route,
            Err(err) => {
                warn!(%start, %end, %err, "route request failed");
                self.failures.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }
}
