//! Route planning orchestration.
//!
//! For one start/end request: locate stops at both ends, request a route
//! for every stop pair, score the candidates' workload and select the
//! fastest, balanced and least crowded routes.

use futures::StreamExt;
use futures::stream;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::domain::{AccessPoint, Coordinate, RouteCandidate, SelectionResult};

use super::config::PlannerConfig;
use super::error::ProviderError;
use super::locator::{PoiSearch, StopLocator};
use super::requester::{RouteProvider, RouteRequester};
use super::select::select;
use super::workload::{BaselineSource, UniformBaseline, WorkloadAnnotator, WorkloadTelemetry};

/// Counters describing how a plan was built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub start_stops: usize,
    pub end_stops: usize,
    /// A stop lookup failed with a provider error.
    pub lookup_failed: bool,
    pub pairs_requested: usize,
    /// Pairs whose route request failed with a provider error, as opposed
    /// to the provider answering with no route.
    pub pairs_failed: usize,
    pub candidates: usize,
    pub annotated: usize,
}

impl PlanStats {
    /// Whether the empty-or-not result is explained by provider outages
    /// rather than by there genuinely being no route.
    pub fn upstream_failed(&self) -> bool {
        self.lookup_failed || (self.pairs_requested > 0 && self.pairs_failed == self.pairs_requested)
    }
}

/// Result of planning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub selection: SelectionResult,
    pub stats: PlanStats,
}

impl PlanOutcome {
    fn empty(stats: PlanStats) -> Self {
        Self {
            selection: SelectionResult::empty(),
            stats,
        }
    }
}

/// Route planner over a catalog, a routing provider and optional telemetry.
///
/// Holds no per-request state; one planner serves every request.
pub struct RoutePlanner<S, P, T> {
    catalog: S,
    routing: P,
    telemetry: Option<T>,
    config: PlannerConfig,
}

impl<S, P, T> RoutePlanner<S, P, T>
where
    S: PoiSearch,
    P: RouteProvider,
    T: WorkloadTelemetry,
{
    pub fn new(catalog: S, routing: P, telemetry: Option<T>, config: PlannerConfig) -> Self {
        Self {
            catalog,
            routing,
            telemetry,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Build the three named routes between `start` and `end`.
    ///
    /// Returns an all-`None` result when no stops or no routes are found.
    pub async fn build_routes(&self, start: Coordinate, end: Coordinate) -> SelectionResult {
        self.plan(start, end).await.selection
    }

    /// Like [`build_routes`](Self::build_routes), with counters.
    pub async fn plan(&self, start: Coordinate, end: Coordinate) -> PlanOutcome {
        let rng = match self.config.workload_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.plan_with(start, end, &mut UniformBaseline(rng)).await
    }

    /// Plan drawing workload baselines from `baselines`.
    pub async fn plan_with<B: BaselineSource + ?Sized>(
        &self,
        start: Coordinate,
        end: Coordinate,
        baselines: &mut B,
    ) -> PlanOutcome {
        let mut stats = PlanStats::default();

        let locator = StopLocator::new(&self.catalog, &self.config);
        let (start_stops, end_stops) = tokio::join!(
            locator.find_nearest_access_points(start),
            locator.find_nearest_access_points(end)
        );
        let start_stops = self.stops_or_empty(start_stops, start, &mut stats);
        let end_stops = self.stops_or_empty(end_stops, end, &mut stats);
        stats.start_stops = start_stops.len();
        stats.end_stops = end_stops.len();

        if start_stops.is_empty() || end_stops.is_empty() {
            warn!(%start, %end, ?stats, "no stops near start or end");
            return PlanOutcome::empty(stats);
        }

        let candidates = self.request_all(&start_stops, &end_stops, &mut stats).await;
        stats.candidates = candidates.len();

        if candidates.is_empty() {
            warn!(%start, %end, ?stats, "no routes between any stop pair");
            return PlanOutcome::empty(stats);
        }

        let annotator = WorkloadAnnotator::new(self.telemetry.as_ref(), self.config.call_timeout());
        let annotated = annotator.annotate(candidates, baselines).await;
        stats.annotated = annotated.len();

        let selection = select(&annotated);
        info!(%start, %end, ?stats, "built routes");

        PlanOutcome { selection, stats }
    }

    fn stops_or_empty(
        &self,
        lookup: Result<Vec<AccessPoint>, ProviderError>,
        at: Coordinate,
        stats: &mut PlanStats,
    ) -> Vec<AccessPoint> {
        lookup.unwrap_or_else(|err| {
            warn!(%at, %err, "stop lookup failed");
            stats.lookup_failed = true;
            Vec::new()
        })
    }

    /// Request a route for every (start stop, end stop) pair, at most
    /// `max_concurrent_routes` at a time. Results come back in pair order.
    async fn request_all(
        &self,
        start_stops: &[AccessPoint],
        end_stops: &[AccessPoint],
        stats: &mut PlanStats,
    ) -> Vec<RouteCandidate> {
        let requester = RouteRequester::new(&self.routing, &self.config);
        let requester = &requester;

        let pairs: Vec<(Coordinate, Coordinate)> = start_stops
            .iter()
            .flat_map(|s| end_stops.iter().map(move |e| (s.coordinate, e.coordinate)))
            .collect();
        stats.pairs_requested = pairs.len();

        let mut results: Vec<(usize, Option<RouteCandidate>)> =
            stream::iter(pairs.into_iter().enumerate())
                .map(|(idx, (from, to))| async move {
                    (idx, requester.request_route(from, to).await)
                })
                .buffer_unordered(self.config.max_concurrent_routes.max(1))
                .collect()
                .await;
        results.sort_by_key(|(idx, _)| *idx);
        stats.pairs_failed = requester.failures();

        results.into_iter().filter_map(|(_, route)| route).collect()
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
