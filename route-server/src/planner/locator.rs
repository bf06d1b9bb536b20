//! Stop locator.
//!
//! Finds the transit stops plausibly reachable on foot from a point: the
//! nearest stop, plus every stop no further away than the nearest one
//! plus a configured margin.

use std::future::Future;

use tracing::{debug, warn};

use crate::catalog::SearchQuery;
use crate::domain::{AccessPoint, Coordinate};

use super::config::PlannerConfig;
use super::error::{Provider, ProviderError};
use super::retry::with_deadline;

/// Point-of-interest search, as consumed by the planner.
///
/// This abstraction allows the planner to be tested with in-memory stops.
pub trait PoiSearch {
    /// Items matching `query`, nearest to `query.center` first.
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<AccessPoint>, ProviderError>> + Send;
}

/// Locates access points around a coordinate.
pub struct StopLocator<'a, S: PoiSearch> {
    search: &'a S,
    config: &'a PlannerConfig,
}

impl<'a, S: PoiSearch> StopLocator<'a, S> {
    pub fn new(search: &'a S, config: &'a PlannerConfig) -> Self {
        Self { search, config }
    }

    /// Stops near `at`, nearest first, at most `max_stop_count` of them.
    ///
    /// An empty result means no stop exists within the nearest-stop radius.
    /// Once the nearest stop is known, a failing expanded search degrades
    /// to just that stop instead of failing the lookup.
    pub async fn find_nearest_access_points(
        &self,
        at: Coordinate,
    ) -> Result<Vec<AccessPoint>, ProviderError> {
        let probe = self.query(
            at,
            self.config.nearest_search_radius_m,
            self.config.nearest_probe_limit,
        );
        let Some(nearest) = self.run(&probe).await?.into_iter().next() else {
            debug!(%at, "no stops within nearest-stop radius");
            return Ok(Vec::new());
        };

        let distance = at.distance_to(&nearest.coordinate);
        let radius = (distance + self.config.search_margin_m).ceil() as u32;
        debug!(%at, nearest = %nearest.id, distance, radius, "expanding stop search");

        let expanded = self.query(at, radius, self.config.max_stop_count);
        let mut stops = match self.run(&expanded).await {
            Ok(stops) => stops,
            Err(e) => {
                warn!(
                    %at,
                    nearest = %nearest.id,
                    error = %e,
                    "expanded stop search failed, using nearest stop"
                );
                Vec::new()
            }
        };

        // The nearest stop lies inside the expanded radius, so an empty
        // answer here is a provider inconsistency; keep what we know.
        if stops.is_empty() {
            stops.push(nearest);
        }
        stops.truncate(self.config.max_stop_count as usize);

        Ok(stops)
    }

    fn query(&self, center: Coordinate, radius_m: u32, max_results: u32) -> SearchQuery {
        SearchQuery {
            text: self.config.stop_query.clone(),
            center,
            radius_m,
            type_filter: self.config.stop_type.clone(),
            max_results,
        }
    }

    async fn run(&self, query: &SearchQuery) -> Result<Vec<AccessPoint>, ProviderError> {
        let deadline = self.config.call_timeout();
        self.config
            .retry
            .run(|| with_deadline(Provider::Catalog, deadline, self.search.search(query)))
            .await
    }
}
