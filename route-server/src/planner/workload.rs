//! Workload (crowdedness) annotation.
//!
//! Each transit leg of a candidate gets a baseline occupancy drawn
//! uniformly from `1..=MAX_OCCUPANCY`. When station telemetry is
//! available its reading is added on top, capped so a leg never exceeds
//! saturation. Leg scores are normalized to [0, 1] and a route's workload
//! is their mean.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use rand::Rng;
use tracing::{debug, warn};

use crate::domain::RouteCandidate;

use super::error::{Provider, ProviderError};
use super::retry::with_deadline;

/// Occupancy at which a leg counts as saturated.
pub const MAX_OCCUPANCY: u32 = 60;

/// Live station workload, as consumed by the planner.
pub trait WorkloadTelemetry {
    /// Current station occupancy in `0..=MAX_OCCUPANCY`.
    fn station_workload(&self) -> impl Future<Output = Result<u32, ProviderError>> + Send;
}

/// Source of per-leg baseline occupancy.
pub trait BaselineSource {
    /// Next baseline, in `1..=MAX_OCCUPANCY`.
    fn next_baseline(&mut self) -> u32;
}

/// Baselines drawn uniformly from `1..=MAX_OCCUPANCY`.
#[derive(Debug, Clone)]
pub struct UniformBaseline<R>(pub R);

impl<R: Rng> BaselineSource for UniformBaseline<R> {
    fn next_baseline(&mut self) -> u32 {
        self.0.gen_range(1..=MAX_OCCUPANCY)
    }
}

/// Score of one leg: baseline plus capped telemetry, normalized to [0, 1].
pub fn leg_score(baseline: u32, telemetry: Option<u32>) -> f64 {
    let baseline = baseline.min(MAX_OCCUPANCY);
    let combined = match telemetry {
        Some(reading) => baseline + reading.min(MAX_OCCUPANCY - baseline),
        None => baseline,
    };
    f64::from(combined) / f64::from(MAX_OCCUPANCY)
}

/// Attaches a workload score to route candidates.
pub struct WorkloadAnnotator<'a, T: WorkloadTelemetry> {
    telemetry: Option<&'a T>,
    deadline: Duration,
}

impl<'a, T: WorkloadTelemetry> WorkloadAnnotator<'a, T> {
    /// `telemetry: None` scores from the random baseline alone.
    pub fn new(telemetry: Option<&'a T>, deadline: Duration) -> Self {
        Self {
            telemetry,
            deadline,
        }
    }

    /// Score every non-pedestrian candidate.
    ///
    /// Pedestrian-only candidates are dropped, as are candidates naming no
    /// transit line at all (there is nothing to score). Everything else
    /// comes back in input order with `workload` set and no other change.
    pub async fn annotate<B: BaselineSource + ?Sized>(
        &self,
        candidates: Vec<RouteCandidate>,
        baselines: &mut B,
    ) -> Vec<RouteCandidate> {
        let total = candidates.len();
        let transit: Vec<RouteCandidate> = candidates
            .into_iter()
            .filter(|c| !c.is_pedestrian)
            .filter(|c| {
                let has_legs = c.transit_legs().next().is_some();
                if !has_legs {
                    warn!(id = ?c.id(), "dropping route without named transit legs");
                }
                has_legs
            })
            .collect();
        debug!(total, kept = transit.len(), "filtered candidates for workload scoring");

        // Baselines are drawn up front, in candidate then leg order, so a
        // seeded source gives the same scores however telemetry interleaves.
        let drawn: Vec<Vec<u32>> = transit
            .iter()
            .map(|c| c.transit_legs().map(|_| baselines.next_baseline()).collect())
            .collect();

        let corrections = self.fetch_corrections(&drawn).await;

        transit
            .into_iter()
            .zip(drawn)
            .zip(corrections)
            .map(|((mut candidate, legs), readings)| {
                let sum: f64 = legs
                    .iter()
                    .zip(readings)
                    .map(|(&baseline, reading)| leg_score(baseline, reading))
                    .sum();
                candidate.workload = Some(sum / legs.len() as f64);
                candidate
            })
            .collect()
    }

    /// One telemetry reading per leg, `None` where unavailable.
    async fn fetch_corrections(&self, baselines: &[Vec<u32>]) -> Vec<Vec<Option<u32>>> {
        let Some(telemetry) = self.telemetry else {
            return baselines.iter().map(|legs| vec![None; legs.len()]).collect();
        };

        let total: usize = baselines.iter().map(Vec::len).sum();
        let mut fetches = Vec::with_capacity(total);
        for _ in 0..total {
            fetches.push(self.correction(telemetry));
        }
        let mut readings = join_all(fetches).await.into_iter();

        baselines
            .iter()
            .map(|legs| readings.by_ref().take(legs.len()).collect())
            .collect()
    }

    async fn correction(&self, telemetry: &T) -> Option<u32> {
        match with_deadline(Provider::Telemetry, self.deadline, telemetry.station_workload()).await {
            Ok(reading) => Some(reading),
            Err(err) => {
                warn!(%err, "no telemetry correction for leg");
                None
            }
        }
    }
}
