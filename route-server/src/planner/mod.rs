//! Route planner.
//!
//! Answers "how do I get from here to there by public transport?" with
//! three picks: the fastest route, the least crowded one, and a balanced
//! one from the Pareto frontier of duration and workload.
//!
//! Stops are located around both endpoints, every stop pair is routed
//! concurrently, candidates are scored for workload and then selected.
//! Provider failures degrade the answer but never abort it.

mod config;
mod error;
mod locator;
mod orchestrator;
mod requester;
mod retry;
mod select;
mod workload;

pub use config::{DEFAULT_STOP_QUERY, PlannerConfig};
pub use error::{Provider, ProviderError};
pub use locator::{PoiSearch, StopLocator};
pub use orchestrator::{PlanOutcome, PlanStats, RoutePlanner};
pub use requester::{RouteProvider, RouteRequester};
pub use retry::{RetryPolicy, with_deadline};
pub use select::{dominates, fastest, least_crowded, pareto_frontier, select};
pub use workload::{
    BaselineSource, MAX_OCCUPANCY, UniformBaseline, WorkloadAnnotator, WorkloadTelemetry, leg_score,
};
