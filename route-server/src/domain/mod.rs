//! Domain types for the route planner.
//!
//! Value types shared by the provider clients, the planner core and the
//! web layer. Coordinates are validated at construction time, so code that
//! receives a `Coordinate` can trust its range.

mod access_point;
mod coordinate;
mod route;

pub use access_point::AccessPoint;
pub use coordinate::{Coordinate, EARTH_RADIUS_M, InvalidCoordinate};
pub use route::{RouteCandidate, SelectionResult, TransportMode, Waypoint};
