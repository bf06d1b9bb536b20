//! Route candidates and selection results.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A transport mode understood by the routing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Pedestrian,
    Metro,
    LightMetro,
    SuburbanTrain,
    Aeroexpress,
    Tram,
    Bus,
    Trolleybus,
    ShuttleBus,
    Monorail,
    FunicularRailway,
    RiverTransport,
    CableCar,
    LightRail,
    Premetro,
    Mcc,
    Mcd,
}

impl TransportMode {
    /// Walking plus every vehicle mode the provider knows.
    pub const ALL: [TransportMode; 17] = [
        TransportMode::Pedestrian,
        TransportMode::Metro,
        TransportMode::LightMetro,
        TransportMode::SuburbanTrain,
        TransportMode::Aeroexpress,
        TransportMode::Tram,
        TransportMode::Bus,
        TransportMode::Trolleybus,
        TransportMode::ShuttleBus,
        TransportMode::Monorail,
        TransportMode::FunicularRailway,
        TransportMode::RiverTransport,
        TransportMode::CableCar,
        TransportMode::LightRail,
        TransportMode::Premetro,
        TransportMode::Mcc,
        TransportMode::Mcd,
    ];
}

/// One waypoint of a route; `routes_names` lists the lines serving it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(default, deserialize_with = "null_as_default")]
    pub routes_names: Vec<String>,

    /// Provider fields we don't interpret, passed back to clients as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Waypoint {
    pub fn new<S: Into<String>>(routes_names: impl IntoIterator<Item = S>) -> Self {
        Self {
            routes_names: routes_names.into_iter().map(Into::into).collect(),
            extra: Map::new(),
        }
    }
}

/// A point-to-point route returned by the routing provider.
///
/// `workload` is absent until the workload annotator runs. Annotation only
/// ever sets that field; everything else, including unknown provider
/// fields in `extra`, round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    #[serde(rename = "pedestrian", default, deserialize_with = "null_as_default")]
    pub is_pedestrian: bool,

    /// Seconds.
    #[serde(default)]
    pub total_duration: Option<f64>,

    /// Meters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_distance: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub waypoints: Vec<Waypoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workload: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Providers send `null` for absent numbers and lists.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RouteCandidate {
    /// Duration used for ordering; a missing duration sorts last.
    pub fn duration_key(&self) -> f64 {
        self.total_duration.unwrap_or(f64::INFINITY)
    }

    /// Workload used for ordering; a missing workload sorts last.
    pub fn workload_key(&self) -> f64 {
        self.workload.unwrap_or(f64::INFINITY)
    }

    /// Every transit line named across all waypoints, in route order.
    pub fn transit_legs(&self) -> impl Iterator<Item = &str> {
        self.waypoints
            .iter()
            .flat_map(|w| w.routes_names.iter().map(String::as_str))
    }

    /// Provider-assigned identifier, when present.
    pub fn id(&self) -> Option<&str> {
        self.extra.get("id").and_then(Value::as_str)
    }
}

/// The three routes presented to the user.
///
/// Each field is independently `None` (JSON `null`) when nothing qualifies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub fastest_route: Option<RouteCandidate>,
    pub balanced_route: Option<RouteCandidate>,
    pub least_crowded_route: Option<RouteCandidate>,
}

impl SelectionResult {
    /// A result with no routes at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fastest_route.is_none()
            && self.balanced_route.is_none()
            && self.least_crowded_route.is_none()
    }
}
