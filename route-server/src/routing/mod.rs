//! Public-transport routing client.
//!
//! Sends a point-to-point request to the provider's public transport
//! endpoint and returns its ranked route candidates. The provider answers
//! with a bare JSON array; an empty body or `204 No Content` means no route.

mod client;
mod error;
mod types;

pub use client::{RouteRequest, RoutingClient, RoutingConfig};
pub use error::RoutingError;
pub use types::{EndpointDto, PointDto, RoutingRequestBody};
