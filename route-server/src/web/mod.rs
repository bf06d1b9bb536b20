//! Web layer for the route planner.
//!
//! Exposes route building plus health and status endpoints as JSON over
//! HTTP.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, Planner};
