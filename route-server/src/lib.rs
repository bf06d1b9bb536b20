//! Public transit route planner server.
//!
//! A web service that answers: "how do I get from this point to that one
//! by public transport?" with the fastest, the least crowded and a
//! balanced route.

pub mod catalog;
pub mod domain;
pub mod planner;
pub mod routing;
pub mod settings;
pub mod telemetry;
pub mod web;
