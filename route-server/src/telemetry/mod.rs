//! Station workload telemetry client.
//!
//! An optional live signal: a single endpoint reporting the current
//! occupancy of a station on the same 0-60 scale the workload model uses.

mod client;
mod error;

pub use client::{TelemetryClient, TelemetryConfig, WorkloadResponse};
pub use error::TelemetryError;
