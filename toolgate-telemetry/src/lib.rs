//! Observability utilities for toolgate servers.

#![warn(missing_docs, clippy::pedantic)]

pub mod tracing_support;

pub use tracing_support::{TelemetryError, TelemetryResult, TracingConfig, init};
