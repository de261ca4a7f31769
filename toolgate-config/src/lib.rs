//! Configuration for toolgate servers.
//!
//! Raw toolset specifiers flow through [`specifier::normalize`] and
//! [`specifier::expand`] before the registry is built. Normalization and
//! expansion never fail; problems are reported alongside the result.

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod loader;
pub mod schema;
pub mod specifier;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Overrides};
pub use schema::ServerConfig;
pub use specifier::{ExpansionMode, Normalized, Resolution, expand, normalize, parse_list, resolve};
