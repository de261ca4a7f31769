//! Toolset capability registry with runtime enablement.
//!
//! Depend on this crate via `cargo add toolgate`. It bundles the workspace
//! crates behind feature flags so embedders can take only the pieces they
//! need, e.g. just `config` for specifier resolution.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use toolgate_primitives as primitives;

/// Server wiring and dispatch (enabled by `kernel` feature).
#[cfg(feature = "kernel")]
pub use toolgate_kernel as kernel;

/// Operations, toolsets, and the registry (enabled by `tools` feature).
#[cfg(feature = "tools")]
pub use toolgate_tools as tools;

/// Logging setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use toolgate_telemetry as telemetry;

/// Instruction composition (enabled by `prompts` feature).
#[cfg(feature = "prompts")]
pub use toolgate_prompts as prompts;

/// Configuration and specifier resolution (enabled by `config` feature).
#[cfg(feature = "config")]
pub use toolgate_config as config;
