//! Serving core for toolgate.
//!
//! [`ServerBuilder`] resolves configuration into an enabled toolset set,
//! wires the registry and the optional runtime enablement toolset, and
//! composes instructions. [`Server`] dispatches calls by operation name,
//! consulting the registry on every call so runtime enablement takes effect
//! immediately.

#![warn(missing_docs, clippy::pedantic)]

mod advertised;
pub mod dynamic;
mod envelope;
mod error;
mod scheduler;
mod server;

pub use advertised::{AdvertisedTools, ToolListEvent};
pub use dynamic::dynamic_toolset;
pub use envelope::CallResponse;
pub use error::{ServerError, ServerResult};
pub use scheduler::{SchedulerConfig, SchedulerError, SchedulerResult, TaskScheduler};
pub use server::{Server, ServerBuilder};
