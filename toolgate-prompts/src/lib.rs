//! Agent-facing instructions for toolgate servers.
//!
//! Instructions are a pure function of the enabled toolset identifiers.

#![warn(missing_docs, clippy::pedantic)]

pub mod instructions;

pub use instructions::{InstructionComposer, compose};
