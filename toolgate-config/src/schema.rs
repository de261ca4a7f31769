//! Strongly typed server configuration.

use serde::{Deserialize, Serialize};
use toolgate_primitives::KnownToolsets;
use toolgate_primitives::catalog::DEFAULT_KEYWORD;

use crate::specifier::{ExpansionMode, Resolution, resolve};

/// Settings that decide which toolsets a server starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Raw toolset specifiers, possibly containing `default` or `all`.
    pub toolsets: Vec<String>,
    /// Hide every write operation.
    pub read_only: bool,
    /// Register the runtime enablement meta-toolset.
    pub dynamic_toolsets: bool,
    /// Suppress generated instructions.
    pub disable_instructions: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            toolsets: vec![DEFAULT_KEYWORD.to_owned()],
            read_only: false,
            dynamic_toolsets: false,
            disable_instructions: false,
        }
    }
}

impl ServerConfig {
    /// Expansion mode implied by `dynamic_toolsets`.
    #[must_use]
    pub fn expansion_mode(&self) -> ExpansionMode {
        if self.dynamic_toolsets {
            ExpansionMode::Dynamic
        } else {
            ExpansionMode::Static
        }
    }

    /// Resolves the configured specifiers against the supplied universe.
    #[must_use]
    pub fn resolve_toolsets(&self, known: &KnownToolsets) -> Resolution {
        resolve(&self.toolsets, known, self.expansion_mode())
    }
}
