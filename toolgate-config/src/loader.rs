//! Configuration loading from the environment and command-line overrides.

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::schema::ServerConfig;
use crate::specifier::parse_list;

/// Comma-separated toolset specifiers.
pub const ENV_TOOLSETS: &str = "TOOLGATE_TOOLSETS";
/// Boolean: hide write operations.
pub const ENV_READ_ONLY: &str = "TOOLGATE_READ_ONLY";
/// Boolean: register the runtime enablement meta-toolset.
pub const ENV_DYNAMIC_TOOLSETS: &str = "TOOLGATE_DYNAMIC_TOOLSETS";
/// Boolean: suppress generated instructions.
pub const ENV_DISABLE_INSTRUCTIONS: &str = "TOOLGATE_DISABLE_INSTRUCTIONS";

/// Values supplied explicitly, e.g. from command-line flags. `None` leaves
/// the environment value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Raw specifiers replacing the configured list.
    pub toolsets: Option<Vec<String>>,
    /// Read-only override.
    pub read_only: Option<bool>,
    /// Dynamic toolsets override.
    pub dynamic_toolsets: Option<bool>,
}

/// Builds a [`ServerConfig`] from a key lookup and optional overrides.
pub struct ConfigLoader<F> {
    lookup: F,
}

impl ConfigLoader<fn(&str) -> Option<String>> {
    /// Loader backed by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            lookup: |key| std::env::var(key).ok(),
        }
    }
}

impl<F> ConfigLoader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Loader backed by an arbitrary lookup, used for tests and embedding.
    #[must_use]
    pub fn with_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    /// Reads every setting, falling back to [`ServerConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBool`] when a boolean setting holds an
    /// unrecognised value.
    pub fn load(&self) -> ConfigResult<ServerConfig> {
        let mut config = ServerConfig::default();
        if let Some(raw) = (self.lookup)(ENV_TOOLSETS) {
            config.toolsets = parse_list(&raw);
        }
        if let Some(flag) = self.flag(ENV_READ_ONLY)? {
            config.read_only = flag;
        }
        if let Some(flag) = self.flag(ENV_DYNAMIC_TOOLSETS)? {
            config.dynamic_toolsets = flag;
        }
        if let Some(flag) = self.flag(ENV_DISABLE_INSTRUCTIONS)? {
            config.disable_instructions = flag;
        }
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Reads settings and then applies explicit overrides.
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load`].
    pub fn load_with(&self, overrides: Overrides) -> ConfigResult<ServerConfig> {
        let mut config = self.load()?;
        if let Some(toolsets) = overrides.toolsets {
            config.toolsets = toolsets;
        }
        if let Some(read_only) = overrides.read_only {
            config.read_only = read_only;
        }
        if let Some(dynamic) = overrides.dynamic_toolsets {
            config.dynamic_toolsets = dynamic;
        }
        Ok(config)
    }

    fn flag(&self, key: &str) -> ConfigResult<Option<bool>> {
        (self.lookup)(key)
            .map(|value| parse_bool(key, &value))
            .transpose()
    }
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_owned(),
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn loader(
        vars: &[(&str, &str)],
    ) -> ConfigLoader<impl Fn(&str) -> Option<String>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ConfigLoader::with_lookup(move |key: &str| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(loader(&[]).load().unwrap(), ServerConfig::default());
    }

    #[test]
    fn reads_every_setting() {
        let config = loader(&[
            (ENV_TOOLSETS, "repos, issues"),
            (ENV_READ_ONLY, "true"),
            (ENV_DYNAMIC_TOOLSETS, "1"),
            (ENV_DISABLE_INSTRUCTIONS, "off"),
        ])
        .load()
        .unwrap();
        assert_eq!(config.toolsets, ["repos", " issues"]);
        assert!(config.read_only);
        assert!(config.dynamic_toolsets);
        assert!(!config.disable_instructions);
    }

    #[test]
    fn rejects_garbage_booleans() {
        let err = loader(&[(ENV_READ_ONLY, "maybe")]).load().unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBool {
                key: ENV_READ_ONLY.into(),
                value: "maybe".into(),
            }
        );
    }

    #[test]
    fn overrides_win() {
        let config = loader(&[(ENV_TOOLSETS, "repos"), (ENV_READ_ONLY, "yes")])
            .load_with(Overrides {
                toolsets: Some(vec!["gists".into()]),
                read_only: Some(false),
                dynamic_toolsets: None,
            })
            .unwrap();
        assert_eq!(config.toolsets, ["gists"]);
        assert!(!config.read_only);
        assert!(!config.dynamic_toolsets);
    }
}
