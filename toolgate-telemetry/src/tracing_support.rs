//! Structured tracing helpers.
//!
//! Output goes to stderr so stdout stays free for protocol traffic.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Result alias for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback filter directive did not parse.
    #[error("invalid log directive `{directive}`: {source}")]
    InvalidDirective {
        /// Offending directive.
        directive: String,
        /// Parser error.
        #[source]
        source: ParseError,
    },

    /// A global subscriber is already installed.
    #[error("tracing subscriber already initialised: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    default_directive: String,
    with_target: bool,
    ansi: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".to_owned(),
            with_target: false,
            ansi: true,
        }
    }
}

impl TracingConfig {
    /// Directive used when `RUST_LOG` is unset or unparsable.
    #[must_use]
    pub fn with_default_directive(mut self, directive: impl Into<String>) -> Self {
        self.default_directive = directive.into();
        self
    }

    /// Include the event target in each line.
    #[must_use]
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Toggle ANSI colouring.
    #[must_use]
    pub fn with_ansi(mut self, enabled: bool) -> Self {
        self.ansi = enabled;
        self
    }

    /// Fallback directive.
    #[must_use]
    pub fn default_directive(&self) -> &str {
        &self.default_directive
    }

    /// Builds the filter, preferring `RUST_LOG`.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidDirective`] when `RUST_LOG` is unusable
    /// and the fallback directive does not parse either.
    pub fn filter(&self) -> TelemetryResult<EnvFilter> {
        EnvFilter::try_from_default_env().or_else(|_| {
            EnvFilter::try_new(&self.default_directive).map_err(|source| {
                TelemetryError::InvalidDirective {
                    directive: self.default_directive.clone(),
                    source,
                }
            })
        })
    }
}

/// Installs the global fmt subscriber.
///
/// # Errors
///
/// Fails when the filter cannot be built or a subscriber is already set.
pub fn init(config: &TracingConfig) -> TelemetryResult<()> {
    let filter = config.filter()?;
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(config.with_target)
                .with_ansi(config.ansi),
        )
        .with(filter)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = TracingConfig::default()
            .with_default_directive("toolgate=debug")
            .with_target(true)
            .with_ansi(false);
        assert_eq!(config.default_directive(), "toolgate=debug");
        assert!(config.with_target);
        assert!(!config.ansi);
    }

    #[test]
    fn second_init_is_an_error() {
        let config = TracingConfig::default().with_ansi(false);
        // The first call may lose a race with other tests; the second never succeeds.
        let _ = init(&config);
        assert!(matches!(
            init(&config),
            Err(TelemetryError::AlreadyInitialized(_))
        ));
    }
}
