//! Toolset specifier normalization and keyword expansion.

use std::collections::HashSet;

use toolgate_primitives::KnownToolsets;
use toolgate_primitives::catalog::{ALL_KEYWORD, DEFAULT_KEYWORD, is_keyword};
use tracing::warn;

/// How the `all` keyword is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionMode {
    /// `all` enables every known toolset up front.
    #[default]
    Static,
    /// Toolsets are enabled on demand at runtime, so `all` is dropped and
    /// contributes nothing to the initial set.
    Dynamic,
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Trimmed, de-duplicated specifiers in first-seen order. Keywords and
    /// unknown tokens are kept.
    pub cleaned: Vec<String>,
    /// Tokens that are neither keywords nor known toolset IDs, in order of
    /// first occurrence. Every entry is also present in `cleaned`.
    pub invalid: Vec<String>,
}

/// Final enabled set plus the specifiers that matched nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Toolset IDs to enable. Never contains `default` or `all`.
    pub enabled: Vec<String>,
    /// Unknown specifiers, reported rather than dropped.
    pub invalid: Vec<String>,
}

/// Splits a comma-separated setting such as `repos, issues,default`.
///
/// Entries are not trimmed here; [`normalize`] does that.
#[must_use]
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_owned).collect()
}

/// Trims, drops empties, de-duplicates, and validates specifiers.
pub fn normalize<S>(raw: &[S], known: &KnownToolsets) -> Normalized
where
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut normalized = Normalized::default();

    for specifier in raw {
        let trimmed = specifier.as_ref().trim();
        if trimmed.is_empty() || !seen.insert(trimmed) {
            continue;
        }
        normalized.cleaned.push(trimmed.to_owned());
        if !is_keyword(trimmed) && !known.contains(trimmed) {
            normalized.invalid.push(trimmed.to_owned());
        }
    }

    normalized
}

/// Expands `default` and `all` into concrete toolset IDs.
///
/// The rules are applied once: `all` yields every known ID in catalog
/// order; otherwise `default` is replaced by the canonical defaults, placed
/// after the explicit IDs and skipping any already requested.
pub fn expand<S>(cleaned: &[S], known: &KnownToolsets, mode: ExpansionMode) -> Vec<String>
where
    S: AsRef<str>,
{
    let tokens: Vec<&str> = cleaned
        .iter()
        .map(|token| token.as_ref())
        .filter(|token| mode == ExpansionMode::Static || *token != ALL_KEYWORD)
        .collect();

    if tokens.contains(&ALL_KEYWORD) {
        return known.ids().to_vec();
    }

    let mut seen = HashSet::new();
    let mut expanded: Vec<String> = tokens
        .iter()
        .filter(|token| **token != DEFAULT_KEYWORD && seen.insert(**token))
        .map(|token| (*token).to_owned())
        .collect();

    if tokens.contains(&DEFAULT_KEYWORD) {
        for id in known.defaults() {
            if seen.insert(id.as_str()) {
                expanded.push(id.clone());
            }
        }
    }

    expanded
}

/// Normalizes and expands raw specifiers, logging any invalid entries.
pub fn resolve<S>(raw: &[S], known: &KnownToolsets, mode: ExpansionMode) -> Resolution
where
    S: AsRef<str>,
{
    let Normalized { cleaned, invalid } = normalize(raw, known);
    if !invalid.is_empty() {
        warn!(invalid = ?invalid, "ignoring unknown toolsets");
    }
    Resolution {
        enabled: expand(&cleaned, known, mode),
        invalid,
    }
}
