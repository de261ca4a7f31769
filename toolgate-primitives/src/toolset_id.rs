//! Toolset identifiers.

use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const MAX_ID_LEN: usize = 64;

/// Identifier for a named group of operations, e.g. `issues` or `repos`.
///
/// Identifiers are short lowercase tokens and are immutable once assigned
/// to a toolset.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolsetId(String);

impl ToolsetId {
    /// Creates a new toolset identifier after validating its format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToolsetId`] if the supplied identifier is empty,
    /// too long, or contains unsupported characters.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_identifier(&id)?;
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ToolsetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ToolsetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ToolsetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for ToolsetId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ToolsetId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ToolsetId> for String {
    fn from(value: ToolsetId) -> Self {
        value.0
    }
}

fn validate_identifier(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidToolsetId {
            id: String::new(),
            reason: "identifier cannot be empty".into(),
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(Error::InvalidToolsetId {
            id: id.into(),
            reason: format!("identifier length must be <= {MAX_ID_LEN}"),
        });
    }

    if !id
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '-' | '_'))
    {
        return Err(Error::InvalidToolsetId {
            id: id.into(),
            reason: "identifier must contain lowercase alphanumeric, dash, or underscore".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_tokens() {
        let id = ToolsetId::new("pull_requests").expect("id");
        assert_eq!(id.as_str(), "pull_requests");
        assert_eq!(id.to_string(), "pull_requests");
    }

    #[test]
    fn rejects_malformed_tokens() {
        for raw in ["", "Issues", "pull requests", "repos.read"] {
            let err = ToolsetId::new(raw).expect_err("should fail");
            assert!(matches!(err, Error::InvalidToolsetId { .. }), "{raw}");
        }

        let long = "x".repeat(MAX_ID_LEN + 1);
        assert!(ToolsetId::new(long).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let id: ToolsetId = serde_json::from_str("\"gists\"").expect("valid");
        assert_eq!(id.as_str(), "gists");
        assert!(serde_json::from_str::<ToolsetId>("\"Gists\"").is_err());
    }
}
