//! Instruction text composed from the enabled toolsets.

use tracing::debug;

/// Joins the baseline and each fragment.
pub const SEPARATOR: &str = " ";

/// Always-present guidance.
pub const BASELINE: &str = "\
This server exposes tools grouped into toolsets for working with repositories, issues, \
pull requests and related resources.

Tool selection:
  1. Prefer 'list_*' tools for plain retrieval of every item of a kind with simple filters.
  2. Prefer 'search_*' tools for targeted queries with keywords or complex criteria.

Context management:
  1. Paginate with small batches of 5-10 items.
  2. Ask for minimal output when the full payload is not needed.

Search queries carry only search criteria; pass sorting through the separate 'sort' and \
'order' parameters.";

/// Per-toolset fragments, in composition order.
const FRAGMENTS: &[(&str, &str)] = &[
    (
        "context",
        "Call 'get_me' first to learn the current user's identity and permissions.",
    ),
    (
        "issues",
        "## Issues\n\nSearch existing issues before opening a new one to avoid duplicates. \
         Check the available issue types for organizations, and always give a state reason \
         when closing an issue.",
    ),
    (
        "pull_requests",
        "## Pull Requests\n\nFor reviews with line comments, create a pending review, add \
         comments to it, then submit it. Before opening a pull request, look for a pull \
         request template in the repository and follow it.",
    ),
    (
        "discussions",
        "## Discussions\n\nList the discussion categories before creating a discussion and \
         filter by category when browsing.",
    ),
    (
        "projects",
        "## Projects\n\nList project fields before reading or updating items so field \
         identifiers are known; paginate item listings.",
    ),
    (
        "actions",
        "## Actions\n\nFetch job logs only for failed jobs and keep log tails short.",
    ),
];

/// Looks up the fragment for a toolset identifier.
#[must_use]
pub fn fragment(id: &str) -> Option<&'static str> {
    FRAGMENTS
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, text)| *text)
}

/// Composes instructions for the given enabled toolsets.
///
/// Fragments follow the fixed table order, so the result depends only on
/// which identifiers are present. Unknown identifiers contribute nothing.
#[must_use]
pub fn compose<S>(enabled: &[S]) -> String
where
    S: AsRef<str>,
{
    let mut parts = vec![BASELINE];
    parts.extend(
        FRAGMENTS
            .iter()
            .filter(|(id, _)| enabled.iter().any(|e| e.as_ref() == *id))
            .map(|(_, text)| *text),
    );
    debug!(fragments = parts.len() - 1, "instructions composed");
    parts.join(SEPARATOR)
}

/// Composer carrying the instruction-free override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstructionComposer {
    disabled: bool,
}

impl InstructionComposer {
    /// Creates a composer; `disabled` forces empty output.
    #[must_use]
    pub const fn new(disabled: bool) -> Self {
        Self { disabled }
    }

    /// Composes instructions unless disabled.
    #[must_use]
    pub fn compose<S>(self, enabled: &[S]) -> String
    where
        S: AsRef<str>,
    {
        if self.disabled {
            return String::new();
        }
        compose(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_only_without_fragments() {
        let none: [&str; 0] = [];
        assert_eq!(compose(&none), BASELINE);
        assert_eq!(compose(&["gists", "typo_repo"]), BASELINE);
    }

    #[test]
    fn fragments_follow_table_order() {
        let forward = compose(&["context", "issues", "pull_requests"]);
        let reversed = compose(&["pull_requests", "issues", "context"]);
        assert_eq!(forward, reversed);

        let issues = forward.find("## Issues").unwrap();
        let prs = forward.find("## Pull Requests").unwrap();
        let me = forward.find("get_me").unwrap();
        assert!(me < issues && issues < prs);
        assert!(forward.starts_with(BASELINE));
    }

    #[test]
    fn joins_with_single_separator() {
        let text = compose(&["actions"]);
        let expected = format!("{BASELINE}{SEPARATOR}{}", fragment("actions").unwrap());
        assert_eq!(text, expected);
    }

    #[test]
    fn disabled_composer_is_empty() {
        let composer = InstructionComposer::new(true);
        assert!(composer.compose(&["issues"]).is_empty());
        assert_eq!(
            InstructionComposer::new(false).compose(&["issues"]),
            compose(&["issues"])
        );
    }
}
