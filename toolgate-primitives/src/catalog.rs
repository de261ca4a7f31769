//! Catalog of the toolsets a server can expose.
//!
//! The catalog is the universe that configuration specifiers are validated
//! against. Handlers for the toolsets live with their collaborators; only
//! identifiers and descriptions are recorded here.

use serde::Serialize;

/// Reserved specifier that expands to the canonical default toolsets.
pub const DEFAULT_KEYWORD: &str = "default";

/// Reserved specifier that expands to every known toolset.
pub const ALL_KEYWORD: &str = "all";

/// Returns `true` when the token is one of the reserved keywords.
#[must_use]
pub fn is_keyword(token: &str) -> bool {
    token == DEFAULT_KEYWORD || token == ALL_KEYWORD
}

/// Identifier and description for a known toolset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ToolsetMetadata {
    /// Toolset identifier.
    pub id: &'static str,
    /// Human-readable description of the toolset's purpose.
    pub description: &'static str,
}

/// Current user and session context.
pub const CONTEXT: ToolsetMetadata = ToolsetMetadata {
    id: "context",
    description: "Tools that provide context about the current user and the environment you are operating in",
};
/// Repository contents, branches, commits and releases.
pub const REPOS: ToolsetMetadata = ToolsetMetadata {
    id: "repos",
    description: "Repository related tools",
};
/// Low-level git objects.
pub const GIT: ToolsetMetadata = ToolsetMetadata {
    id: "git",
    description: "Low-level Git operations on trees, blobs and references",
};
/// Issue tracking.
pub const ISSUES: ToolsetMetadata = ToolsetMetadata {
    id: "issues",
    description: "Issue related tools",
};
/// Pull requests and reviews.
pub const PULL_REQUESTS: ToolsetMetadata = ToolsetMetadata {
    id: "pull_requests",
    description: "Pull request related tools",
};
/// User lookup.
pub const USERS: ToolsetMetadata = ToolsetMetadata {
    id: "users",
    description: "User related tools",
};
/// Organization lookup.
pub const ORGS: ToolsetMetadata = ToolsetMetadata {
    id: "orgs",
    description: "Organization related tools",
};
/// Workflow runs and jobs.
pub const ACTIONS: ToolsetMetadata = ToolsetMetadata {
    id: "actions",
    description: "Workflow runs, jobs and artifacts",
};
/// Code scanning alerts.
pub const CODE_SECURITY: ToolsetMetadata = ToolsetMetadata {
    id: "code_security",
    description: "Code security related tools, such as code scanning",
};
/// Secret scanning alerts.
pub const SECRET_PROTECTION: ToolsetMetadata = ToolsetMetadata {
    id: "secret_protection",
    description: "Secret protection related tools, such as secret scanning",
};
/// Dependency alerts.
pub const DEPENDABOT: ToolsetMetadata = ToolsetMetadata {
    id: "dependabot",
    description: "Dependabot alert tools",
};
/// Notification inbox.
pub const NOTIFICATIONS: ToolsetMetadata = ToolsetMetadata {
    id: "notifications",
    description: "Notification related tools",
};
/// Discussions.
pub const DISCUSSIONS: ToolsetMetadata = ToolsetMetadata {
    id: "discussions",
    description: "Discussion related tools",
};
/// Gists.
pub const GISTS: ToolsetMetadata = ToolsetMetadata {
    id: "gists",
    description: "Gist related tools",
};
/// Published security advisories.
pub const SECURITY_ADVISORIES: ToolsetMetadata = ToolsetMetadata {
    id: "security_advisories",
    description: "Security advisory related tools",
};
/// Projects boards.
pub const PROJECTS: ToolsetMetadata = ToolsetMetadata {
    id: "projects",
    description: "Project related tools",
};
/// Stars.
pub const STARGAZERS: ToolsetMetadata = ToolsetMetadata {
    id: "stargazers",
    description: "Star related tools",
};
/// Labels.
pub const LABELS: ToolsetMetadata = ToolsetMetadata {
    id: "labels",
    description: "Label related tools",
};
/// Experimental operations that may change without notice.
pub const EXPERIMENTS: ToolsetMetadata = ToolsetMetadata {
    id: "experiments",
    description: "Experimental features that are not considered stable yet",
};

/// The runtime enablement meta-toolset. Not part of [`KnownToolsets::catalog`];
/// it is only registered when dynamic toolsets are turned on.
pub const DYNAMIC: ToolsetMetadata = ToolsetMetadata {
    id: "dynamic",
    description: "Discover tools that can help achieve tasks by enabling additional sets of tools; \
                  any toolset can be enabled on demand while this toolset is active",
};

/// Every toolset in the catalog, in listing order.
pub const CATALOG: &[ToolsetMetadata] = &[
    CONTEXT,
    REPOS,
    GIT,
    ISSUES,
    PULL_REQUESTS,
    USERS,
    ORGS,
    ACTIONS,
    CODE_SECURITY,
    SECRET_PROTECTION,
    DEPENDABOT,
    NOTIFICATIONS,
    DISCUSSIONS,
    GISTS,
    SECURITY_ADVISORIES,
    PROJECTS,
    STARGAZERS,
    LABELS,
    EXPERIMENTS,
];

/// Canonical toolsets enabled by the `default` keyword, in expansion order.
pub const DEFAULT_TOOLSETS: &[&str] = &[
    CONTEXT.id,
    REPOS.id,
    ISSUES.id,
    PULL_REQUESTS.id,
    USERS.id,
];

/// Ordered universe of toolset identifiers that specifiers are checked against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnownToolsets {
    ids: Vec<String>,
    defaults: Vec<String>,
}

impl KnownToolsets {
    /// Creates a universe from explicit identifiers and default members.
    ///
    /// Duplicate identifiers keep their first position. Defaults are kept in
    /// the order given.
    #[must_use]
    pub fn new<I, D, S, T>(ids: I, defaults: D) -> Self
    where
        I: IntoIterator<Item = S>,
        D: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into();
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self {
            ids: unique,
            defaults: defaults.into_iter().map(Into::into).collect(),
        }
    }

    /// Universe built from [`CATALOG`] and [`DEFAULT_TOOLSETS`].
    #[must_use]
    pub fn catalog() -> Self {
        Self::new(
            CATALOG.iter().map(|meta| meta.id),
            DEFAULT_TOOLSETS.iter().copied(),
        )
    }

    /// Returns `true` if the identifier is part of the universe.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    /// Every identifier, in catalog order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Canonical default identifiers, in expansion order.
    #[must_use]
    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }
}

impl Default for KnownToolsets {
    fn default() -> Self {
        Self::catalog()
    }
}

/// Looks up catalog metadata by identifier, including the meta-toolset.
#[must_use]
pub fn metadata(id: &str) -> Option<ToolsetMetadata> {
    CATALOG
        .iter()
        .chain(std::iter::once(&DYNAMIC))
        .find(|meta| meta.id == id)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolsetId;

    #[test]
    fn catalog_ids_are_valid_and_unique() {
        let known = KnownToolsets::catalog();
        assert_eq!(known.ids().len(), CATALOG.len());
        for id in known.ids() {
            ToolsetId::new(id.as_str()).expect("catalog id must validate");
            assert!(!is_keyword(id));
        }
        assert!(!known.contains(DYNAMIC.id));
    }

    #[test]
    fn defaults_are_members() {
        let known = KnownToolsets::catalog();
        assert_eq!(
            known.defaults(),
            ["context", "repos", "issues", "pull_requests", "users"]
        );
        assert!(known.defaults().iter().all(|id| known.contains(id)));
    }

    #[test]
    fn metadata_lookup_covers_meta_toolset() {
        assert_eq!(metadata("gists"), Some(GISTS));
        assert_eq!(metadata("dynamic").map(|m| m.id), Some("dynamic"));
        assert!(metadata("typo_repo").is_none());
    }
}
