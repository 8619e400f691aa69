//! Repository domain types.
//!
//! This module contains the repository listing type returned by organization
//! repository enumeration.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;

/// Minimal description of a repository in an organization listing.
///
/// Only the fields needed to decide whether a repository is governed are kept;
/// the rest of GitHub's repository document is dropped at the client boundary.
///
/// # Examples
///
/// ```rust
/// use github_client::RepositorySummary;
///
/// let repo = RepositorySummary::new("payments-api", false);
/// assert_eq!(repo.name, "payments-api");
/// assert!(!repo.archived);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// The name of the repository, without the owner
    pub name: String,

    /// Whether the repository is archived (read-only)
    #[serde(default)]
    pub archived: bool,
}

impl RepositorySummary {
    /// Creates a new summary.
    pub fn new(name: impl Into<String>, archived: bool) -> Self {
        Self {
            name: name.into(),
            archived,
        }
    }
}

impl From<octocrab::models::Repository> for RepositorySummary {
    fn from(value: octocrab::models::Repository) -> Self {
        Self {
            name: value.name,
            archived: value.archived.unwrap_or(false),
        }
    }
}
