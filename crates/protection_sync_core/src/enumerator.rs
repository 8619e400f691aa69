//! Repository enumeration for an organization.

use github_client::{BranchProtectionClient, RepositorySummary};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

use crate::errors::{ReconcileError, ReconcileResult};

#[cfg(test)]
#[path = "enumerator_tests.rs"]
mod tests;

/// Number of repositories requested per page.
pub const REPOSITORY_PAGE_SIZE: u8 = 100;

/// Lists every non-archived repository in an organization.
///
/// Pages are requested from page 1 until a page comes back empty or shorter than
/// [`REPOSITORY_PAGE_SIZE`]. Archived repositories are dropped. The listing order of
/// the remote is kept.
///
/// # Errors
///
/// Returns `ReconcileError::EnumerationFailure` if any page cannot be fetched. No
/// partial listing is returned.
#[instrument(skip(client), fields(org = org))]
pub async fn list_governed_repositories<C>(
    client: &C,
    org: &str,
) -> ReconcileResult<Vec<RepositorySummary>>
where
    C: BranchProtectionClient + ?Sized,
{
    let mut governed = Vec::new();
    let mut archived = 0usize;
    let mut page = 1u32;

    loop {
        let batch = client
            .list_organization_repositories(org, page, REPOSITORY_PAGE_SIZE)
            .await
            .map_err(|e| {
                warn!(org = org, page = page, error = ?e, "Failed to list repositories");
                ReconcileError::EnumerationFailure {
                    org: org.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let batch_len = batch.len();
        debug!(page = page, count = batch_len, "Fetched repository page");

        for repository in batch {
            if repository.archived {
                debug!(repo = repository.name.as_str(), "Skipping archived repository");
                archived += 1;
                continue;
            }
            governed.push(repository);
        }

        if batch_len < usize::from(REPOSITORY_PAGE_SIZE) {
            break;
        }
        page += 1;
    }

    info!(
        org = org,
        governed = governed.len(),
        archived = archived,
        "Repository enumeration complete"
    );

    Ok(governed)
}

/// Restricts an enumeration to the named repositories.
///
/// An empty name list keeps everything. Names that do not match an enumerated
/// repository are logged and ignored. Enumeration order is kept.
pub fn select_repositories(
    repositories: Vec<RepositorySummary>,
    names: &[String],
) -> Vec<RepositorySummary> {
    if names.is_empty() {
        return repositories;
    }

    let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
    let selected: Vec<RepositorySummary> = repositories
        .into_iter()
        .filter(|r| wanted.contains(r.name.as_str()))
        .collect();

    for name in names {
        if !selected.iter().any(|r| &r.name == name) {
            warn!(
                repo = name.as_str(),
                "Requested repository was not found among governed repositories"
            );
        }
    }

    selected
}
