//! Crate for interacting with the GitHub REST API.
//!
//! This crate provides the narrow slice of the GitHub API that branch protection
//! reconciliation needs: listing the repositories of an organization, and reading and
//! writing the classic protection of a branch. The operations are exposed through the
//! [`BranchProtectionClient`] trait so callers can substitute an in-memory fake in tests.
//! [`GitHubClient`] is the octocrab-backed implementation.

use async_trait::async_trait;
use octocrab::{Octocrab, Result as OctocrabResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument, warn};

pub mod branch_protection;
pub mod errors;
pub mod repository;

pub use branch_protection::{
    BranchProtection, BranchRestrictions, EnabledSetting, RemoteProtectionPayload,
    RequiredPullRequestReviews, RequiredStatusChecks, RestrictionsState, SlugRef,
    StatusChecksState, UserRef,
};
pub use errors::Error;
pub use repository::RepositorySummary;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// The remote operations branch protection reconciliation depends on.
///
/// Transport concerns (authentication, HTTP retries) live beneath this trait. Every
/// method is idempotent from the caller's point of view: setting the same protection
/// twice leaves the branch in the same state.
#[async_trait]
pub trait BranchProtectionClient: Send + Sync {
    /// Lists one page of the repositories owned by an organization.
    ///
    /// # Arguments
    ///
    /// * `org` - The organization login.
    /// * `page` - The 1-based page number.
    /// * `per_page` - The page size, at most 100.
    ///
    /// # Returns
    ///
    /// The repositories on the requested page. An empty vector means the listing is
    /// exhausted.
    async fn list_organization_repositories(
        &self,
        org: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<RepositorySummary>, Error>;

    /// Fetches the current protection of a branch.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` when the branch does not exist or is not protected.
    async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<BranchProtection, Error>;

    /// Replaces the protection of a branch with `payload`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` when the repository or branch does not exist. Other
    /// failures (validation, permissions, rate limits) map to the remaining variants
    /// of [`Error`].
    async fn set_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        payload: &RemoteProtectionPayload,
    ) -> Result<(), Error>;
}

/// A client for interacting with the GitHub API, authenticated with an access token.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Wraps an already authenticated `Octocrab` instance.
    ///
    /// Use [`create_token_client`] to build one from an access token.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BranchProtectionClient for GitHubClient {
    #[instrument(skip(self), fields(org = %org, page, per_page))]
    async fn list_organization_repositories(
        &self,
        org: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<RepositorySummary>, Error> {
        debug!(org = org, page = page, "Fetching page of organization repositories");

        let result = self
            .client
            .orgs(org)
            .list_repos()
            .repo_type(octocrab::params::repos::Type::All)
            .per_page(per_page)
            .page(page)
            .send()
            .await;

        match result {
            Ok(repos) => {
                let summaries: Vec<RepositorySummary> = repos
                    .items
                    .into_iter()
                    .map(RepositorySummary::from)
                    .collect();

                debug!(
                    org = org,
                    page = page,
                    count = summaries.len(),
                    "Retrieved page of organization repositories"
                );

                Ok(summaries)
            }
            Err(e) => {
                log_octocrab_error("Failed to list organization repositories", &e);
                Err(map_octocrab_error(e))
            }
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<BranchProtection, Error> {
        let path = protection_path(owner, repo, branch);

        debug!("Making API call to: {}", path);
        let response: OctocrabResult<BranchProtection> = self.client.get(path, None::<&()>).await;

        match response {
            Ok(protection) => Ok(protection),
            Err(e) => {
                log_octocrab_error("Failed to get branch protection", &e);
                Err(map_octocrab_error(e))
            }
        }
    }

    #[instrument(skip(self, payload), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn set_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        payload: &RemoteProtectionPayload,
    ) -> Result<(), Error> {
        let path = protection_path(owner, repo, branch);

        debug!("Making API call to: {}", path);
        let response: OctocrabResult<serde_json::Value> =
            self.client.put(path, Some(payload)).await;

        match response {
            Ok(_) => {
                debug!("Branch protection updated");
                Ok(())
            }
            Err(e) => {
                log_octocrab_error("Failed to update branch protection", &e);
                Err(map_octocrab_error(e))
            }
        }
    }
}

/// Creates an `Octocrab` client authenticated with a personal or installation access token.
///
/// # Arguments
///
/// * `token` - The access token.
/// * `base_url` - Optional API base URL, for GitHub Enterprise Server or test servers.
///   Defaults to `https://api.github.com`.
///
/// # Errors
///
/// Returns `Error::AuthError` if the base URL is invalid or the client cannot be built.
///
/// # Example
///
/// ```rust,no_run
/// use github_client::{create_token_client, GitHubClient};
/// use secrecy::SecretString;
///
/// # fn example() -> Result<(), github_client::Error> {
/// let token = SecretString::from("ghp_example".to_string());
/// let octocrab = create_token_client(&token, None)?;
/// let client = GitHubClient::new(octocrab);
/// # Ok(())
/// # }
/// ```
#[instrument(skip(token))]
pub fn create_token_client(
    token: &SecretString,
    base_url: Option<&str>,
) -> Result<Octocrab, Error> {
    let mut builder = Octocrab::builder().personal_token(token.expose_secret().to_string());

    if let Some(url) = base_url {
        builder = builder.base_uri(url).map_err(|e| {
            error!(base_url = url, error = %e, "Invalid GitHub API base URL");
            Error::AuthError(format!("Invalid GitHub API base URL '{}': {}", url, e))
        })?;
    }

    builder.build().map_err(|e| {
        error!(error = ?e, "Failed to build Octocrab client with access token");
        Error::AuthError(format!("Failed to build GitHub client: {}", e))
    })
}

/// Characters escaped inside a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn protection_path(owner: &str, repo: &str, branch: &str) -> String {
    format!(
        "/repos/{}/{}/branches/{}/protection",
        utf8_percent_encode(owner, PATH_SEGMENT),
        utf8_percent_encode(repo, PATH_SEGMENT),
        utf8_percent_encode(branch, PATH_SEGMENT)
    )
}

/// Maps an octocrab failure onto this crate's error taxonomy.
fn map_octocrab_error(e: octocrab::Error) -> Error {
    match e {
        octocrab::Error::GitHub { source, .. } => {
            Error::from_status(source.status_code.as_u16(), &source.message)
        }
        octocrab::Error::Serde { source, .. } => Error::Deserialization(source),
        _ => Error::InvalidResponse,
    }
}

fn log_octocrab_error(message: &str, e: &octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, .. } => {
            // 404s are expected for branches missing from some repositories.
            if source.status_code.as_u16() == 404 {
                debug!(
                    error_message = source.message,
                    "{}. GitHub reported the resource as not found",
                    message
                );
            } else {
                warn!(
                    error_message = source.message,
                    status = source.status_code.as_u16(),
                    "{}. Received an error from GitHub",
                    message
                );
            }
        }
        octocrab::Error::UriParse { source, .. } => error!(
            error_message = source.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, .. } => error!(
            error_message = source.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::Serde { source, .. } => error!(
            error_message = source.to_string(),
            "{}. The response could not be decoded.",
            message
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
