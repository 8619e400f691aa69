//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when talking to the GitHub API
//! through the github_client crate. The variants separate the conditions callers
//! react to differently: a missing resource, rate limiting, authentication problems
//! and every other remote failure.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::{BranchProtectionClient, Error};
///
/// match client.set_branch_protection("my-org", "my-repo", "develop", &payload).await {
///     Ok(()) => println!("Protection applied"),
///     Err(Error::NotFound) => println!("Branch does not exist, skipping"),
///     Err(Error::RateLimitExceeded) => eprintln!("Rate limit exceeded, retry later"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// GitHub rejected the request with a status this client has no dedicated variant for.
    ///
    /// Typical causes are validation failures (422) on a malformed protection payload
    /// or server-side errors (5xx).
    #[error("API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Authentication or GitHub client initialization failure.
    ///
    /// This error occurs when:
    /// - The access token is invalid, expired or revoked
    /// - The token lacks the permissions needed for the operation
    /// - The octocrab client could not be built
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Error deserializing the response from GitHub.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The GitHub API could not be reached or returned something that is not a
    /// GitHub API response.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource was not found.
    ///
    /// GitHub answers 404 when the repository or branch does not exist, or when
    /// the token is not allowed to see it.
    #[error("Resource not found")]
    NotFound,

    /// GitHub API rate limit has been exceeded.
    ///
    /// GitHub signals this either with a 429 or with a 403 whose message mentions
    /// the rate limit.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl Error {
    /// Returns `true` when the error means the addressed resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }

    /// Classifies a GitHub error response by HTTP status and message.
    pub(crate) fn from_status(status: u16, message: &str) -> Self {
        match status {
            404 => Error::NotFound,
            429 => Error::RateLimitExceeded,
            403 if message.to_ascii_lowercase().contains("rate limit") => {
                Error::RateLimitExceeded
            }
            401 | 403 => Error::AuthError(message.to_string()),
            _ => Error::ApiError {
                status,
                message: message.to_string(),
            },
        }
    }
}
