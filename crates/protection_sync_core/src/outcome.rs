//! Per-branch reconciliation outcomes and the run mode that produces them.

use github_client::RemoteProtectionPayload;
use serde::Serialize;
use std::fmt;

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;

/// Whether a run mutates remote state.
///
/// There is deliberately no default: callers must choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Compute and report the protection that would be applied. No remote calls.
    DryRun,

    /// Apply the protection to every governed branch.
    Execute,
}

impl RunMode {
    /// Returns true when the run must not touch remote state.
    pub fn is_dry_run(&self) -> bool {
        matches!(self, RunMode::DryRun)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::DryRun => write!(f, "dry-run"),
            RunMode::Execute => write!(f, "execute"),
        }
    }
}

/// What happened to one branch of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The protection was set.
    Applied,

    /// Dry run; carries the payload that would have been sent.
    WouldApply(RemoteProtectionPayload),

    /// The branch does not exist in the repository.
    SkippedNoBranch,

    /// The protection could not be set.
    Failed(String),
}

impl OutcomeStatus {
    /// Short label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeStatus::Applied => "applied",
            OutcomeStatus::WouldApply(_) => "would apply",
            OutcomeStatus::SkippedNoBranch => "skipped (no branch)",
            OutcomeStatus::Failed(_) => "failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, OutcomeStatus::Failed(_))
    }
}

/// Outcome for a (repository, branch) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationOutcome {
    /// Repository name, without the owner
    pub repository: String,

    /// Branch name
    pub branch: String,

    /// What happened
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl ReconciliationOutcome {
    pub fn new(
        repository: impl Into<String>,
        branch: impl Into<String>,
        status: OutcomeStatus,
    ) -> Self {
        Self {
            repository: repository.into(),
            branch: branch.into(),
            status,
        }
    }
}
