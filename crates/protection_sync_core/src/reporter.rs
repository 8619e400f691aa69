//! Aggregation of reconciliation outcomes into a run summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::outcome::{OutcomeStatus, ReconciliationOutcome, RunMode};

#[cfg(test)]
#[path = "reporter_tests.rs"]
mod tests;

/// A branch that could not be protected, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub repository: String,
    pub branch: String,
    pub reason: String,
}

/// Totals for a reconciliation run.
///
/// Skipped branches are not failures: a run whose only problems are missing
/// branches exits cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Mode the run was made in
    pub mode: RunMode,

    /// Distinct repositories that produced at least one outcome
    pub repositories: usize,

    /// Branches whose protection was set
    pub applied: usize,

    /// Branches whose protection would be set (dry run)
    pub would_apply: usize,

    /// Branches that do not exist
    pub skipped_no_branch: usize,

    /// Branches that could not be protected
    pub failed: usize,

    /// Failed branches with their reasons, in run order
    pub failures: Vec<FailureRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    /// Records when the run started and finished.
    pub fn with_timing(mut self, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self.finished_at = Some(finished_at);
        self
    }

    /// Total number of branch outcomes.
    pub fn total(&self) -> usize {
        self.applied + self.would_apply + self.skipped_no_branch + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Process exit code for the run: 1 if any branch failed, otherwise 0.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }
}

/// Counts outcomes by kind and collects the failures.
pub fn summarize(outcomes: &[ReconciliationOutcome], mode: RunMode) -> RunSummary {
    let mut summary = RunSummary {
        mode,
        repositories: 0,
        applied: 0,
        would_apply: 0,
        skipped_no_branch: 0,
        failed: 0,
        failures: Vec::new(),
        started_at: None,
        finished_at: None,
    };

    let mut repositories = HashSet::new();
    for outcome in outcomes {
        repositories.insert(outcome.repository.as_str());

        match &outcome.status {
            OutcomeStatus::Applied => summary.applied += 1,
            OutcomeStatus::WouldApply(_) => summary.would_apply += 1,
            OutcomeStatus::SkippedNoBranch => summary.skipped_no_branch += 1,
            OutcomeStatus::Failed(reason) => {
                summary.failed += 1;
                summary.failures.push(FailureRecord {
                    repository: outcome.repository.clone(),
                    branch: outcome.branch.clone(),
                    reason: reason.clone(),
                });
            }
        }
    }
    summary.repositories = repositories.len();

    summary
}
