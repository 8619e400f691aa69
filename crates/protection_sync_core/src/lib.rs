//! Branch protection reconciliation.
//!
//! This crate holds the reconciliation engine: it decides which protection applies
//! to each branch of each repository ([`resolve`]), turns it into the body of the
//! set-protection call ([`translate`]), lists the repositories to govern
//! ([`list_governed_repositories`]), applies the protection with dry-run support
//! ([`Reconciler`]) and totals the results ([`summarize`]).
//!
//! Remote access goes through the [`github_client::BranchProtectionClient`] trait so
//! the engine can run against any implementation of it.

pub mod driver;
pub mod enumerator;
pub mod errors;
pub mod outcome;
pub mod reporter;
pub mod resolver;
pub mod translator;

#[cfg(test)]
mod test_support;

pub use driver::{ReconcileOptions, Reconciler};
pub use enumerator::{list_governed_repositories, select_repositories, REPOSITORY_PAGE_SIZE};
pub use errors::{ReconcileError, ReconcileResult};
pub use outcome::{OutcomeStatus, ReconciliationOutcome, RunMode};
pub use reporter::{summarize, FailureRecord, RunSummary};
pub use resolver::{resolve, resolve_default};
pub use translator::translate;
