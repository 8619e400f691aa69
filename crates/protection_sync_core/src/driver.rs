//! Reconciliation driver.
//!
//! Walks the governed repositories, resolves and translates the protection for each
//! branch, and either records what would be applied (dry run) or applies it. Every
//! per-branch failure ends up in the outcome list; nothing here aborts a run.

use config_manager::GovernanceConfig;
use github_client::{BranchProtectionClient, RemoteProtectionPayload, RepositorySummary};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::outcome::{OutcomeStatus, ReconciliationOutcome, RunMode};
use crate::resolver::resolve;
use crate::translator::translate;

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;

/// Tuning for a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Repositories processed at the same time. Branches of one repository are
    /// always processed one after another. Values below 1 are treated as 1.
    pub max_concurrent_repositories: usize,

    /// Limit for each set-protection call; a call that exceeds it is recorded as
    /// failed.
    pub call_timeout: Option<Duration>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            max_concurrent_repositories: 1,
            call_timeout: None,
        }
    }
}

/// Applies governance configuration to repositories.
///
/// # Examples
///
/// ```rust,no_run
/// use config_manager::GovernanceConfig;
/// use github_client::{create_token_client, GitHubClient};
/// use protection_sync_core::{list_governed_repositories, Reconciler, RunMode};
/// use secrecy::SecretString;
/// use std::sync::Arc;
///
/// # async fn example(
/// #     token: SecretString,
/// #     config: GovernanceConfig,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// let client = Arc::new(GitHubClient::new(create_token_client(&token, None)?));
/// let repositories = list_governed_repositories(client.as_ref(), "my-org").await?;
///
/// let reconciler = Reconciler::new(client, "my-org");
/// let outcomes = reconciler.run(&config, &repositories, RunMode::DryRun).await;
/// println!("{} branch outcomes", outcomes.len());
/// # Ok(())
/// # }
/// ```
pub struct Reconciler<C: BranchProtectionClient + 'static> {
    client: Arc<C>,
    owner: String,
    options: ReconcileOptions,
}

impl<C: BranchProtectionClient + 'static> Reconciler<C> {
    /// Creates a reconciler for the repositories of `owner` with default options.
    pub fn new(client: Arc<C>, owner: impl Into<String>) -> Self {
        Self {
            client,
            owner: owner.into(),
            options: ReconcileOptions::default(),
        }
    }

    /// Replaces the run options.
    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Reconciles every repository and returns the per-branch outcomes.
    ///
    /// Outcomes are ordered by repository in the order given, then by branch name,
    /// whatever the concurrency. A repository without applicable protection
    /// contributes no outcomes.
    #[instrument(
        skip(self, config, repositories, mode),
        fields(owner = %self.owner, repositories = repositories.len(), mode = %mode)
    )]
    pub async fn run(
        &self,
        config: &GovernanceConfig,
        repositories: &[RepositorySummary],
        mode: RunMode,
    ) -> Vec<ReconciliationOutcome> {
        info!("Starting branch protection reconciliation");

        let outcomes = if self.options.max_concurrent_repositories <= 1 {
            self.run_sequential(config, repositories, mode).await
        } else {
            self.run_concurrent(config, repositories, mode).await
        };

        info!(outcomes = outcomes.len(), "Reconciliation pass complete");
        outcomes
    }

    async fn run_sequential(
        &self,
        config: &GovernanceConfig,
        repositories: &[RepositorySummary],
        mode: RunMode,
    ) -> Vec<ReconciliationOutcome> {
        let mut outcomes = Vec::new();
        for repository in repositories {
            outcomes.extend(
                reconcile_repository(
                    self.client.as_ref(),
                    &self.owner,
                    config,
                    &repository.name,
                    mode,
                    self.options.call_timeout,
                )
                .await,
            );
        }
        outcomes
    }

    async fn run_concurrent(
        &self,
        config: &GovernanceConfig,
        repositories: &[RepositorySummary],
        mode: RunMode,
    ) -> Vec<ReconciliationOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrent_repositories));
        let config = Arc::new(config.clone());
        let mut handles: Vec<(String, Option<JoinHandle<Vec<ReconciliationOutcome>>>)> =
            Vec::with_capacity(repositories.len());

        for repository in repositories {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!(repo = repository.name.as_str(), error = %e, "Worker pool closed");
                    handles.push((repository.name.clone(), None));
                    continue;
                }
            };

            let client = Arc::clone(&self.client);
            let owner = self.owner.clone();
            let config = Arc::clone(&config);
            let name = repository.name.clone();
            let call_timeout = self.options.call_timeout;

            let handle = tokio::spawn(async move {
                let _permit = permit;
                reconcile_repository(client.as_ref(), &owner, &config, &name, mode, call_timeout)
                    .await
            });
            handles.push((repository.name.clone(), Some(handle)));
        }

        // Joined in submission order so outcomes stay in enumeration order.
        let mut outcomes = Vec::new();
        for (name, handle) in handles {
            let reason = match handle {
                Some(handle) => match handle.await {
                    Ok(repository_outcomes) => {
                        outcomes.extend(repository_outcomes);
                        continue;
                    }
                    Err(e) => {
                        warn!(repo = name.as_str(), error = %e, "Repository task did not complete");
                        format!("reconciliation task failed: {}", e)
                    }
                },
                None => "worker pool closed".to_string(),
            };

            outcomes.extend(resolve(&config, &name).into_keys().map(|branch| {
                ReconciliationOutcome::new(
                    name.as_str(),
                    branch,
                    OutcomeStatus::Failed(reason.clone()),
                )
            }));
        }

        outcomes
    }
}

/// Reconciles the branches of a single repository, one branch at a time.
async fn reconcile_repository<C>(
    client: &C,
    owner: &str,
    config: &GovernanceConfig,
    repository: &str,
    mode: RunMode,
    call_timeout: Option<Duration>,
) -> Vec<ReconciliationOutcome>
where
    C: BranchProtectionClient + ?Sized,
{
    let policies = resolve(config, repository);
    if policies.is_empty() {
        debug!(repo = repository, "No branch protection configured, nothing to do");
        return Vec::new();
    }

    let mut outcomes = Vec::with_capacity(policies.len());
    for (branch, policy) in policies {
        let payload = translate(&policy);

        let status = match mode {
            RunMode::DryRun => {
                info!(repo = repository, branch = branch.as_str(), "Would apply branch protection");
                OutcomeStatus::WouldApply(payload)
            }
            RunMode::Execute => {
                apply_protection(client, owner, repository, &branch, &payload, call_timeout).await
            }
        };

        outcomes.push(ReconciliationOutcome::new(repository, branch, status));
    }

    outcomes
}

async fn apply_protection<C>(
    client: &C,
    owner: &str,
    repository: &str,
    branch: &str,
    payload: &RemoteProtectionPayload,
    call_timeout: Option<Duration>,
) -> OutcomeStatus
where
    C: BranchProtectionClient + ?Sized,
{
    let call = client.set_branch_protection(owner, repository, branch, payload);

    let result = match call_timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    repo = repository,
                    branch = branch,
                    timeout = ?limit,
                    "Timed out applying branch protection"
                );
                return OutcomeStatus::Failed(format!("timed out after {:?}", limit));
            }
        },
        None => call.await,
    };

    match result {
        Ok(()) => {
            info!(repo = repository, branch = branch, "Branch protection applied");
            OutcomeStatus::Applied
        }
        Err(e) if e.is_not_found() => {
            info!(
                repo = repository,
                branch = branch,
                "Branch does not exist, skipping"
            );
            OutcomeStatus::SkippedNoBranch
        }
        Err(e) => {
            warn!(
                repo = repository,
                branch = branch,
                error = ?e,
                "Failed to apply branch protection"
            );
            OutcomeStatus::Failed(e.to_string())
        }
    }
}
