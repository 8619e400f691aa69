//! The `sync` command: reconcile branch protection across an organization.
//!
//! # Examples
//!
//! ```bash
//! # Preview what would change
//! protection-sync sync --org myorg --config branch-protection-rules.yaml --mode dry-run
//!
//! # Apply to two repositories, four at a time
//! protection-sync sync --org myorg --config rules.toml --mode execute \
//!     --repo payments-api --repo web --concurrency 4
//! ```

use chrono::Utc;
use clap::Args;
use colored::Colorize;
use config_manager::GovernanceConfig;
use github_client::BranchProtectionClient;
use protection_sync_core::{
    list_governed_repositories, select_repositories, summarize, OutcomeStatus, ReconcileOptions,
    ReconciliationOutcome, Reconciler, RunMode, RunSummary,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::commands::OutputFormat;
use crate::config::{load_settings, GitHubSettings};
use crate::errors::Error;

#[cfg(test)]
#[path = "sync_cmd_tests.rs"]
mod tests;

/// Arguments for the `sync` command.
#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Organization whose repositories are reconciled
    #[arg(long)]
    pub org: String,

    /// Governance settings file (.yaml, .yml or .toml)
    #[arg(long)]
    pub config: PathBuf,

    /// Either dry-run (report only) or execute (apply protection)
    #[arg(long, value_parser = parse_run_mode)]
    pub mode: RunMode,

    /// Only reconcile this repository; repeat for more
    #[arg(long = "repo", value_name = "NAME")]
    pub repos: Vec<String>,

    /// Number of repositories processed at the same time
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Seconds to wait for each set-protection call
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Output format (json or pretty)
    #[arg(long, default_value = "pretty")]
    pub format: String,
}

impl SyncArgs {
    /// Builds the driver options from the arguments.
    pub fn reconcile_options(&self) -> Result<ReconcileOptions, Error> {
        if self.concurrency == 0 {
            return Err(Error::InvalidArguments(
                "--concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::InvalidArguments(
                "--timeout-secs must be at least 1".to_string(),
            ));
        }

        Ok(ReconcileOptions {
            max_concurrent_repositories: self.concurrency,
            call_timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

/// Parses the `--mode` argument.
pub fn parse_run_mode(s: &str) -> Result<RunMode, String> {
    match s {
        "dry-run" => Ok(RunMode::DryRun),
        "execute" => Ok(RunMode::Execute),
        _ => Err(format!(
            "invalid mode `{}`: use `dry-run` or `execute`",
            s
        )),
    }
}

/// Everything a sync run produced.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub org: String,
    pub summary: RunSummary,
    pub outcomes: Vec<ReconciliationOutcome>,
}

/// Runs the `sync` command and prints its report to stdout.
///
/// # Errors
///
/// Returns an error, before any branch is touched, if the arguments are invalid,
/// the settings file cannot be loaded, the token is missing, or the repositories
/// cannot be listed. Per-branch failures are part of the returned report.
#[instrument(skip(args), fields(org = %args.org, mode = %args.mode))]
pub async fn execute(args: &SyncArgs) -> Result<SyncReport, Error> {
    let format = OutputFormat::parse(&args.format)?;
    let options = args.reconcile_options()?;
    let config = load_settings(&args.config)?;
    let settings = GitHubSettings::from_env()?;
    let client = Arc::new(settings.create_client()?);

    let report = run_sync(client, &args.org, &config, &args.repos, args.mode, options).await?;

    println!("{}", format_report(&report, format)?);
    Ok(report)
}

/// Enumerates the organization, applies the repository filter and reconciles.
pub async fn run_sync<C>(
    client: Arc<C>,
    org: &str,
    config: &GovernanceConfig,
    repo_filter: &[String],
    mode: RunMode,
    options: ReconcileOptions,
) -> Result<SyncReport, Error>
where
    C: BranchProtectionClient + 'static,
{
    let started_at = Utc::now();

    let repositories = list_governed_repositories(client.as_ref(), org).await?;
    let repositories = select_repositories(repositories, repo_filter);

    let reconciler = Reconciler::new(client, org).with_options(options);
    let outcomes = reconciler.run(config, &repositories, mode).await;

    let summary = summarize(&outcomes, mode).with_timing(started_at, Utc::now());
    info!(
        repositories = summary.repositories,
        applied = summary.applied,
        would_apply = summary.would_apply,
        skipped = summary.skipped_no_branch,
        failed = summary.failed,
        "Sync complete"
    );

    Ok(SyncReport {
        org: org.to_string(),
        summary,
        outcomes,
    })
}

/// Renders a sync report.
pub fn format_report(report: &SyncReport, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Pretty => format_report_pretty(report),
    }
}

fn format_report_pretty(report: &SyncReport) -> Result<String, Error> {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} {} ({})\n",
        "Branch protection sync:".bold(),
        report.org.bright_cyan(),
        report.summary.mode
    ));

    let mut current_repository: Option<&str> = None;
    for outcome in &report.outcomes {
        if current_repository != Some(outcome.repository.as_str()) {
            output.push_str(&format!("\n  {}\n", outcome.repository.bold()));
            current_repository = Some(outcome.repository.as_str());
        }

        match &outcome.status {
            OutcomeStatus::Applied => {
                output.push_str(&format!("    {} {}  applied\n", "✓".green(), outcome.branch));
            }
            OutcomeStatus::WouldApply(payload) => {
                output.push_str(&format!(
                    "    {} {}  would apply\n",
                    "•".blue(),
                    outcome.branch
                ));
                let body = serde_json::to_string_pretty(payload)?;
                for line in body.lines() {
                    output.push_str(&format!("      {}\n", line.dimmed()));
                }
            }
            OutcomeStatus::SkippedNoBranch => {
                output.push_str(&format!(
                    "    {} {}  {}\n",
                    "-".yellow(),
                    outcome.branch,
                    "skipped (no branch)".dimmed()
                ));
            }
            OutcomeStatus::Failed(reason) => {
                output.push_str(&format!(
                    "    {} {}  failed: {}\n",
                    "✗".red(),
                    outcome.branch,
                    reason
                ));
            }
        }
    }

    if report.outcomes.is_empty() {
        output.push_str(&format!("\n  {}\n", "(nothing to reconcile)".dimmed()));
    }

    let summary = &report.summary;
    output.push_str(&format!(
        "\n{}: {} repositories, {} applied, {} would apply, {} skipped (no branch), {} failed\n",
        "Summary".bold(),
        summary.repositories,
        summary.applied,
        summary.would_apply,
        summary.skipped_no_branch,
        summary.failed
    ));

    if summary.has_failures() {
        output.push_str(&format!("\n{}:\n", "Failures".red().bold()));
        for failure in &summary.failures {
            output.push_str(&format!(
                "  {} {}/{}: {}\n",
                "✗".red(),
                failure.repository,
                failure.branch,
                failure.reason
            ));
        }
    }

    Ok(output)
}
