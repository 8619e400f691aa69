//! The `show` command: print the live protection of one branch.
//!
//! With `--config`, the live protection is compared with what the settings file
//! would apply to the branch.

use clap::Args;
use colored::Colorize;
use config_manager::GovernanceConfig;
use github_client::{BranchProtectionClient, RemoteProtectionPayload};
use protection_sync_core::{resolve, translate};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::commands::OutputFormat;
use crate::config::{load_settings, GitHubSettings};
use crate::errors::Error;

#[cfg(test)]
#[path = "show_cmd_tests.rs"]
mod tests;

/// Arguments for the `show` command.
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Organization that owns the repository
    #[arg(long)]
    pub org: String,

    /// Repository name
    #[arg(long)]
    pub repo: String,

    /// Branch name
    #[arg(long)]
    pub branch: String,

    /// Settings file to compare the live protection with
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format (json or pretty)
    #[arg(long, default_value = "pretty")]
    pub format: String,
}

/// Live protection of a branch, optionally next to the configured protection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchProtectionView {
    pub repository: String,
    pub branch: String,

    /// Live protection in update-payload form
    pub live: RemoteProtectionPayload,

    /// Protection the settings file would apply; absent when not compared or when
    /// the branch is not governed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configured: Option<RemoteProtectionPayload>,

    /// Whether live and configured protection agree; absent when not compared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_sync: Option<bool>,
}

/// Runs the `show` command.
#[instrument(skip(args), fields(org = %args.org, repo = %args.repo, branch = %args.branch))]
pub async fn execute(args: &ShowArgs) -> Result<(), Error> {
    let format = OutputFormat::parse(&args.format)?;
    let config = args.config.as_deref().map(load_settings).transpose()?;
    let settings = GitHubSettings::from_env()?;
    let client = settings.create_client()?;

    let view = fetch_view(
        &client,
        &args.org,
        &args.repo,
        &args.branch,
        config.as_ref(),
    )
    .await?;

    println!("{}", format_view(&view, format)?);
    Ok(())
}

/// Reads the live protection and, given settings, compares it with them.
///
/// # Errors
///
/// Returns `Error::Remote` if the branch is unprotected, does not exist, or the
/// call fails.
pub async fn fetch_view<C>(
    client: &C,
    org: &str,
    repo: &str,
    branch: &str,
    config: Option<&GovernanceConfig>,
) -> Result<BranchProtectionView, Error>
where
    C: BranchProtectionClient + ?Sized,
{
    let live = client
        .get_branch_protection(org, repo, branch)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                Error::Remote(format!(
                    "{}/{}: branch '{}' does not exist or is not protected",
                    org, repo, branch
                ))
            } else {
                Error::from(e)
            }
        })?
        .to_payload();

    let (configured, in_sync) = match config {
        Some(config) => {
            let configured = resolve(config, repo).get(branch).map(translate);
            let in_sync = configured.as_ref() == Some(&live);
            info!(in_sync = in_sync, "Compared live protection with settings");
            (configured, Some(in_sync))
        }
        None => (None, None),
    };

    Ok(BranchProtectionView {
        repository: repo.to_string(),
        branch: branch.to_string(),
        live,
        configured,
        in_sync,
    })
}

/// Renders a branch protection view.
pub fn format_view(view: &BranchProtectionView, format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        OutputFormat::Pretty => format_view_pretty(view),
    }
}

fn format_view_pretty(view: &BranchProtectionView) -> Result<String, Error> {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{} {}\n\n",
        format!("{}/{}", view.repository, view.branch).bold().bright_cyan(),
        "(live)".dimmed()
    ));
    for line in serde_json::to_string_pretty(&view.live)?.lines() {
        output.push_str(&format!("  {}\n", line));
    }

    match view.in_sync {
        Some(true) => {
            output.push_str(&format!("\n{}\n", "✓ Matches the settings file".green().bold()));
        }
        Some(false) => {
            output.push_str(&format!(
                "\n{}\n",
                "✗ Differs from the settings file".red().bold()
            ));
            match &view.configured {
                Some(configured) => {
                    output.push_str(&format!("\n{}\n", "Configured:".bold()));
                    for line in serde_json::to_string_pretty(configured)?.lines() {
                        output.push_str(&format!("  {}\n", line));
                    }
                }
                None => {
                    output.push_str(&format!(
                        "  {}\n",
                        "(branch is not governed by the settings file)".dimmed()
                    ));
                }
            }
        }
        None => {}
    }

    Ok(output)
}
