//! The `validate` command: check a settings file without contacting GitHub.
//!
//! Loads and validates the settings, then shows the protection each named
//! repository would receive. Without `--repo` the organization defaults are shown.

use clap::Args;
use colored::Colorize;
use config_manager::{BranchPolicyMap, GovernanceConfig};
use github_client::RemoteProtectionPayload;
use protection_sync_core::{resolve, resolve_default, translate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, instrument};

use crate::commands::OutputFormat;
use crate::config::load_settings;
use crate::errors::Error;

#[cfg(test)]
#[path = "validate_cmd_tests.rs"]
mod tests;

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Governance settings file (.yaml, .yml or .toml)
    #[arg(long)]
    pub config: PathBuf,

    /// Show the protection this repository would receive; repeat for more
    #[arg(long = "repo", value_name = "NAME")]
    pub repos: Vec<String>,

    /// Output format (json or pretty)
    #[arg(long, default_value = "pretty")]
    pub format: String,
}

/// Where a resolved branch set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicySource {
    OrganizationDefault,
    RepositoryOverride,
}

/// The protection one target would receive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTarget {
    /// Repository name, or `None` for the organization defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    pub source: PolicySource,

    /// Branch name to the payload that would be sent
    pub branches: BTreeMap<String, RemoteProtectionPayload>,
}

/// Runs the `validate` command and prints the resolved protection to stdout.
#[instrument(skip(args), fields(config = ?args.config))]
pub async fn execute(args: &ValidateArgs) -> Result<(), Error> {
    let format = OutputFormat::parse(&args.format)?;
    let config = load_settings(&args.config)?;

    let targets = resolve_targets(&config, &args.repos);
    debug!(targets = targets.len(), "Settings file is valid");

    println!("{}", format_targets(&targets, format)?);
    Ok(())
}

/// Resolves the protection for each named repository, or for the organization
/// defaults when no names are given.
pub fn resolve_targets(config: &GovernanceConfig, repositories: &[String]) -> Vec<ResolvedTarget> {
    if repositories.is_empty() {
        return vec![ResolvedTarget {
            repository: None,
            source: PolicySource::OrganizationDefault,
            branches: translate_all(&resolve_default(config)),
        }];
    }

    repositories
        .iter()
        .map(|name| ResolvedTarget {
            repository: Some(name.clone()),
            source: if config.find_override(name).is_some() {
                PolicySource::RepositoryOverride
            } else {
                PolicySource::OrganizationDefault
            },
            branches: translate_all(&resolve(config, name)),
        })
        .collect()
}

fn translate_all(policies: &BranchPolicyMap) -> BTreeMap<String, RemoteProtectionPayload> {
    policies
        .iter()
        .map(|(branch, policy)| (branch.clone(), translate(policy)))
        .collect()
}

/// Renders resolved targets.
pub fn format_targets(targets: &[ResolvedTarget], format: OutputFormat) -> Result<String, Error> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(targets)?),
        OutputFormat::Pretty => format_targets_pretty(targets),
    }
}

fn format_targets_pretty(targets: &[ResolvedTarget]) -> Result<String, Error> {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "✓ Settings file is VALID".green().bold()));

    for target in targets {
        let source = match target.source {
            PolicySource::OrganizationDefault => "organization default",
            PolicySource::RepositoryOverride => "repository override",
        };
        let title = target
            .repository
            .as_deref()
            .unwrap_or("Organization defaults");
        output.push_str(&format!(
            "\n{} ({})\n",
            title.bold().bright_cyan(),
            source.dimmed()
        ));

        if target.branches.is_empty() {
            output.push_str(&format!("  {}\n", "(no branch protection)".dimmed()));
            continue;
        }

        for (branch, payload) in &target.branches {
            output.push_str(&format!("  {}\n", branch.bold()));
            let body = serde_json::to_string_pretty(payload)?;
            for line in body.lines() {
                output.push_str(&format!("    {}\n", line));
            }
        }
    }

    Ok(output)
}
