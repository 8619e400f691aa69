use clap::{Parser, Subcommand};
use protection_sync_cli::commands::{
    show_cmd::{self, ShowArgs},
    sync_cmd::{self, SyncArgs},
    validate_cmd::{self, ValidateArgs},
};
use protection_sync_cli::config::LOG_ENV_VAR;
use protection_sync_cli::errors::Error;
use std::io::Write;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// protection-sync: Reconcile branch protection across a GitHub organization
#[derive(Parser)]
#[command(name = "protection-sync")]
#[command(about = "Reconcile branch protection across a GitHub organization", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the settings file to every repository in an organization
    Sync(SyncArgs),

    /// Check a settings file without contacting GitHub
    Validate(ValidateArgs),

    /// Print the live protection of one branch
    Show(ShowArgs),

    /// Show the CLI version
    Version,
}

/// Writes a fatal error where it is visible even when logging is filtered off.
fn write_fatal(out: &mut impl Write, e: &Error) {
    let _ = writeln!(out, "Error: {e}");
}

fn exit_with(e: Error) -> ! {
    error!("Error: {e}");
    write_fatal(&mut std::io::stderr(), &e);
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Sync(args) => match sync_cmd::execute(args).await {
            Ok(report) => std::process::exit(report.summary.exit_code()),
            Err(e) => exit_with(e),
        },
        Commands::Validate(args) => match validate_cmd::execute(args).await {
            Ok(()) => std::process::exit(0),
            Err(e) => exit_with(e),
        },
        Commands::Show(args) => match show_cmd::execute(args).await {
            Ok(()) => std::process::exit(0),
            Err(e) => exit_with(e),
        },
        Commands::Version => {
            // Print version info from baked-in value
            println!(
                "protection-sync version {}",
                option_env!("PROTECTION_SYNC_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
            );
            std::process::exit(0);
        }
    }
}
