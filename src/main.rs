//! pr-labeler binary entry point

use anstream::{eprintln, println};
use clap::Parser;
use owo_colors::OwoColorize;
use pr_labeler::config::RunConfig;
use pr_labeler::forge::DEFAULT_TIMEOUT_SECS;
use pr_labeler::run::run;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Sync pull-request labels from changed-file glob rules
#[derive(Debug, Parser)]
#[command(name = "pr-labeler", version, about)]
struct Args {
    /// Debug mode: 'enable' computes and logs without writing labels
    #[arg(long, env = "INPUT_DEBUG", default_value = "disable")]
    debug: String,

    /// Target repository in 'owner/name' form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// Forge access token
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true, default_value = "")]
    token: String,

    /// Path of the labeler rule file
    #[arg(long, env = "INPUT_FILE", default_value = ".github/labeler.yml")]
    file: PathBuf,

    /// Fetch the rule file from the forge at this revision instead of the
    /// local checkout
    #[arg(long, env = "INPUT_CONFIG_REF")]
    config_ref: Option<String>,

    /// Path of the pull-request event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// Per-request timeout in seconds (0 waits indefinitely)
    #[arg(long, env = "INPUT_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

fn init_tracing(debug: bool) {
    let default = if debug {
        "pr_labeler=debug"
    } else {
        "pr_labeler=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug == "enable");

    let config = match RunConfig::new(
        &args.debug,
        &args.repository,
        args.token,
        args.file,
        args.config_ref,
        args.event_path,
        args.timeout,
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    match run(&config).await {
        Ok(summary) => {
            if summary.updated {
                println!(
                    "{} labels set to [{}]",
                    "✓".green(),
                    summary.labels.join(", ")
                );
            } else if summary.changed {
                println!(
                    "{} dry run: labels would be [{}]",
                    "✓".green(),
                    summary.labels.join(", ")
                );
            } else {
                println!("{} labels already in sync", "✓".green());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
