mod cli;
mod config;
mod github;
mod issue;
mod milestone;
mod run;
mod tasks;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use github::GitHubClient;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .init();
}

/// Logs a run-ending error on stdout with its cause chain.
fn fatal(err: &anyhow::Error) -> ExitCode {
    error!("Error: {err:#}");
    ExitCode::FAILURE
}

async fn create(
    token: Option<String>,
    org: Option<String>,
    repo: Option<String>,
    file: Option<PathBuf>,
    api_url: String,
) -> anyhow::Result<()> {
    info!("GitHub Task Creator");

    let config = Config::from_args(token, org, repo, file, api_url)?;
    let tasks = tasks::read_tasks(&config.csv_file)
        .with_context(|| format!("reading {}", config.csv_file.display()))?;
    let client = GitHubClient::new(&config).context("building GitHub client")?;

    run::run_import(&client, &tasks).await;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Create {
            token,
            org,
            repo,
            file,
            api_url,
        } => create(token, org, repo, file, api_url).await,
        Commands::Template => tasks::write_template(std::io::stdout().lock())
            .map_err(anyhow::Error::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fatal(&err),
    }
}
