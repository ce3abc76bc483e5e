use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default GitHub REST API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Issue Importer - bulk-create GitHub issues from a CSV file
#[derive(Parser, Debug)]
#[command(name = "issue-importer")]
#[command(about = "Create one GitHub issue per row of a CSV task file")]
#[command(version)]
pub struct Cli {
    /// Log debug output (CSV headers, raw field values)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Create issues from a CSV file
    Create {
        /// GitHub API token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Organization (or user) owning the repository
        #[arg(long, env = "GITHUB_ORG")]
        org: Option<String>,

        /// Repository name
        #[arg(long, env = "GITHUB_REPO")]
        repo: Option<String>,

        /// Path to the CSV file with tasks
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Base URL of the GitHub API
        #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,
    },

    /// Print a CSV template with the recognized columns
    Template,
}
