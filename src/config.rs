use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Everything a run needs, validated once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub token: String,
    pub org: String,
    pub repo: String,
    pub csv_file: PathBuf,
    pub api_url: String,
}

impl Config {
    /// Validates raw command-line values. Fields are checked in the order
    /// token, organization, repository, file so the first missing one is reported.
    pub fn from_args(
        token: Option<String>,
        org: Option<String>,
        repo: Option<String>,
        csv_file: Option<PathBuf>,
        api_url: String,
    ) -> Result<Self, ConfigError> {
        let token = sanitize_token(token.as_deref().unwrap_or_default());
        if token.is_empty() {
            return Err(ConfigError::MissingField("GitHub API token"));
        }
        let org = required(org, "GitHub organization name")?;
        let repo = required(repo, "GitHub repository name")?;
        let csv_file = csv_file
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingField("CSV file path"))?;

        Ok(Self {
            token,
            org,
            repo,
            csv_file,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// `org/repo`, as used in log lines and API paths.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingField(field))
}

/// Keeps only the characters allowed in an `Authorization` token value.
pub fn sanitize_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || "-._~+/".contains(*c))
        .collect()
}
