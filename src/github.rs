//! GitHub REST access.
//!
//! [`IssueTracker`] is the seam the importer talks through; [`GitHubClient`]
//! implements it with `reqwest` against `/repos/{org}/{repo}/...`.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::issue::IssuePayload;

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GitHub returned {status}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Response body returned by GitHub, if the request got that far.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMilestone {
    pub title: String,
    pub state: String,
    pub description: String,
}

impl NewMilestone {
    pub fn open(title: &str) -> Self {
        Self {
            title: title.to_string(),
            state: "open".to_string(),
            description: format!("Auto-created milestone: {title}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedIssue {
    pub number: u64,
    pub html_url: String,
}

/// Remote operations needed to import tasks into one repository.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Succeeds if the target repository exists and the token can read it.
    async fn verify_repository(&self) -> Result<(), ApiError>;

    /// All milestones of the repository, open and closed.
    async fn list_milestones(&self) -> Result<Vec<Milestone>, ApiError>;

    async fn create_milestone(&self, milestone: &NewMilestone) -> Result<Milestone, ApiError>;

    async fn create_issue(&self, issue: &IssuePayload) -> Result<CreatedIssue, ApiError>;

    /// `org/repo` of the target, for log lines.
    fn repository(&self) -> String;
}

pub struct GitHubClient {
    http: Client,
    repo_url: String,
    full_name: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Self::with_builder(config, Client::builder())
    }

    fn with_builder(config: &Config, builder: ClientBuilder) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("token {}", config.token))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("issue-importer/", env!("CARGO_PKG_VERSION"))),
        );

        let http = builder.default_headers(headers).build()?;
        Ok(Self {
            http,
            repo_url: format!("{}/repos/{}/{}", config.api_url, config.org, config.repo),
            full_name: config.full_name(),
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn verify_repository(&self) -> Result<(), ApiError> {
        self.send(self.http.get(&self.repo_url)).await.map(|_| ())
    }

    async fn list_milestones(&self) -> Result<Vec<Milestone>, ApiError> {
        let url = format!("{}/milestones?state=all", self.repo_url);
        self.send_json(self.http.get(url)).await
    }

    async fn create_milestone(&self, milestone: &NewMilestone) -> Result<Milestone, ApiError> {
        let url = format!("{}/milestones", self.repo_url);
        self.send_json(self.http.post(url).json(milestone)).await
    }

    async fn create_issue(&self, issue: &IssuePayload) -> Result<CreatedIssue, ApiError> {
        let url = format!("{}/issues", self.repo_url);
        self.send_json(self.http.post(url).json(issue)).await
    }

    fn repository(&self) -> String {
        self.full_name.clone()
    }
}


#[cfg(test)]
pub mod testing {
    //! In-memory [`IssueTracker`] that records every call.

    use std::sync::Mutex;

    use super::*;

    pub struct MockTracker {
        repository_ok: bool,
        milestones_fail: bool,
        rejected_titles: Vec<String>,
        milestones: Mutex<Vec<Milestone>>,
        new_milestones: Mutex<Vec<NewMilestone>>,
        issues: Mutex<Vec<IssuePayload>>,
        milestone_lookups: Mutex<usize>,
        verifications: Mutex<usize>,
    }

    impl MockTracker {
        pub fn new() -> Self {
            Self {
                repository_ok: true,
                milestones_fail: false,
                rejected_titles: Vec::new(),
                milestones: Mutex::new(Vec::new()),
                new_milestones: Mutex::new(Vec::new()),
                issues: Mutex::new(Vec::new()),
                milestone_lookups: Mutex::new(0),
                verifications: Mutex::new(0),
            }
        }

        pub fn with_milestone(self, number: u64, title: &str) -> Self {
            self.milestones.lock().unwrap().push(Milestone {
                number,
                title: title.to_string(),
                state: "open".to_string(),
            });
            self
        }

        pub fn missing_repository(mut self) -> Self {
            self.repository_ok = false;
            self
        }

        pub fn failing_milestones(mut self) -> Self {
            self.milestones_fail = true;
            self
        }

        pub fn rejecting_title(mut self, title: &str) -> Self {
            self.rejected_titles.push(title.to_string());
            self
        }

        pub fn created_issues(&self) -> Vec<IssuePayload> {
            self.issues.lock().unwrap().clone()
        }

        pub fn created_milestones(&self) -> Vec<NewMilestone> {
            self.new_milestones.lock().unwrap().clone()
        }

        pub fn milestone_lookups(&self) -> usize {
            *self.milestone_lookups.lock().unwrap()
        }

        pub fn verifications(&self) -> usize {
            *self.verifications.lock().unwrap()
        }
    }

    fn status(status: reqwest::StatusCode, body: &str) -> ApiError {
        ApiError::Status {
            status,
            body: body.to_string(),
        }
    }

    #[async_trait]
    impl IssueTracker for MockTracker {
        async fn verify_repository(&self) -> Result<(), ApiError> {
            *self.verifications.lock().unwrap() += 1;
            if self.repository_ok {
                Ok(())
            } else {
                Err(status(reqwest::StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#))
            }
        }

        async fn list_milestones(&self) -> Result<Vec<Milestone>, ApiError> {
            *self.milestone_lookups.lock().unwrap() += 1;
            if self.milestones_fail {
                return Err(status(reqwest::StatusCode::FORBIDDEN, r#"{"message":"Forbidden"}"#));
            }
            Ok(self.milestones.lock().unwrap().clone())
        }

        async fn create_milestone(&self, milestone: &NewMilestone) -> Result<Milestone, ApiError> {
            if self.milestones_fail {
                return Err(status(reqwest::StatusCode::FORBIDDEN, r#"{"message":"Forbidden"}"#));
            }
            self.new_milestones.lock().unwrap().push(milestone.clone());
            let mut milestones = self.milestones.lock().unwrap();
            let number = milestones.iter().map(|m| m.number).max().unwrap_or(0) + 1;
            let created = Milestone {
                number,
                title: milestone.title.clone(),
                state: milestone.state.clone(),
            };
            milestones.push(created.clone());
            Ok(created)
        }

        async fn create_issue(&self, issue: &IssuePayload) -> Result<CreatedIssue, ApiError> {
            if self.rejected_titles.contains(&issue.title) {
                return Err(status(
                    reqwest::StatusCode::UNPROCESSABLE_ENTITY,
                    r#"{"message":"Validation Failed"}"#,
                ));
            }
            let mut issues = self.issues.lock().unwrap();
            issues.push(issue.clone());
            let number = issues.len() as u64;
            Ok(CreatedIssue {
                number,
                html_url: format!("https://github.com/acme/widgets/issues/{number}"),
            })
        }

        fn repository(&self) -> String {
            "acme/widgets".to_string()
        }
    }
}
