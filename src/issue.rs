use std::fmt;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::github::{ApiError, IssueTracker};
use crate::milestone::resolve_milestone;
use crate::tasks::TaskRow;

pub const DEFAULT_TITLE: &str = "Untitled Task";

/// Body of `POST /repos/{org}/{repo}/issues`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuePayload {
    pub title: String,
    pub body: String,
    pub assignees: Vec<String>,
    pub labels: Vec<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}

impl IssuePayload {
    /// Maps a task row to a payload. The milestone is attached separately
    /// once it has been resolved.
    pub fn from_task(task: &TaskRow) -> Self {
        let title = match task.field("title") {
            "" => DEFAULT_TITLE.to_string(),
            title => title.to_string(),
        };
        let issue_type = Some(task.field("type").trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Self {
            title,
            body: task.field("description").to_string(),
            assignees: split_list(task.field("assignee")),
            labels: split_list(task.field("labels")),
            issue_type,
            milestone: None,
        }
    }
}

/// Splits a comma-separated cell into trimmed, non-empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Result of importing one task row.
#[derive(Debug)]
pub enum RowOutcome {
    Created { number: u64, url: String },
    RepositoryUnavailable(ApiError),
    Failed(ApiError),
}

impl RowOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, RowOutcome::Created { .. })
    }
}

impl fmt::Display for RowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowOutcome::Created { number, url } => write!(f, "created #{number} ({url})"),
            RowOutcome::RepositoryUnavailable(err) => write!(f, "repository unavailable: {err}"),
            RowOutcome::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

fn log_response(err: &ApiError) {
    match err.body() {
        Some(body) => error!("Response: {}", body),
        None => error!("Response: No response"),
    }
}

fn display_list(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

/// Creates the issue for one task row. Remote failures are logged and
/// reported through the outcome, never returned as errors.
pub async fn create_issue<T: IssueTracker + ?Sized>(tracker: &T, task: &TaskRow) -> RowOutcome {
    let repository = tracker.repository();
    if let Err(err) = tracker.verify_repository().await {
        error!("Repository {} not found or not accessible: {}", repository, err);
        log_response(&err);
        error!("Check the organization name, repository name, and token permissions.");
        return RowOutcome::RepositoryUnavailable(err);
    }
    info!("Repository {} verified", repository);

    let mut payload = IssuePayload::from_task(task);
    debug!("Original type value: {:?}", task.get("type"));
    info!("  - Title: {}", payload.title);
    info!("  - Body length: {} characters", payload.body.chars().count());
    info!("  - Assignees: {}", display_list(&payload.assignees));
    info!("  - Labels: {}", display_list(&payload.labels));
    if let Some(issue_type) = &payload.issue_type {
        info!("  - Type: {}", issue_type);
    }

    let milestone_title = task.field("milestone").trim();
    if !milestone_title.is_empty() {
        info!("  - Milestone: {}", milestone_title);
        match resolve_milestone(tracker, milestone_title).await {
            Some(number) => {
                info!("  - Milestone ID: {}", number);
                payload.milestone = Some(number);
            }
            None => warn!("  - Unable to set milestone: {}", milestone_title),
        }
    }

    match tracker.create_issue(&payload).await {
        Ok(issue) => {
            info!("  + Created issue #{}: {}", issue.number, issue.html_url);
            RowOutcome::Created {
                number: issue.number,
                url: issue.html_url,
            }
        }
        Err(err) => {
            error!("Error creating issue '{}': {}", payload.title, err);
            log_response(&err);
            RowOutcome::Failed(err)
        }
    }
}
