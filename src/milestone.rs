use tracing::{error, info};

use crate::github::{ApiError, IssueTracker, NewMilestone};

/// Returns the number of the milestone titled `title` (case-insensitive),
/// creating an open one if none exists. Lookups are not cached, so two rows
/// naming the same new milestone may create it twice if GitHub allows it.
///
/// `None` means the lookup or creation failed; the failure has been logged.
pub async fn resolve_milestone<T: IssueTracker + ?Sized>(tracker: &T, title: &str) -> Option<u64> {
    match find_or_create(tracker, title).await {
        Ok(number) => Some(number),
        Err(err) => {
            error!("Error with milestones: {}", err);
            if let Some(body) = err.body() {
                error!("Response: {}", body);
            }
            None
        }
    }
}

async fn find_or_create<T: IssueTracker + ?Sized>(
    tracker: &T,
    title: &str,
) -> Result<u64, ApiError> {
    let wanted = title.to_lowercase();
    let milestones = tracker.list_milestones().await?;
    if let Some(existing) = milestones.iter().find(|m| m.title.to_lowercase() == wanted) {
        info!(
            "Using {} milestone '{}' (#{})",
            existing.state, existing.title, existing.number
        );
        return Ok(existing.number);
    }

    info!("Milestone '{}' not found. Creating it...", title);
    let created = tracker.create_milestone(&NewMilestone::open(title)).await?;
    info!("Created milestone '{}' with ID {}", title, created.number);
    Ok(created.number)
}
