use tracing::{debug, info};

use crate::github::IssueTracker;
use crate::issue::{DEFAULT_TITLE, RowOutcome, create_issue};
use crate::tasks::TaskRow;

/// Per-row outcomes of an import, in input order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<RowOutcome>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_created()).count()
    }
}

/// Creates one issue per task, in order. A failed row never stops the run.
pub async fn run_import<T: IssueTracker + ?Sized>(tracker: &T, tasks: &[TaskRow]) -> RunSummary {
    let total = tasks.len();
    info!("Creating {} tasks in {}...", total, tracker.repository());

    let mut summary = RunSummary::default();
    for (i, task) in tasks.iter().enumerate() {
        let title = task.get("title").unwrap_or(DEFAULT_TITLE);
        info!("Creating task {}/{}: {}", i + 1, total, title);
        summary.outcomes.push(create_issue(tracker, task).await);
    }

    for (i, outcome) in summary.outcomes.iter().enumerate() {
        debug!("Row {}: {}", i + 1, outcome);
    }
    info!(
        "Created {} out of {} tasks successfully.",
        summary.succeeded(),
        summary.total()
    );
    summary
}
