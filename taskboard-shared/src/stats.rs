//! Per-project task aggregation
//!
//! Task statistics are never persisted. They are folded from the current task
//! statuses every time a project is read, so they always reflect the latest
//! task mutations.
//!
//! # Example
//!
//! ```
//! use taskboard_shared::models::task::TaskStatus;
//! use taskboard_shared::stats::TaskStats;
//!
//! let stats = TaskStats::from_statuses([TaskStatus::Done, TaskStatus::Todo]);
//! assert_eq!(stats.total, 2);
//! assert_eq!(stats.completion_rate, 50.0);
//! ```

use serde::Serialize;

use crate::models::task::TaskStatus;
use crate::store::{Store, StoreResult};

/// Task counts and completion percentage for one project
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// Number of tasks in the project
    pub total: u32,

    /// Tasks in `DONE`
    pub completed: u32,

    /// Tasks in `IN_PROGRESS`
    pub in_progress: u32,

    /// Remaining tasks (`total - completed - in_progress`)
    pub todo: u32,

    /// `100 * completed / total`, or 0 for an empty project
    pub completion_rate: f64,
}

impl TaskStats {
    /// Folds a set of task statuses into counts
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = TaskStatus>,
    {
        let (mut total, mut completed, mut in_progress) = (0u32, 0u32, 0u32);

        for status in statuses {
            total += 1;
            match status {
                TaskStatus::Done => completed += 1,
                TaskStatus::InProgress => in_progress += 1,
                TaskStatus::Todo => {}
            }
        }

        let completion_rate = if total == 0 {
            0.0
        } else {
            100.0 * f64::from(completed) / f64::from(total)
        };

        Self {
            total,
            completed,
            in_progress,
            todo: total - completed - in_progress,
            completion_rate,
        }
    }
}

/// Computes the current statistics for a project
///
/// # Errors
///
/// Returns an error if the task statuses cannot be read
pub async fn project_stats(store: &dyn Store, project_id: &str) -> StoreResult<TaskStats> {
    let statuses = store.task_statuses(project_id).await?;
    let stats = TaskStats::from_statuses(statuses);

    tracing::debug!(
        project_id = %project_id,
        total = stats.total,
        completed = stats.completed,
        "Computed task stats"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_project_has_zero_rate() {
        let stats = TaskStats::from_statuses(Vec::<TaskStatus>::new());
        assert_eq!(stats, TaskStats::default());
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn test_counts_add_up() {
        let stats = TaskStats::from_statuses([
            TaskStatus::Done,
            TaskStatus::Done,
            TaskStatus::InProgress,
            TaskStatus::Todo,
            TaskStatus::Todo,
        ]);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.todo, 2);
        assert_eq!(stats.total, stats.completed + stats.in_progress + stats.todo);
        assert_eq!(stats.completion_rate, 40.0);
    }

    #[test]
    fn test_all_done() {
        let stats = TaskStats::from_statuses([TaskStatus::Done; 3]);
        assert_eq!(stats.completion_rate, 100.0);
        assert_eq!(stats.todo, 0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let stats = TaskStats::from_statuses([TaskStatus::InProgress]);
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["inProgress"], 1);
        assert_eq!(json["completionRate"], 0.0);
    }
}
