//! Task model
//!
//! Tasks belong to exactly one project and own their comments. A task's
//! tenant is its project's organization.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE tasks (
//!     id TEXT PRIMARY KEY,
//!     project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
//!     title VARCHAR(200) NOT NULL,
//!     description TEXT,
//!     status TEXT NOT NULL DEFAULT 'TODO',
//!     assignee_email TEXT,
//!     due_date TIMESTAMPTZ,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidateLength, ValidationError};

use super::patch::Patch;
use super::UnknownStatus;

/// Maximum task title length
pub const MAX_TITLE_LENGTH: u64 = 200;

/// Task board column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            other => Err(UnknownStatus {
                kind: "task",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Task row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: String,

    /// Owning project
    pub project_id: String,

    /// Short title
    pub title: String,

    /// Optional details
    pub description: Option<String>,

    /// Board column
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,

    /// Assignee address (free text, not a user reference)
    pub assignee_email: Option<String>,

    /// Optional deadline
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// A task is overdue once its deadline has passed and it is not done
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due < now && self.status != TaskStatus::Done,
            None => false,
        }
    }
}

/// Input for creating a new task
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    /// Project the task is filed under
    pub project_id: String,

    /// Task title
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Optional details
    pub description: Option<String>,

    /// Initial status (defaults to Todo)
    #[serde(default)]
    pub status: Option<TaskStatus>,

    /// Optional assignee address
    #[validate(email)]
    pub assignee_email: Option<String>,

    /// Optional deadline
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update of a task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Patch<String>,
    pub description: Patch<Option<String>>,
    pub status: Patch<TaskStatus>,
    pub assignee_email: Patch<Option<String>>,
    pub due_date: Patch<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    /// Returns true if no field was supplied
    pub fn is_empty(&self) -> bool {
        !(self.title.is_set()
            || self.description.is_set()
            || self.status.is_set()
            || self.assignee_email.is_set()
            || self.due_date.is_set())
    }

    /// Checks supplied fields against the same rules as [`CreateTask`]
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = self.title.as_set() {
            if !title.validate_length(Some(1), Some(MAX_TITLE_LENGTH), None) {
                let mut error = ValidationError::new("length");
                error.message = Some("task title must be 1 to 200 characters".into());
                return Err(error);
            }
        }
        if let Some(Some(email)) = self.assignee_email.as_set() {
            if !email.validate_email() {
                let mut error = ValidationError::new("email");
                error.message = Some("assignee email is not a valid address".into());
                return Err(error);
            }
        }
        Ok(())
    }

    /// Merges the supplied fields into `task`
    ///
    /// Returns true if any field was written.
    pub fn apply_to(&self, task: &mut Task) -> bool {
        let mut changed = self.title.apply_to(&mut task.title);
        changed |= self.description.apply_to(&mut task.description);
        changed |= self.status.apply_to(&mut task.status);
        changed |= self.assignee_email.apply_to(&mut task.assignee_email);
        changed |= self.due_date.apply_to(&mut task.due_date);
        changed
    }
}
