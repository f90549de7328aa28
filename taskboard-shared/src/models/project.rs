//! Project model
//!
//! Projects belong to exactly one organization and own their tasks. Deleting a
//! project cascades to its tasks and their comments.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE projects (
//!     id TEXT PRIMARY KEY,
//!     organization_id TEXT NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
//!     name VARCHAR(200) NOT NULL,
//!     description TEXT,
//!     status TEXT NOT NULL DEFAULT 'ACTIVE',
//!     due_date DATE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     CONSTRAINT projects_organization_name_key UNIQUE (organization_id, name)
//! );
//! ```
//!
//! # Example
//!
//! ```
//! use taskboard_shared::models::patch::Patch;
//! use taskboard_shared::models::project::{ProjectPatch, ProjectStatus};
//!
//! // Only the status changes; everything else is left alone
//! let patch = ProjectPatch {
//!     status: Patch::Set(ProjectStatus::Completed),
//!     ..Default::default()
//! };
//! assert!(!patch.is_empty());
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateLength, ValidationError};

use super::patch::Patch;
use super::UnknownStatus;

/// Maximum project name length
pub const MAX_NAME_LENGTH: u64 = 200;

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Work is ongoing
    #[default]
    Active,

    /// All work is done
    Completed,

    /// Paused
    OnHold,

    /// Kept for reference only
    Archived,
}

impl ProjectStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "ACTIVE",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::OnHold => "ON_HOLD",
            ProjectStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(ProjectStatus::Active),
            "COMPLETED" => Ok(ProjectStatus::Completed),
            "ON_HOLD" => Ok(ProjectStatus::OnHold),
            "ARCHIVED" => Ok(ProjectStatus::Archived),
            other => Err(UnknownStatus {
                kind: "project",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Project row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: String,

    /// Owning organization
    pub organization_id: String,

    /// Project name (unique within the organization)
    pub name: String,

    /// Optional long-form description
    pub description: Option<String>,

    /// Current status
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// A project is overdue once its due date has passed and it is not completed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && self.status != ProjectStatus::Completed,
            None => false,
        }
    }
}

/// Input for creating a new project
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateProject {
    /// Project name
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// Optional description (blank is stored as none)
    pub description: Option<String>,

    /// Initial status (defaults to Active)
    #[serde(default)]
    pub status: Option<ProjectStatus>,

    /// Optional due date
    pub due_date: Option<NaiveDate>,
}

/// Partial update of a project
///
/// Fields left at `Patch::Keep` are not written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Patch<String>,
    pub description: Patch<Option<String>>,
    pub status: Patch<ProjectStatus>,
    pub due_date: Patch<Option<NaiveDate>>,
}

impl ProjectPatch {
    /// Returns true if no field was supplied
    pub fn is_empty(&self) -> bool {
        !(self.name.is_set()
            || self.description.is_set()
            || self.status.is_set()
            || self.due_date.is_set())
    }

    /// Checks supplied fields against the same rules as [`CreateProject`]
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = self.name.as_set() {
            if !name.validate_length(Some(1), Some(MAX_NAME_LENGTH), None) {
                let mut error = ValidationError::new("length");
                error.message = Some("project name must be 1 to 200 characters".into());
                return Err(error);
            }
        }
        Ok(())
    }

    /// Merges the supplied fields into `project`
    ///
    /// Returns true if any field was written. `updated_at` is left to the
    /// caller.
    pub fn apply_to(&self, project: &mut Project) -> bool {
        let mut changed = self.name.apply_to(&mut project.name);
        changed |= self.description.apply_to(&mut project.description);
        changed |= self.status.apply_to(&mut project.status);
        changed |= self.due_date.apply_to(&mut project.due_date);
        changed
    }
}
