//! GraphQL input objects
//!
//! Update inputs use `MaybeUndefined` so an omitted field, an explicit
//! `null` and a value stay distinguishable until they become [`Patch`]es.

use async_graphql::{InputObject, MaybeUndefined, ID};
use chrono::{DateTime, NaiveDate, Utc};
use taskboard_shared::error::{TrackerError, TrackerResult};
use taskboard_shared::models::comment::CreateComment;
use taskboard_shared::models::patch::{non_blank, Patch};
use taskboard_shared::models::project::{CreateProject, ProjectPatch};
use taskboard_shared::models::task::{CreateTask, TaskPatch};

use super::objects::{ProjectStatusValue, TaskStatusValue};

/// Field that must not be cleared: null is rejected
fn required<T>(field: &str, value: MaybeUndefined<T>) -> TrackerResult<Patch<T>> {
    match value {
        MaybeUndefined::Undefined => Ok(Patch::Keep),
        MaybeUndefined::Null => Err(TrackerError::Validation(format!(
            "{field} cannot be null"
        ))),
        MaybeUndefined::Value(value) => Ok(Patch::Set(value)),
    }
}

/// Nullable column: null clears it
fn optional<T>(value: MaybeUndefined<T>) -> Patch<Option<T>> {
    match value {
        MaybeUndefined::Undefined => Patch::Keep,
        MaybeUndefined::Null => Patch::Set(None),
        MaybeUndefined::Value(value) => Patch::Set(Some(value)),
    }
}

/// Nullable text column: null and blank both clear it
fn optional_text(value: MaybeUndefined<String>) -> Patch<Option<String>> {
    optional(value).map(non_blank)
}

#[derive(InputObject, Debug)]
pub struct CreateProjectInput {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to ACTIVE
    pub status: Option<ProjectStatusValue>,
    pub due_date: Option<NaiveDate>,
}

impl From<CreateProjectInput> for CreateProject {
    fn from(input: CreateProjectInput) -> Self {
        CreateProject {
            name: input.name,
            description: input.description,
            status: input.status.map(Into::into),
            due_date: input.due_date,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct UpdateProjectInput {
    pub id: ID,
    pub name: MaybeUndefined<String>,
    pub description: MaybeUndefined<String>,
    pub status: MaybeUndefined<ProjectStatusValue>,
    pub due_date: MaybeUndefined<NaiveDate>,
}

impl UpdateProjectInput {
    /// Splits the input into the target id and the patch to apply
    pub fn into_patch(self) -> TrackerResult<(String, ProjectPatch)> {
        let patch = ProjectPatch {
            name: required("name", self.name)?.map(|name| name.trim().to_string()),
            description: optional_text(self.description),
            status: required("status", self.status)?.map(Into::into),
            due_date: optional(self.due_date),
        };
        Ok((self.id.0, patch))
    }
}

#[derive(InputObject, Debug)]
pub struct CreateTaskInput {
    pub project_id: ID,
    pub title: String,
    pub description: Option<String>,
    /// Defaults to TODO
    pub status: Option<TaskStatusValue>,
    pub assignee_email: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<CreateTaskInput> for CreateTask {
    fn from(input: CreateTaskInput) -> Self {
        CreateTask {
            project_id: input.project_id.0,
            title: input.title,
            description: input.description,
            status: input.status.map(Into::into),
            assignee_email: input.assignee_email,
            due_date: input.due_date,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct UpdateTaskInput {
    pub id: ID,
    pub title: MaybeUndefined<String>,
    pub description: MaybeUndefined<String>,
    pub status: MaybeUndefined<TaskStatusValue>,
    pub assignee_email: MaybeUndefined<String>,
    pub due_date: MaybeUndefined<DateTime<Utc>>,
}

impl UpdateTaskInput {
    pub fn into_patch(self) -> TrackerResult<(String, TaskPatch)> {
        let patch = TaskPatch {
            title: required("title", self.title)?.map(|title| title.trim().to_string()),
            description: optional_text(self.description),
            status: required("status", self.status)?.map(Into::into),
            assignee_email: optional_text(self.assignee_email)
                .map(|email| email.map(|e| e.trim().to_string())),
            due_date: optional(self.due_date),
        };
        Ok((self.id.0, patch))
    }
}

#[derive(InputObject, Debug)]
pub struct CreateCommentInput {
    pub task_id: ID,
    pub content: String,
    pub author_email: String,
}

impl From<CreateCommentInput> for CreateComment {
    fn from(input: CreateCommentInput) -> Self {
        CreateComment {
            task_id: input.task_id.0,
            content: input.content,
            author_email: input.author_email.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_shared::error::ErrorKind;
    use taskboard_shared::models::project::ProjectStatus;

    fn update(id: &str) -> UpdateProjectInput {
        UpdateProjectInput {
            id: ID(id.to_string()),
            name: MaybeUndefined::Undefined,
            description: MaybeUndefined::Undefined,
            status: MaybeUndefined::Undefined,
            due_date: MaybeUndefined::Undefined,
        }
    }

    #[test]
    fn test_omitted_fields_are_kept() {
        let (id, patch) = update("p-1").into_patch().unwrap();
        assert_eq!(id, "p-1");
        assert!(patch.is_empty());
    }

    #[test]
    fn test_status_only_patch() {
        let input = UpdateProjectInput {
            status: MaybeUndefined::Value(ProjectStatusValue::Completed),
            ..update("p-1")
        };
        let (_, patch) = input.into_patch().unwrap();

        assert_eq!(patch.status, Patch::Set(ProjectStatus::Completed));
        assert_eq!(patch.name, Patch::Keep);
        assert_eq!(patch.description, Patch::Keep);
        assert_eq!(patch.due_date, Patch::Keep);
    }

    #[test]
    fn test_null_clears_optional_fields() {
        let input = UpdateProjectInput {
            description: MaybeUndefined::Null,
            due_date: MaybeUndefined::Null,
            ..update("p-1")
        };
        let (_, patch) = input.into_patch().unwrap();

        assert_eq!(patch.description, Patch::Set(None));
        assert_eq!(patch.due_date, Patch::Set(None));
    }

    #[test]
    fn test_blank_text_clears() {
        let input = UpdateProjectInput {
            description: MaybeUndefined::Value("  ".to_string()),
            ..update("p-1")
        };
        let (_, patch) = input.into_patch().unwrap();
        assert_eq!(patch.description, Patch::Set(None));
    }

    #[test]
    fn test_null_on_required_field_is_rejected() {
        let input = UpdateProjectInput {
            name: MaybeUndefined::Null,
            ..update("p-1")
        };
        let err = input.into_patch().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        let input = UpdateTaskInput {
            id: ID("t-1".to_string()),
            title: MaybeUndefined::Undefined,
            description: MaybeUndefined::Undefined,
            status: MaybeUndefined::Null,
            assignee_email: MaybeUndefined::Undefined,
            due_date: MaybeUndefined::Undefined,
        };
        let err = input.into_patch().unwrap_err();
        assert!(err.to_string().contains("status cannot be null"));
    }
}
