//! GraphQL output types
//!
//! View models wrap a stored row plus whatever related data the resolver
//! already had at hand. Relations that were not preloaded are fetched from
//! the store when the client selects them, so every field reflects the state
//! after the enclosing mutation.

use async_graphql::{ComplexObject, Context, Enum, Object, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use taskboard_shared::error::TrackerError;
use taskboard_shared::models::comment::Comment;
use taskboard_shared::models::organization::Organization;
use taskboard_shared::models::project::Project;
use taskboard_shared::models::task::Task;
use taskboard_shared::stats::{project_stats, TaskStats};

use super::store;
use crate::error::GraphqlResultExt;

#[derive(Enum, Debug, Copy, Clone, Eq, PartialEq)]
#[graphql(
    name = "ProjectStatus",
    remote = "taskboard_shared::models::project::ProjectStatus"
)]
pub enum ProjectStatusValue {
    Active,
    Completed,
    OnHold,
    Archived,
}

#[derive(Enum, Debug, Copy, Clone, Eq, PartialEq)]
#[graphql(name = "TaskStatus", remote = "taskboard_shared::models::task::TaskStatus")]
pub enum TaskStatusValue {
    Todo,
    InProgress,
    Done,
}

// ============================================================================
// Organization
// ============================================================================

pub struct OrganizationObject(pub Organization);

#[Object(name = "Organization")]
impl OrganizationObject {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn slug(&self) -> &str {
        &self.0.slug
    }

    async fn contact_email(&self) -> &str {
        &self.0.contact_email
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    /// Number of projects in the organization
    async fn project_count(&self, ctx: &Context<'_>) -> async_graphql::Result<i64> {
        store(ctx)?.count_projects(&self.0.id).await.graphql()
    }

    /// Number of tasks across all projects
    async fn task_count(&self, ctx: &Context<'_>) -> async_graphql::Result<i64> {
        store(ctx)?
            .count_organization_tasks(&self.0.id)
            .await
            .graphql()
    }
}

// ============================================================================
// Project
// ============================================================================

pub struct ProjectObject {
    project: Project,
    organization: Option<Organization>,
    tasks: Option<Vec<Task>>,
}

impl ProjectObject {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            organization: None,
            tasks: None,
        }
    }

    pub fn with_organization(mut self, organization: Organization) -> Self {
        self.organization = Some(organization);
        self
    }

    /// Preloads the task list (used for freshly created projects)
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }
}

#[Object(name = "Project")]
impl ProjectObject {
    async fn id(&self) -> ID {
        ID(self.project.id.clone())
    }

    async fn name(&self) -> &str {
        &self.project.name
    }

    async fn description(&self) -> Option<&str> {
        self.project.description.as_deref()
    }

    async fn status(&self) -> ProjectStatusValue {
        self.project.status.into()
    }

    async fn due_date(&self) -> Option<NaiveDate> {
        self.project.due_date
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.project.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.project.updated_at
    }

    /// Past its due date and not completed
    async fn is_overdue(&self) -> bool {
        self.project.is_overdue(Utc::now().date_naive())
    }

    async fn organization(&self, ctx: &Context<'_>) -> async_graphql::Result<OrganizationObject> {
        if let Some(organization) = &self.organization {
            return Ok(OrganizationObject(organization.clone()));
        }

        store(ctx)?
            .find_organization_by_id(&self.project.organization_id)
            .await
            .graphql()?
            .map(OrganizationObject)
            .ok_or_else(|| TrackerError::not_found("Organization", &self.project.organization_id))
            .graphql()
    }

    /// Tasks, newest first
    async fn tasks(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<TaskObject>> {
        let tasks = match &self.tasks {
            Some(tasks) => tasks.clone(),
            None => store(ctx)?.list_tasks(&self.project.id).await.graphql()?,
        };

        Ok(tasks
            .into_iter()
            .map(|task| TaskObject::new(task).with_project(self.project.clone()))
            .collect())
    }

    /// Counts and completion rate, computed from the current tasks
    async fn task_stats(&self, ctx: &Context<'_>) -> async_graphql::Result<TaskStatsObject> {
        project_stats(store(ctx)?.as_ref(), &self.project.id)
            .await
            .map(TaskStatsObject::from)
            .graphql()
    }
}

// ============================================================================
// Task
// ============================================================================

pub struct TaskObject {
    task: Task,
    project: Option<Project>,
    comments: Option<Vec<Comment>>,
}

impl TaskObject {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            project: None,
            comments: None,
        }
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = Some(comments);
        self
    }
}

#[Object(name = "Task")]
impl TaskObject {
    async fn id(&self) -> ID {
        ID(self.task.id.clone())
    }

    async fn title(&self) -> &str {
        &self.task.title
    }

    async fn description(&self) -> Option<&str> {
        self.task.description.as_deref()
    }

    async fn status(&self) -> TaskStatusValue {
        self.task.status.into()
    }

    async fn assignee_email(&self) -> Option<&str> {
        self.task.assignee_email.as_deref()
    }

    async fn due_date(&self) -> Option<DateTime<Utc>> {
        self.task.due_date
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.task.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.task.updated_at
    }

    /// Past its due date and not done
    async fn is_overdue(&self) -> bool {
        self.task.is_overdue(Utc::now())
    }

    async fn comment_count(&self, ctx: &Context<'_>) -> async_graphql::Result<i64> {
        if let Some(comments) = &self.comments {
            return Ok(comments.len() as i64);
        }
        store(ctx)?.count_comments(&self.task.id).await.graphql()
    }

    async fn project(&self, ctx: &Context<'_>) -> async_graphql::Result<ProjectObject> {
        // The preloaded row may predate the enclosing mutation; fields that
        // depend on other rows (tasks, stats) are resolved live either way.
        if let Some(project) = &self.project {
            return Ok(ProjectObject::new(project.clone()));
        }

        store(ctx)?
            .find_project(&self.task.project_id)
            .await
            .graphql()?
            .map(ProjectObject::new)
            .ok_or_else(|| TrackerError::not_found("Project", &self.task.project_id))
            .graphql()
    }

    /// Comments, oldest first
    async fn comments(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<CommentObject>> {
        let comments = match &self.comments {
            Some(comments) => comments.clone(),
            None => store(ctx)?.list_comments(&self.task.id).await.graphql()?,
        };

        Ok(comments
            .into_iter()
            .map(|comment| CommentObject::new(comment).with_task(self.task.clone()))
            .collect())
    }
}

// ============================================================================
// Comment
// ============================================================================

pub struct CommentObject {
    comment: Comment,
    task: Option<Task>,
}

impl CommentObject {
    pub fn new(comment: Comment) -> Self {
        Self {
            comment,
            task: None,
        }
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.task = Some(task);
        self
    }
}

#[Object(name = "TaskComment")]
impl CommentObject {
    async fn id(&self) -> ID {
        ID(self.comment.id.clone())
    }

    async fn content(&self) -> &str {
        &self.comment.content
    }

    async fn author_email(&self) -> &str {
        &self.comment.author_email
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.comment.created_at
    }

    /// The commented task; its comment list is read live
    async fn task(&self, ctx: &Context<'_>) -> async_graphql::Result<TaskObject> {
        if let Some(task) = &self.task {
            return Ok(TaskObject::new(task.clone()));
        }

        store(ctx)?
            .find_task(&self.comment.task_id)
            .await
            .graphql()?
            .map(TaskObject::new)
            .ok_or_else(|| TrackerError::not_found("Task", &self.comment.task_id))
            .graphql()
    }
}

// ============================================================================
// Derived
// ============================================================================

#[derive(SimpleObject, Debug, Clone, Copy, PartialEq)]
#[graphql(name = "TaskStats")]
pub struct TaskStatsObject {
    pub total: u32,
    pub completed: u32,
    pub in_progress: u32,
    pub todo: u32,
    pub completion_rate: f64,
}

impl From<TaskStats> for TaskStatsObject {
    fn from(stats: TaskStats) -> Self {
        Self {
            total: stats.total,
            completed: stats.completed,
            in_progress: stats.in_progress,
            todo: stats.todo,
            completion_rate: stats.completion_rate,
        }
    }
}

/// Result of `deleteTask`: the removed id and its parent project
#[derive(SimpleObject)]
#[graphql(name = "DeletedTask", complex)]
pub struct DeletedTaskObject {
    pub id: ID,

    #[graphql(skip)]
    pub project: Project,
}

#[ComplexObject]
impl DeletedTaskObject {
    /// The parent project, with stats reflecting the deletion
    async fn project(&self) -> ProjectObject {
        ProjectObject::new(self.project.clone())
    }
}
