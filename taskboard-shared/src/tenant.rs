//! Tenant resolution and scoped operations
//!
//! A request names its organization by slug ([`TenantContext`]). Before any
//! organization-scoped read or write, the slug is resolved into a
//! [`TenantScope`], which carries the organization row and performs every
//! ownership check through [`TenantScope::authorize_project`].
//!
//! # Error taxonomy
//!
//! - unknown slug: `TenantNotFound`
//! - missing project/task: `NotFound`
//! - project/task owned by another organization: `AccessDenied`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskboard_shared::models::project::CreateProject;
//! use taskboard_shared::store::{MemoryStore, Store};
//! use taskboard_shared::tenant::{TenantContext, TenantScope};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
//! let scope = TenantScope::resolve(store, &TenantContext::default()).await?;
//!
//! let project = scope
//!     .create_project(CreateProject {
//!         name: "Launch".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use validator::Validate;

use crate::error::{TrackerError, TrackerResult};
use crate::models::comment::{Comment, CreateComment};
use crate::models::organization::{Organization, DEMO_ORGANIZATION_SLUG};
use crate::models::patch::non_blank;
use crate::models::project::{CreateProject, Project, ProjectPatch};
use crate::models::task::{CreateTask, Task, TaskPatch};
use crate::store::Store;

/// Header carrying the tenant slug
pub const TENANT_HEADER: &str = "x-organization-slug";

/// Tenant selected by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub slug: String,
}

impl Default for TenantContext {
    fn default() -> Self {
        Self::new(DEMO_ORGANIZATION_SLUG)
    }
}

impl TenantContext {
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }

    /// Builds the context from a raw header value
    ///
    /// Absent or blank values fall back to `default_slug`.
    pub fn from_header(value: Option<&str>, default_slug: &str) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(slug) => Self::new(slug),
            None => Self::new(default_slug),
        }
    }
}

/// A resolved organization plus the store, for scoped operations
#[derive(Clone)]
pub struct TenantScope {
    store: Arc<dyn Store>,
    organization: Organization,
}

impl std::fmt::Debug for TenantScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantScope")
            .field("organization", &self.organization.slug)
            .finish()
    }
}

impl TenantScope {
    /// Resolves the tenant slug to an organization
    ///
    /// # Errors
    ///
    /// `TenantNotFound` if no organization has the slug.
    pub async fn resolve(store: Arc<dyn Store>, tenant: &TenantContext) -> TrackerResult<Self> {
        let organization = store
            .find_organization_by_slug(&tenant.slug)
            .await?
            .ok_or_else(|| {
                tracing::debug!(slug = %tenant.slug, "Unknown tenant slug");
                TrackerError::TenantNotFound(tenant.slug.clone())
            })?;

        Ok(Self {
            store,
            organization,
        })
    }

    pub fn organization(&self) -> &Organization {
        &self.organization
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// The single ownership check for projects (and, through them, tasks)
    pub fn authorize_project(&self, project: &Project) -> TrackerResult<()> {
        if project.organization_id == self.organization.id {
            return Ok(());
        }

        tracing::warn!(
            organization_id = %self.organization.id,
            project_id = %project.id,
            "Cross-tenant project access denied"
        );
        Err(TrackerError::access_denied("Project", &project.id))
    }

    /// Fetches a project the tenant owns
    ///
    /// # Errors
    ///
    /// `NotFound` if the project does not exist, `AccessDenied` if another
    /// organization owns it.
    pub async fn owned_project(&self, id: &str) -> TrackerResult<Project> {
        let project = self
            .store
            .find_project(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Project", id))?;

        self.authorize_project(&project)?;
        Ok(project)
    }

    /// Fetches a project, hiding rows the tenant does not own
    pub async fn visible_project(&self, id: &str) -> TrackerResult<Option<Project>> {
        let project = self.store.find_project(id).await?;
        Ok(project.filter(|p| p.organization_id == self.organization.id))
    }

    /// Resolves a task's parent project and checks the tenant owns it
    pub async fn project_of(&self, task: &Task) -> TrackerResult<Project> {
        let project = self
            .store
            .find_project(&task.project_id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Project", &task.project_id))?;

        self.authorize_project(&project)?;
        Ok(project)
    }

    /// Fetches a task the tenant owns, together with its project
    pub async fn owned_task(&self, id: &str) -> TrackerResult<(Task, Project)> {
        let task = self
            .store
            .find_task(id)
            .await?
            .ok_or_else(|| TrackerError::not_found("Task", id))?;

        let project = self.project_of(&task).await?;
        Ok((task, project))
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// The tenant's projects, newest first
    pub async fn list_projects(&self) -> TrackerResult<Vec<Project>> {
        let projects = self.store.list_projects(&self.organization.id).await?;

        tracing::debug!(
            organization_id = %self.organization.id,
            count = projects.len(),
            "Listed projects"
        );
        Ok(projects)
    }

    /// Tasks of one owned project, or of every project when `project_id` is
    /// `None`
    pub async fn list_tasks(&self, project_id: Option<&str>) -> TrackerResult<Vec<Task>> {
        let tasks = match project_id {
            Some(id) => {
                let project = self.owned_project(id).await?;
                self.store.list_tasks(&project.id).await?
            }
            None => {
                self.store
                    .list_organization_tasks(&self.organization.id)
                    .await?
            }
        };
        Ok(tasks)
    }

    /// Comments on an owned task, oldest first
    pub async fn list_comments(&self, task_id: &str) -> TrackerResult<Vec<Comment>> {
        let (task, _) = self.owned_task(task_id).await?;
        Ok(self.store.list_comments(&task.id).await?)
    }

    // ========================================================================
    // Project writes
    // ========================================================================

    pub async fn create_project(&self, mut input: CreateProject) -> TrackerResult<Project> {
        input.name = input.name.trim().to_string();
        input.description = non_blank(input.description);
        input.validate()?;

        let project = self
            .store
            .insert_project(&self.organization.id, input)
            .await?;

        tracing::info!(
            organization_id = %self.organization.id,
            project_id = %project.id,
            name = %project.name,
            "Project created"
        );
        Ok(project)
    }

    /// Applies the supplied fields to an owned project
    pub async fn update_project(&self, id: &str, patch: ProjectPatch) -> TrackerResult<Project> {
        patch.validate()?;
        self.owned_project(id).await?;

        let project = self
            .store
            .update_project(&self.organization.id, id, &patch)
            .await?
            .ok_or_else(|| TrackerError::not_found("Project", id))?;

        tracing::info!(
            organization_id = %self.organization.id,
            project_id = %project.id,
            "Project updated"
        );
        Ok(project)
    }

    /// Deletes an owned project along with its tasks and comments
    pub async fn delete_project(&self, id: &str) -> TrackerResult<()> {
        self.owned_project(id).await?;

        if !self.store.delete_project(&self.organization.id, id).await? {
            return Err(TrackerError::not_found("Project", id));
        }

        tracing::info!(
            organization_id = %self.organization.id,
            project_id = %id,
            "Project deleted"
        );
        Ok(())
    }

    // ========================================================================
    // Task writes
    // ========================================================================

    /// Creates a task under an owned project
    pub async fn create_task(&self, mut input: CreateTask) -> TrackerResult<(Task, Project)> {
        input.title = input.title.trim().to_string();
        input.description = non_blank(input.description);
        input.assignee_email = non_blank(input.assignee_email);
        input.validate()?;

        let project = self.owned_project(&input.project_id).await?;
        let task = self.store.insert_task(input).await?;

        tracing::info!(
            organization_id = %self.organization.id,
            project_id = %project.id,
            task_id = %task.id,
            "Task created"
        );
        Ok((task, project))
    }

    /// Applies the supplied fields to an owned task
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> TrackerResult<(Task, Project)> {
        patch.validate()?;
        let (_, project) = self.owned_task(id).await?;

        let task = self
            .store
            .update_task(&self.organization.id, id, &patch)
            .await?
            .ok_or_else(|| TrackerError::not_found("Task", id))?;

        tracing::info!(
            organization_id = %self.organization.id,
            task_id = %task.id,
            "Task updated"
        );
        Ok((task, project))
    }

    /// Deletes an owned task and its comments, returning the parent project
    pub async fn delete_task(&self, id: &str) -> TrackerResult<Project> {
        let (_, project) = self.owned_task(id).await?;

        if !self.store.delete_task(&self.organization.id, id).await? {
            return Err(TrackerError::not_found("Task", id));
        }

        tracing::info!(
            organization_id = %self.organization.id,
            project_id = %project.id,
            task_id = %id,
            "Task deleted"
        );
        Ok(project)
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Posts a comment on an owned task
    pub async fn create_comment(&self, input: CreateComment) -> TrackerResult<(Comment, Task)> {
        input.validate()?;
        let (task, _) = self.owned_task(&input.task_id).await?;

        let comment = self.store.insert_comment(input).await?;

        tracing::info!(
            organization_id = %self.organization.id,
            task_id = %task.id,
            comment_id = %comment.id,
            "Comment created"
        );
        Ok((comment, task))
    }
}
