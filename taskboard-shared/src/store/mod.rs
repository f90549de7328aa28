//! Persistence layer
//!
//! The [`Store`] trait is the seam between the resolvers and the database.
//! Two implementations are provided:
//!
//! - [`postgres::PgStore`]: sqlx/PostgreSQL, used in production
//! - [`memory::MemoryStore`]: in-process tables with the same semantics
//!   (cascading deletes, per-organization project name uniqueness, ordering),
//!   used for local development and tests
//!
//! # Scoped writes
//!
//! Updates and deletes take the caller's organization id and only touch rows
//! owned by it. A row that vanished (or moved tenants) between the ownership
//! check and the write is reported as `None` / `false`, never written.
//!
//! # Ordering
//!
//! - Projects: newest first
//! - Tasks: newest first
//! - Comments: oldest first

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::comment::{Comment, CreateComment};
use crate::models::organization::{CreateOrganization, Organization};
use crate::models::project::{CreateProject, Project, ProjectPatch};
use crate::models::task::{CreateTask, Task, TaskPatch, TaskStatus};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated
    #[error("Duplicate {0}")]
    Duplicate(String),

    /// The parent row of an insert does not exist
    #[error("{entity} not found: {id}")]
    MissingParent { entity: &'static str, id: String },

    /// A stored value could not be decoded
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Abstract interface over the four tracker tables
#[async_trait]
pub trait Store: Send + Sync {
    /// Verifies the store is reachable
    async fn health_check(&self) -> StoreResult<()>;

    // ========================================================================
    // Organizations
    // ========================================================================

    /// Inserts the organization unless its slug already exists
    ///
    /// Returns the stored organization either way.
    async fn ensure_organization(&self, data: CreateOrganization) -> StoreResult<Organization>;

    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>>;

    async fn find_organization_by_id(&self, id: &str) -> StoreResult<Option<Organization>>;

    /// Number of projects owned by the organization
    async fn count_projects(&self, organization_id: &str) -> StoreResult<i64>;

    /// Number of tasks across all of the organization's projects
    async fn count_organization_tasks(&self, organization_id: &str) -> StoreResult<i64>;

    // ========================================================================
    // Projects
    // ========================================================================

    async fn insert_project(&self, organization_id: &str, data: CreateProject)
        -> StoreResult<Project>;

    async fn find_project(&self, id: &str) -> StoreResult<Option<Project>>;

    /// Lists the organization's projects, newest first
    async fn list_projects(&self, organization_id: &str) -> StoreResult<Vec<Project>>;

    /// Applies `patch` to a project owned by `organization_id`
    ///
    /// Returns `None` if no such project exists.
    async fn update_project(
        &self,
        organization_id: &str,
        id: &str,
        patch: &ProjectPatch,
    ) -> StoreResult<Option<Project>>;

    /// Deletes a project owned by `organization_id`, cascading to its tasks
    /// and their comments
    async fn delete_project(&self, organization_id: &str, id: &str) -> StoreResult<bool>;

    // ========================================================================
    // Tasks
    // ========================================================================

    /// Inserts a task; fails with `MissingParent` if the project is gone
    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task>;

    async fn find_task(&self, id: &str) -> StoreResult<Option<Task>>;

    /// Lists a project's tasks, newest first
    async fn list_tasks(&self, project_id: &str) -> StoreResult<Vec<Task>>;

    /// Lists tasks across all of the organization's projects, newest first
    async fn list_organization_tasks(&self, organization_id: &str) -> StoreResult<Vec<Task>>;

    /// Statuses of every task in a project (input to the stats fold)
    async fn task_statuses(&self, project_id: &str) -> StoreResult<Vec<TaskStatus>>;

    /// Applies `patch` to a task whose project is owned by `organization_id`
    async fn update_task(
        &self,
        organization_id: &str,
        id: &str,
        patch: &TaskPatch,
    ) -> StoreResult<Option<Task>>;

    /// Deletes a task whose project is owned by `organization_id`, cascading to
    /// its comments
    async fn delete_task(&self, organization_id: &str, id: &str) -> StoreResult<bool>;

    // ========================================================================
    // Comments
    // ========================================================================

    /// Inserts a comment; fails with `MissingParent` if the task is gone
    async fn insert_comment(&self, data: CreateComment) -> StoreResult<Comment>;

    /// Lists a task's comments, oldest first
    async fn list_comments(&self, task_id: &str) -> StoreResult<Vec<Comment>>;

    async fn count_comments(&self, task_id: &str) -> StoreResult<i64>;
}
