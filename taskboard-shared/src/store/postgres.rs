//! PostgreSQL store
//!
//! Implements [`Store`] over a sqlx `PgPool`. Partial updates run as a single
//! transaction: the target row is locked with `SELECT ... FOR UPDATE`, the
//! patch is merged in Rust, and the full row is written back. Ownership is
//! part of every scoped `WHERE` clause.
//!
//! # Example
//!
//! ```no_run
//! use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
//! use taskboard_shared::store::{PgStore, Store};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool(DatabaseConfig {
//!     url: std::env::var("DATABASE_URL")?,
//!     ..Default::default()
//! })
//! .await?;
//!
//! let store = PgStore::new(pool);
//! let org = store.find_organization_by_slug("demo-org").await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use sqlx::PgPool;

use super::{Store, StoreError, StoreResult};
use crate::db::pool::health_check;
use crate::models::comment::{Comment, CreateComment};
use crate::models::new_id;
use crate::models::organization::{CreateOrganization, Organization};
use crate::models::project::{CreateProject, Project, ProjectPatch};
use crate::models::task::{CreateTask, Task, TaskPatch, TaskStatus};

const ORGANIZATION_COLUMNS: &str = "id, name, slug, contact_email, created_at, updated_at";

const PROJECT_COLUMNS: &str =
    "id, organization_id, name, description, status, due_date, created_at, updated_at";

const TASK_COLUMNS: &str = "t.id, t.project_id, t.title, t.description, t.status, \
     t.assignee_email, t.due_date, t.created_at, t.updated_at";

const COMMENT_COLUMNS: &str = "id, task_id, content, author_email, created_at";

/// Store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    ///
    /// The schema must already be migrated (see `db::migrations`).
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps constraint violations onto store errors
///
/// `parent` names the row an insert depends on, for foreign-key failures.
fn classify(err: sqlx::Error, parent: Option<(&'static str, &str)>) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let what = match db_err.constraint() {
                Some("projects_organization_name_key") => "project name".to_string(),
                Some(constraint) => constraint.to_string(),
                None => "value".to_string(),
            };
            return StoreError::Duplicate(what);
        }
        if db_err.is_foreign_key_violation() {
            if let Some((entity, id)) = parent {
                return StoreError::MissingParent {
                    entity,
                    id: id.to_string(),
                };
            }
        }
    }
    if let sqlx::Error::ColumnDecode { source, .. } = &err {
        return StoreError::Corrupt(source.to_string());
    }
    StoreError::Database(err)
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn ensure_organization(&self, data: CreateOrganization) -> StoreResult<Organization> {
        let id = data.id.unwrap_or_else(new_id);

        sqlx::query(
            r#"
            INSERT INTO organizations (id, name, slug, contact_email)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(&id)
        .bind(&data.name)
        .bind(&data.slug)
        .bind(&data.contact_email)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, None))?;

        let organization = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE slug = $1"
        ))
        .bind(&data.slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(organization)
    }

    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    async fn find_organization_by_id(&self, id: &str) -> StoreResult<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    async fn count_projects(&self, organization_id: &str) -> StoreResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM projects WHERE organization_id = $1")
                .bind(organization_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn count_organization_tasks(&self, organization_id: &str) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE p.organization_id = $1
            "#,
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn insert_project(
        &self,
        organization_id: &str,
        data: CreateProject,
    ) -> StoreResult<Project> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (id, organization_id, name, description, status, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(new_id())
        .bind(organization_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.status.unwrap_or_default().as_str())
        .bind(data.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, Some(("Organization", organization_id))))?;

        Ok(project)
    }

    async fn find_project(&self, id: &str) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, None))?;

        Ok(project)
    }

    async fn list_projects(&self, organization_id: &str) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE organization_id = $1
            ORDER BY created_at DESC, id
            "#
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, None))?;

        Ok(projects)
    }

    async fn update_project(
        &self,
        organization_id: &str,
        id: &str,
        patch: &ProjectPatch,
    ) -> StoreResult<Option<Project>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE id = $1 AND organization_id = $2
            FOR UPDATE
            "#
        ))
        .bind(id)
        .bind(organization_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| classify(e, None))?;

        let Some(mut project) = current else {
            return Ok(None);
        };

        if patch.apply_to(&mut project) {
            project = sqlx::query_as::<_, Project>(&format!(
                r#"
                UPDATE projects
                SET name = $3, description = $4, status = $5, due_date = $6,
                    updated_at = NOW()
                WHERE id = $1 AND organization_id = $2
                RETURNING {PROJECT_COLUMNS}
                "#
            ))
            .bind(id)
            .bind(organization_id)
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.status.as_str())
            .bind(project.due_date)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| classify(e, None))?;
        }

        tx.commit().await?;
        Ok(Some(project))
    }

    async fn delete_project(&self, organization_id: &str, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks AS t
                (id, project_id, title, description, status, assignee_email, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(new_id())
        .bind(&data.project_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.status.unwrap_or_default().as_str())
        .bind(&data.assignee_email)
        .bind(data.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, Some(("Project", &data.project_id))))?;

        Ok(task)
    }

    async fn find_task(&self, id: &str) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks t WHERE t.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, None))?;

        Ok(task)
    }

    async fn list_tasks(&self, project_id: &str) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks t
            WHERE t.project_id = $1
            ORDER BY t.created_at DESC, t.id
            "#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, None))?;

        Ok(tasks)
    }

    async fn list_organization_tasks(&self, organization_id: &str) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE p.organization_id = $1
            ORDER BY t.created_at DESC, t.id
            "#
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, None))?;

        Ok(tasks)
    }

    async fn task_statuses(&self, project_id: &str) -> StoreResult<Vec<TaskStatus>> {
        let raw: Vec<String> = sqlx::query_scalar("SELECT status FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;

        raw.into_iter()
            .map(|s| {
                s.parse::<TaskStatus>()
                    .map_err(|e| StoreError::Corrupt(e.to_string()))
            })
            .collect()
    }

    async fn update_task(
        &self,
        organization_id: &str,
        id: &str,
        patch: &TaskPatch,
    ) -> StoreResult<Option<Task>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE t.id = $1 AND p.organization_id = $2
            FOR UPDATE OF t
            "#
        ))
        .bind(id)
        .bind(organization_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| classify(e, None))?;

        let Some(mut task) = current else {
            return Ok(None);
        };

        if patch.apply_to(&mut task) {
            task = sqlx::query_as::<_, Task>(&format!(
                r#"
                UPDATE tasks AS t
                SET title = $2, description = $3, status = $4, assignee_email = $5,
                    due_date = $6, updated_at = NOW()
                WHERE t.id = $1
                RETURNING {TASK_COLUMNS}
                "#
            ))
            .bind(id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status.as_str())
            .bind(&task.assignee_email)
            .bind(task.due_date)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| classify(e, None))?;
        }

        tx.commit().await?;
        Ok(Some(task))
    }

    async fn delete_task(&self, organization_id: &str, id: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks t
            USING projects p
            WHERE t.id = $1 AND t.project_id = p.id AND p.organization_id = $2
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_comment(&self, data: CreateComment) -> StoreResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO task_comments (id, task_id, content, author_email)
            VALUES ($1, $2, $3, $4)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(new_id())
        .bind(&data.task_id)
        .bind(&data.content)
        .bind(&data.author_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, Some(("Task", &data.task_id))))?;

        Ok(comment)
    }

    async fn list_comments(&self, task_id: &str) -> StoreResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM task_comments
            WHERE task_id = $1
            ORDER BY created_at ASC, id
            "#
        ))
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn count_comments(&self, task_id: &str) -> StoreResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM task_comments WHERE task_id = $1")
                .bind(task_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
