//! In-memory store
//!
//! Keeps all four tables behind one `tokio::sync::RwLock`, so every operation
//! observes a consistent snapshot. Mirrors the PostgreSQL schema's rules:
//! cascading deletes, unique organization slugs, unique project names per
//! organization, and foreign-key checks on insert.
//!
//! Rows carry an insertion sequence number that breaks ties between equal
//! `created_at` timestamps, so list ordering is deterministic.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use tokio::sync::RwLock;

use super::{Store, StoreError, StoreResult};
use crate::models::comment::{Comment, CreateComment};
use crate::models::new_id;
use crate::models::organization::{CreateOrganization, Organization};
use crate::models::project::{CreateProject, Project, ProjectPatch};
use crate::models::task::{CreateTask, Task, TaskPatch, TaskStatus};

#[derive(Debug, Clone)]
struct Row<T> {
    seq: u64,
    value: T,
}

#[derive(Debug, Default)]
struct Tables {
    organizations: HashMap<String, Organization>,
    projects: HashMap<String, Row<Project>>,
    tasks: HashMap<String, Row<Task>>,
    comments: HashMap<String, Row<Comment>>,
    next_seq: u64,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn project_owned_by(&self, organization_id: &str, project_id: &str) -> bool {
        self.projects
            .get(project_id)
            .is_some_and(|row| row.value.organization_id == organization_id)
    }

    fn name_taken(&self, organization_id: &str, name: &str, except_id: Option<&str>) -> bool {
        self.projects.values().any(|row| {
            row.value.organization_id == organization_id
                && row.value.name == name
                && Some(row.value.id.as_str()) != except_id
        })
    }

    fn remove_task_cascade(&mut self, task_id: &str) {
        self.tasks.remove(task_id);
        self.comments.retain(|_, row| row.value.task_id != task_id);
    }
}

/// Sorts rows by `(created_at, seq)`, newest first
fn newest_first<T: Clone>(mut rows: Vec<&Row<T>>, created_at: fn(&T) -> DateTime<Utc>) -> Vec<T> {
    rows.sort_by(|a, b| {
        (created_at(&b.value), b.seq).cmp(&(created_at(&a.value), a.seq))
    });
    rows.into_iter().map(|row| row.value.clone()).collect()
}

/// Matches the microsecond precision of `TIMESTAMPTZ`
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Store backed by in-process hash maps
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn ensure_organization(&self, data: CreateOrganization) -> StoreResult<Organization> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables
            .organizations
            .values()
            .find(|org| org.slug == data.slug)
        {
            return Ok(existing.clone());
        }

        let id = data.id.unwrap_or_else(new_id);
        if tables.organizations.contains_key(&id) {
            return Err(StoreError::Duplicate(format!("organization id {id}")));
        }

        let created_at = now();
        let organization = Organization {
            id: id.clone(),
            name: data.name,
            slug: data.slug,
            contact_email: data.contact_email,
            created_at,
            updated_at: created_at,
        };
        tables.organizations.insert(id, organization.clone());

        Ok(organization)
    }

    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>> {
        let tables = self.tables.read().await;
        Ok(tables
            .organizations
            .values()
            .find(|org| org.slug == slug)
            .cloned())
    }

    async fn find_organization_by_id(&self, id: &str) -> StoreResult<Option<Organization>> {
        let tables = self.tables.read().await;
        Ok(tables.organizations.get(id).cloned())
    }

    async fn count_projects(&self, organization_id: &str) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .projects
            .values()
            .filter(|row| row.value.organization_id == organization_id)
            .count();
        Ok(count as i64)
    }

    async fn count_organization_tasks(&self, organization_id: &str) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .tasks
            .values()
            .filter(|row| tables.project_owned_by(organization_id, &row.value.project_id))
            .count();
        Ok(count as i64)
    }

    async fn insert_project(
        &self,
        organization_id: &str,
        data: CreateProject,
    ) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;

        if !tables.organizations.contains_key(organization_id) {
            return Err(StoreError::MissingParent {
                entity: "Organization",
                id: organization_id.to_string(),
            });
        }
        if tables.name_taken(organization_id, &data.name, None) {
            return Err(StoreError::Duplicate(format!("project name '{}'", data.name)));
        }

        let created_at = now();
        let project = Project {
            id: new_id(),
            organization_id: organization_id.to_string(),
            name: data.name,
            description: data.description,
            status: data.status.unwrap_or_default(),
            due_date: data.due_date,
            created_at,
            updated_at: created_at,
        };

        let seq = tables.next_seq();
        tables.projects.insert(
            project.id.clone(),
            Row {
                seq,
                value: project.clone(),
            },
        );

        Ok(project)
    }

    async fn find_project(&self, id: &str) -> StoreResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.get(id).map(|row| row.value.clone()))
    }

    async fn list_projects(&self, organization_id: &str) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        let rows = tables
            .projects
            .values()
            .filter(|row| row.value.organization_id == organization_id)
            .collect();
        Ok(newest_first(rows, |p: &Project| p.created_at))
    }

    async fn update_project(
        &self,
        organization_id: &str,
        id: &str,
        patch: &ProjectPatch,
    ) -> StoreResult<Option<Project>> {
        let mut tables = self.tables.write().await;

        if !tables.project_owned_by(organization_id, id) {
            return Ok(None);
        }
        if let Some(name) = patch.name.as_set() {
            if tables.name_taken(organization_id, name, Some(id)) {
                return Err(StoreError::Duplicate(format!("project name '{name}'")));
            }
        }

        let Some(row) = tables.projects.get_mut(id) else {
            return Ok(None);
        };
        if patch.apply_to(&mut row.value) {
            row.value.updated_at = now();
        }

        Ok(Some(row.value.clone()))
    }

    async fn delete_project(&self, organization_id: &str, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        if !tables.project_owned_by(organization_id, id) {
            return Ok(false);
        }
        tables.projects.remove(id);

        let task_ids: Vec<String> = tables
            .tasks
            .values()
            .filter(|row| row.value.project_id == id)
            .map(|row| row.value.id.clone())
            .collect();
        for task_id in &task_ids {
            tables.remove_task_cascade(task_id);
        }

        Ok(true)
    }

    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;

        if !tables.projects.contains_key(&data.project_id) {
            return Err(StoreError::MissingParent {
                entity: "Project",
                id: data.project_id,
            });
        }

        let created_at = now();
        let task = Task {
            id: new_id(),
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status.unwrap_or_default(),
            assignee_email: data.assignee_email,
            due_date: data.due_date,
            created_at,
            updated_at: created_at,
        };

        let seq = tables.next_seq();
        tables.tasks.insert(
            task.id.clone(),
            Row {
                seq,
                value: task.clone(),
            },
        );

        Ok(task)
    }

    async fn find_task(&self, id: &str) -> StoreResult<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.get(id).map(|row| row.value.clone()))
    }

    async fn list_tasks(&self, project_id: &str) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let rows = tables
            .tasks
            .values()
            .filter(|row| row.value.project_id == project_id)
            .collect();
        Ok(newest_first(rows, |t: &Task| t.created_at))
    }

    async fn list_organization_tasks(&self, organization_id: &str) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let rows = tables
            .tasks
            .values()
            .filter(|row| tables.project_owned_by(organization_id, &row.value.project_id))
            .collect();
        Ok(newest_first(rows, |t: &Task| t.created_at))
    }

    async fn task_statuses(&self, project_id: &str) -> StoreResult<Vec<TaskStatus>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|row| row.value.project_id == project_id)
            .map(|row| row.value.status)
            .collect())
    }

    async fn update_task(
        &self,
        organization_id: &str,
        id: &str,
        patch: &TaskPatch,
    ) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;

        let owned = tables
            .tasks
            .get(id)
            .is_some_and(|row| tables.project_owned_by(organization_id, &row.value.project_id));
        if !owned {
            return Ok(None);
        }

        let Some(row) = tables.tasks.get_mut(id) else {
            return Ok(None);
        };
        if patch.apply_to(&mut row.value) {
            row.value.updated_at = now();
        }

        Ok(Some(row.value.clone()))
    }

    async fn delete_task(&self, organization_id: &str, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let owned = tables
            .tasks
            .get(id)
            .is_some_and(|row| tables.project_owned_by(organization_id, &row.value.project_id));
        if !owned {
            return Ok(false);
        }

        tables.remove_task_cascade(id);
        Ok(true)
    }

    async fn insert_comment(&self, data: CreateComment) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;

        if !tables.tasks.contains_key(&data.task_id) {
            return Err(StoreError::MissingParent {
                entity: "Task",
                id: data.task_id,
            });
        }

        let comment = Comment {
            id: new_id(),
            task_id: data.task_id,
            content: data.content,
            author_email: data.author_email,
            created_at: now(),
        };

        let seq = tables.next_seq();
        tables.comments.insert(
            comment.id.clone(),
            Row {
                seq,
                value: comment.clone(),
            },
        );

        Ok(comment)
    }

    async fn list_comments(&self, task_id: &str) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        let rows = tables
            .comments
            .values()
            .filter(|row| row.value.task_id == task_id)
            .collect();
        let mut comments = newest_first(rows, |c: &Comment| c.created_at);
        comments.reverse();
        Ok(comments)
    }

    async fn count_comments(&self, task_id: &str) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .comments
            .values()
            .filter(|row| row.value.task_id == task_id)
            .count();
        Ok(count as i64)
    }
}
