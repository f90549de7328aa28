//! Query root

use async_graphql::{Context, Object, ID};

use super::objects::{CommentObject, OrganizationObject, ProjectObject, TaskObject};
use super::{scope, store};
use crate::error::GraphqlResultExt;

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Looks up an organization by slug; null if there is none
    async fn organization(
        &self,
        ctx: &Context<'_>,
        slug: String,
    ) -> async_graphql::Result<Option<OrganizationObject>> {
        let organization = store(ctx)?
            .find_organization_by_slug(&slug)
            .await
            .graphql()?;

        Ok(organization.map(OrganizationObject))
    }

    /// The tenant's projects, newest first
    async fn projects(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<ProjectObject>> {
        let scope = scope(ctx).await?;
        let projects = scope.list_projects().await.graphql()?;

        Ok(projects
            .into_iter()
            .map(|project| {
                ProjectObject::new(project).with_organization(scope.organization().clone())
            })
            .collect())
    }

    /// One of the tenant's projects; null if absent or owned by another
    /// organization
    async fn project(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<ProjectObject>> {
        let scope = scope(ctx).await?;
        let project = scope.visible_project(&id).await.graphql()?;

        Ok(project.map(|project| {
            ProjectObject::new(project).with_organization(scope.organization().clone())
        }))
    }

    /// A task by id; null if absent, ACCESS_DENIED if another organization
    /// owns it
    async fn task(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<TaskObject>> {
        let Some(task) = store(ctx)?.find_task(&id).await.graphql()? else {
            return Ok(None);
        };

        let scope = scope(ctx).await?;
        let project = scope.project_of(&task).await.graphql()?;

        Ok(Some(TaskObject::new(task).with_project(project)))
    }

    /// Tasks of one project, or of every project in the tenant
    async fn tasks(
        &self,
        ctx: &Context<'_>,
        project_id: Option<ID>,
    ) -> async_graphql::Result<Vec<TaskObject>> {
        let scope = scope(ctx).await?;
        let tasks = scope
            .list_tasks(project_id.as_ref().map(|id| id.as_str()))
            .await
            .graphql()?;

        Ok(tasks.into_iter().map(TaskObject::new).collect())
    }

    /// Comments on one of the tenant's tasks, oldest first
    async fn comments(
        &self,
        ctx: &Context<'_>,
        task_id: ID,
    ) -> async_graphql::Result<Vec<CommentObject>> {
        let scope = scope(ctx).await?;
        let comments = scope.list_comments(&task_id).await.graphql()?;

        Ok(comments.into_iter().map(CommentObject::new).collect())
    }
}
