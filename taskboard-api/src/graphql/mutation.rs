//! Mutation root
//!
//! Every mutation resolves the tenant first and goes through the tenant
//! scope's ownership check before writing.

use async_graphql::{Context, Object, ID};
use taskboard_shared::models::project::CreateProject;

use super::inputs::{
    CreateCommentInput, CreateProjectInput, CreateTaskInput, UpdateProjectInput, UpdateTaskInput,
};
use super::objects::{CommentObject, DeletedTaskObject, ProjectObject, TaskObject};
use super::scope;
use crate::error::GraphqlResultExt;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Creates a project in the tenant (status defaults to ACTIVE)
    async fn create_project(
        &self,
        ctx: &Context<'_>,
        input: CreateProjectInput,
    ) -> async_graphql::Result<ProjectObject> {
        let scope = scope(ctx).await?;
        let project = scope
            .create_project(CreateProject::from(input))
            .await
            .graphql()?;

        Ok(ProjectObject::new(project)
            .with_organization(scope.organization().clone())
            .with_tasks(Vec::new()))
    }

    /// Changes only the supplied fields of a project
    async fn update_project(
        &self,
        ctx: &Context<'_>,
        input: UpdateProjectInput,
    ) -> async_graphql::Result<ProjectObject> {
        let (id, patch) = input.into_patch().graphql()?;

        let scope = scope(ctx).await?;
        let project = scope.update_project(&id, patch).await.graphql()?;

        Ok(ProjectObject::new(project).with_organization(scope.organization().clone()))
    }

    /// Deletes a project with all of its tasks and comments
    async fn delete_project(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let scope = scope(ctx).await?;
        scope.delete_project(&id).await.graphql()?;
        Ok(true)
    }

    /// Creates a task under one of the tenant's projects (status defaults to
    /// TODO)
    async fn create_task(
        &self,
        ctx: &Context<'_>,
        input: CreateTaskInput,
    ) -> async_graphql::Result<TaskObject> {
        let scope = scope(ctx).await?;
        let (task, project) = scope.create_task(input.into()).await.graphql()?;

        Ok(TaskObject::new(task)
            .with_project(project)
            .with_comments(Vec::new()))
    }

    /// Changes only the supplied fields of a task
    async fn update_task(
        &self,
        ctx: &Context<'_>,
        input: UpdateTaskInput,
    ) -> async_graphql::Result<TaskObject> {
        let (id, patch) = input.into_patch().graphql()?;

        let scope = scope(ctx).await?;
        let (task, project) = scope.update_task(&id, patch).await.graphql()?;

        Ok(TaskObject::new(task).with_project(project))
    }

    /// Deletes a task and its comments; returns the id and the parent project
    async fn delete_task(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<DeletedTaskObject> {
        let scope = scope(ctx).await?;
        let project = scope.delete_task(&id).await.graphql()?;

        Ok(DeletedTaskObject { id, project })
    }

    /// Posts a comment on one of the tenant's tasks
    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        input: CreateCommentInput,
    ) -> async_graphql::Result<CommentObject> {
        let scope = scope(ctx).await?;
        let (comment, task) = scope.create_comment(input.into()).await.graphql()?;

        Ok(CommentObject::new(comment).with_task(task))
    }
}
