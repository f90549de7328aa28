//! GraphQL schema and resolvers
//!
//! The schema carries the `Arc<dyn Store>` as schema data; each request adds
//! its [`TenantContext`] as request data. Resolvers that touch
//! organization-scoped rows first resolve a [`TenantScope`] via [`scope`].
//!
//! # Modules
//!
//! - `objects`: output view models (`Organization`, `Project`, `Task`, ...)
//! - `inputs`: input objects and their conversion into create/patch types
//! - `query`: read operations
//! - `mutation`: write operations
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskboard_api::graphql::build_schema;
//! use taskboard_shared::store::{MemoryStore, Store};
//! use taskboard_shared::tenant::TenantContext;
//!
//! # async fn example() {
//! let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
//! let schema = build_schema(store);
//!
//! let request = async_graphql::Request::new("{ projects { id name } }")
//!     .data(TenantContext::new("demo-org"));
//! let response = schema.execute(request).await;
//! # }
//! ```

pub mod inputs;
pub mod mutation;
pub mod objects;
pub mod query;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Schema};
use taskboard_shared::store::Store;
use taskboard_shared::tenant::{TenantContext, TenantScope};

use crate::error::GraphqlResultExt;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

/// The tracker schema
pub type TrackerSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema around a store
pub fn build_schema(store: Arc<dyn Store>) -> TrackerSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}

/// The store registered with the schema
pub(crate) fn store<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Arc<dyn Store>> {
    ctx.data::<Arc<dyn Store>>()
}

/// Resolves the request's tenant
///
/// Requests executed without a [`TenantContext`] use the demo tenant.
pub(crate) async fn scope(ctx: &Context<'_>) -> async_graphql::Result<TenantScope> {
    let tenant = ctx
        .data_opt::<TenantContext>()
        .cloned()
        .unwrap_or_default();

    TenantScope::resolve(store(ctx)?.clone(), &tenant)
        .await
        .graphql()
}
