//! Common test utilities for integration tests
//!
//! Every test gets a fresh in-memory store with two tenants:
//! - `demo-org` (the default tenant)
//! - `acme`

#![allow(dead_code)]

use std::sync::Arc;

use async_graphql::{Request, Variables};
use axum::Router;
use serde_json::Value;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_api::graphql::TrackerSchema;
use taskboard_shared::models::organization::CreateOrganization;
use taskboard_shared::seed::bootstrap;
use taskboard_shared::store::{MemoryStore, Store};
use taskboard_shared::tenant::TenantContext;

pub const DEMO: &str = "demo-org";
pub const ACME: &str = "acme";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<dyn Store>,
    pub schema: TrackerSchema,
    pub app: Router,
}

impl TestContext {
    pub async fn new() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        bootstrap(store.as_ref()).await.unwrap();
        store
            .ensure_organization(CreateOrganization {
                id: None,
                name: "Acme Corp".to_string(),
                slug: ACME.to_string(),
                contact_email: "ops@acme.example".to_string(),
            })
            .await
            .unwrap();

        let state = AppState::new(store.clone(), Config::in_memory());
        let schema = state.schema.clone();
        let app = build_router(state);

        Self { store, schema, app }
    }

    /// Executes an operation as `tenant` and returns the JSON response
    pub async fn execute(&self, tenant: &str, query: &str, variables: Value) -> Value {
        let request = Request::new(query)
            .variables(Variables::from_json(variables))
            .data(TenantContext::new(tenant));

        let response = self.schema.execute(request).await;
        serde_json::to_value(&response).unwrap()
    }

    /// Executes an operation that must succeed and returns its `data`
    pub async fn data(&self, tenant: &str, query: &str, variables: Value) -> Value {
        let response = self.execute(tenant, query, variables).await;
        assert!(
            response.get("errors").is_none(),
            "unexpected errors: {response}"
        );
        response["data"].clone()
    }

    /// Executes an operation that must fail and returns the first error code
    pub async fn error_code(&self, tenant: &str, query: &str, variables: Value) -> String {
        let response = self.execute(tenant, query, variables).await;
        response["errors"][0]["extensions"]["code"]
            .as_str()
            .unwrap_or_else(|| panic!("expected an error code: {response}"))
            .to_string()
    }

    /// Creates a project and returns its id
    pub async fn create_project(&self, tenant: &str, name: &str) -> String {
        let data = self
            .data(
                tenant,
                "mutation($input: CreateProjectInput!) { createProject(input: $input) { id } }",
                serde_json::json!({ "input": { "name": name } }),
            )
            .await;
        data["createProject"]["id"].as_str().unwrap().to_string()
    }

    /// Creates a task and returns its id
    pub async fn create_task(&self, tenant: &str, project_id: &str, title: &str, status: &str) -> String {
        let data = self
            .data(
                tenant,
                "mutation($input: CreateTaskInput!) { createTask(input: $input) { id } }",
                serde_json::json!({
                    "input": { "projectId": project_id, "title": title, "status": status }
                }),
            )
            .await;
        data["createTask"]["id"].as_str().unwrap().to_string()
    }
}
