//! HTTP router tests
//!
//! Exercise the axum router end to end with `tower::ServiceExt::oneshot`:
//! - health endpoint
//! - tenant header handling on `POST /graphql`
//! - GraphiQL explorer

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{TestContext, ACME, DEMO};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn graphql_request(tenant: Option<&str>, query: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header("content-type", "application/json");
    if let Some(tenant) = tenant {
        builder = builder.header("x-organization-slug", tenant);
    }
    builder
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await;

    let response = ctx
        .app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
    assert_eq!(body["store"], "connected");
}

#[tokio::test]
async fn test_header_selects_tenant() {
    let ctx = TestContext::new().await;
    ctx.create_project(ACME, "Acme only").await;

    let response = ctx
        .app
        .clone()
        .oneshot(graphql_request(Some(ACME), "{ projects { name organization { slug } } }"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body["data"]["projects"],
        json!([{ "name": "Acme only", "organization": { "slug": ACME } }])
    );
}

#[tokio::test]
async fn test_missing_or_blank_header_uses_default_tenant() {
    let ctx = TestContext::new().await;
    ctx.create_project(DEMO, "Demo project").await;
    ctx.create_project(ACME, "Acme project").await;

    for tenant in [None, Some("")] {
        let response = ctx
            .app
            .clone()
            .oneshot(graphql_request(tenant, "{ projects { name } }"))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["data"]["projects"], json!([{ "name": "Demo project" }]));
    }
}

#[tokio::test]
async fn test_unknown_tenant_header() {
    let ctx = TestContext::new().await;

    let response = ctx
        .app
        .clone()
        .oneshot(graphql_request(Some("ghost-org"), "{ projects { id } }"))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["extensions"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_graphiql_page() {
    let ctx = TestContext::new().await;

    let response = ctx
        .app
        .clone()
        .oneshot(Request::builder().uri("/graphql").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("graphiql"));
}
