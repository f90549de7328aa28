/// GraphQL endpoint
///
/// # Endpoints
///
/// ```text
/// POST /graphql    execute a query or mutation
/// GET  /graphql    GraphiQL explorer
/// ```
///
/// The tenant is taken from the `x-organization-slug` header and attached to
/// the request as `TenantContext` data.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{extract::State, response::Html};

use crate::{app::AppState, middleware::tenant::Tenant};

/// Executes a GraphQL request for the caller's tenant
pub async fn graphql_handler(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let request = request.into_inner().data(tenant);
    state.schema.execute(request).await.into()
}

/// Serves the GraphiQL explorer
pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
