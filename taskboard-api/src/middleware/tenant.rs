/// Tenant extraction
///
/// Reads the `x-organization-slug` header. An absent or blank header selects
/// the configured default tenant; the slug is not resolved here, so unknown
/// tenants surface as `NOT_FOUND` from the resolver that needs them.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::middleware::tenant::Tenant;
///
/// async fn handler(Tenant(tenant): Tenant) -> String {
///     tenant.slug
/// }
/// ```

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use taskboard_shared::tenant::{TenantContext, TENANT_HEADER};

use crate::{app::AppState, error::ApiError};

/// Extractor yielding the request's [`TenantContext`]
#[derive(Debug, Clone)]
pub struct Tenant(pub TenantContext);

#[async_trait]
impl FromRequestParts<AppState> for Tenant {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(TENANT_HEADER)
            .map(|value| {
                value.to_str().map_err(|_| {
                    ApiError::Validation(format!("{TENANT_HEADER} header must be valid UTF-8"))
                })
            })
            .transpose()?;

        let tenant = TenantContext::from_header(header, &state.config.tenant.default_slug);
        tracing::debug!(slug = %tenant.slug, "Tenant selected");

        Ok(Tenant(tenant))
    }
}
