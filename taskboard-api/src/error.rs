/// Error handling for the API server
///
/// [`ApiError`] is the single error type leaving the service. It renders two
/// ways:
///
/// - as a GraphQL error whose `extensions.code` carries the error kind
///   (`NOT_FOUND`, `ACCESS_DENIED`, `VALIDATION_FAILED`, `CONFLICT`,
///   `STORE_FAILURE`), via [`GraphqlResultExt::graphql`]
/// - as a JSON HTTP response for plain axum handlers and extractors
///
/// # Example
///
/// ```no_run
/// use taskboard_api::error::GraphqlResultExt;
/// use taskboard_shared::tenant::{TenantContext, TenantScope};
/// # use std::sync::Arc;
/// # use taskboard_shared::store::Store;
///
/// # async fn example(store: Arc<dyn Store>) -> async_graphql::Result<()> {
/// let scope = TenantScope::resolve(store, &TenantContext::default())
///     .await
///     .graphql()?;
/// # Ok(())
/// # }
/// ```

use std::fmt;

use async_graphql::ErrorExtensions;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::error::{ErrorKind, TrackerError};
use taskboard_shared::store::StoreError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Organization, project, task or comment does not exist (404)
    NotFound(String),

    /// Row belongs to another organization (403)
    AccessDenied(String),

    /// Invalid input (422)
    Validation(String),

    /// Duplicate project name (409)
    Conflict(String),

    /// Store failure (500); the detail is logged, never returned
    Internal(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error kind (e.g. "NOT_FOUND")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::AccessDenied(_) => ErrorKind::AccessDenied,
            ApiError::Validation(_) => ErrorKind::ValidationFailed,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::Internal(_) => ErrorKind::StoreFailure,
        }
    }

    /// Stable code clients branch on
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AccessDenied(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg)
            | ApiError::AccessDenied(msg)
            | ApiError::Validation(msg)
            | ApiError::Conflict(msg) => f.write_str(msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.code().to_string(),
            message: self.public_message(),
        });

        (self.status(), body).into_response()
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.public_message()).extend_with(|_, ext| ext.set("code", code))
    }
}

/// Convert tracker errors to API errors
impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => ApiError::NotFound(message),
            ErrorKind::AccessDenied => ApiError::AccessDenied(message),
            ErrorKind::ValidationFailed => ApiError::Validation(message),
            ErrorKind::Conflict => ApiError::Conflict(message),
            ErrorKind::StoreFailure => {
                // Log store failures but don't expose details to clients
                tracing::error!(error = %message, "Store operation failed");
                ApiError::Internal(message)
            }
        }
    }
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        TrackerError::from(err).into()
    }
}

/// Converts a fallible result into a GraphQL result with an error code
pub trait GraphqlResultExt<T> {
    fn graphql(self) -> async_graphql::Result<T>;
}

impl<T, E> GraphqlResultExt<T> for Result<T, E>
where
    E: Into<ApiError>,
{
    fn graphql(self) -> async_graphql::Result<T> {
        self.map_err(|err| {
            let err: ApiError = err.into();
            err.extend()
        })
    }
}
