//! Tracker error taxonomy
//!
//! Every scoped operation fails with a [`TrackerError`]. The variants map
//! one-to-one onto the error kinds clients can branch on (see
//! [`TrackerError::kind`]); the message is for humans only.

use validator::{ValidationError, ValidationErrors};

use crate::store::StoreError;

/// Result type for tenant-scoped operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Error raised by a tenant-scoped operation
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// No organization has the requested slug
    #[error("Organization not found: {0}")]
    TenantNotFound(String),

    /// The requested row does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The row exists but belongs to another organization
    #[error("Access denied to {entity} {id}")]
    AccessDenied { entity: &'static str, id: String },

    /// Input failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Input collides with an existing row
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store failed
    #[error(transparent)]
    Store(StoreError),
}

/// Machine-readable error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    ValidationFailed,
    Conflict,
    StoreFailure,
}

impl ErrorKind {
    /// Stable code exposed to clients
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::AccessDenied => "ACCESS_DENIED",
            ErrorKind::ValidationFailed => "VALIDATION_FAILED",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::StoreFailure => "STORE_FAILURE",
        }
    }
}

impl TrackerError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        TrackerError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn access_denied(entity: &'static str, id: impl Into<String>) -> Self {
        TrackerError::AccessDenied {
            entity,
            id: id.into(),
        }
    }

    /// Classifies the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrackerError::TenantNotFound(_) | TrackerError::NotFound { .. } => ErrorKind::NotFound,
            TrackerError::AccessDenied { .. } => ErrorKind::AccessDenied,
            TrackerError::Validation(_) => ErrorKind::ValidationFailed,
            TrackerError::Conflict(_) => ErrorKind::Conflict,
            TrackerError::Store(_) => ErrorKind::StoreFailure,
        }
    }
}

impl From<StoreError> for TrackerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(what) => TrackerError::Conflict(what),
            StoreError::MissingParent { entity, id } => TrackerError::not_found(entity, id),
            other => TrackerError::Store(other),
        }
    }
}

impl From<ValidationErrors> for TrackerError {
    fn from(errors: ValidationErrors) -> Self {
        TrackerError::Validation(errors.to_string())
    }
}

impl From<ValidationError> for TrackerError {
    fn from(error: ValidationError) -> Self {
        TrackerError::Validation(error.to_string())
    }
}
