//! Domain models for Taskboard
//!
//! One module per table, plus the patch types used for partial updates.
//!
//! # Models
//!
//! - `organization`: Tenants, looked up by slug
//! - `project`: Projects owned by an organization
//! - `task`: Tasks owned by a project
//! - `comment`: Comments owned by a task
//! - `patch`: `Patch<T>` field wrapper for partial updates
//!
//! Rows are identified by opaque text ids generated with [`new_id`], never by
//! storage order.

pub mod comment;
pub mod organization;
pub mod patch;
pub mod project;
pub mod task;

use uuid::Uuid;

/// Generates a new globally unique row id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A status column held a value outside its enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} status: {value}")]
pub struct UnknownStatus {
    /// Which status enum was being parsed
    pub kind: &'static str,

    /// The rejected value
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
