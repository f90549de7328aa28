//! # Taskboard Shared Library
//!
//! This crate contains the domain types, persistence layer, and tenant-scoping
//! rules used by the Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Organizations, projects, tasks, comments and their patch types
//! - `stats`: Per-project task aggregation (completion rate)
//! - `store`: The `Store` trait with PostgreSQL and in-memory implementations
//! - `tenant`: Tenant resolution and ownership checks
//! - `db`: PostgreSQL pool and migrations
//! - `seed`: Demo tenant bootstrap and sample data
//! - `error`: The tracker error taxonomy

pub mod db;
pub mod error;
pub mod models;
pub mod seed;
pub mod stats;
pub mod store;
pub mod tenant;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
