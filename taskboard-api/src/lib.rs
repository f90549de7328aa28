//! # Taskboard API Server Library
//!
//! GraphQL front end for the Taskboard project tracker.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error mapping to GraphQL errors and HTTP responses
//! - `graphql`: Schema, view models and resolvers
//! - `middleware`: Tenant header extraction
//! - `routes`: HTTP route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod graphql;
pub mod middleware;
pub mod routes;
