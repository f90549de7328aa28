/// API route handlers
///
/// - `health`: Health check endpoint
/// - `graphql`: GraphQL endpoint and the GraphiQL explorer

pub mod graphql;
pub mod health;
