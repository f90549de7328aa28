/// Request extractors and middleware for the API server
///
/// - `tenant`: reads the tenant slug header into a `TenantContext`

pub mod tenant;
