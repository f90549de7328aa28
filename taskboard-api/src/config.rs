/// Configuration management for the API server
///
/// Configuration is read from environment variables (and a `.env` file when
/// present) into a typed [`Config`].
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 4000)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `DEFAULT_TENANT_SLUG`: Tenant used when the request names none (default: demo-org)
/// - `STORE_BACKEND`: `postgres` or `memory` (default: postgres)
/// - `DATABASE_URL`: PostgreSQL connection string (required for postgres)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `SEED_SAMPLE_DATA`: Insert sample projects at startup (default: false)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use taskboard_shared::models::organization::DEMO_ORGANIZATION_SLUG;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Tenant selection
    pub tenant: TenantConfig,

    /// Persistence backend
    pub store: StoreConfig,

    /// Database configuration (postgres backend only)
    pub database: DatabaseConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` allows any)
    pub cors_origins: Vec<String>,
}

/// Tenant selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Slug used when the tenant header is absent or blank
    pub default_slug: String,
}

/// Which [`Store`](taskboard_shared::store::Store) implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Seed the sample organizations, projects and tasks at startup
    pub seed_sample_data: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL (empty for the memory backend)
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a value does not parse or `DATABASE_URL` is
    /// missing while the postgres backend is selected.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("API_HOST", "0.0.0.0");
        let port = var("API_PORT", "4000")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {e}"))?;

        let cors_origins = var("CORS_ORIGINS", "*")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let default_slug = var("DEFAULT_TENANT_SLUG", DEMO_ORGANIZATION_SLUG);
        if default_slug.trim().is_empty() {
            anyhow::bail!("DEFAULT_TENANT_SLUG must not be empty");
        }

        let backend = var("STORE_BACKEND", "postgres").parse::<StoreBackend>()?;
        let seed_sample_data = parse_bool(&var("SEED_SAMPLE_DATA", "false"))
            .ok_or_else(|| anyhow::anyhow!("SEED_SAMPLE_DATA must be true or false"))?;

        let url = lookup("DATABASE_URL").unwrap_or_default();
        if backend == StoreBackend::Postgres && url.is_empty() {
            anyhow::bail!("DATABASE_URL environment variable is required for the postgres backend");
        }

        let max_connections = var("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {e}"))?;

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            tenant: TenantConfig {
                default_slug: default_slug.trim().to_string(),
            },
            store: StoreConfig {
                backend,
                seed_sample_data,
            },
            database: DatabaseConfig {
                url,
                max_connections,
            },
        })
    }

    /// In-memory configuration for tests and local experiments
    pub fn in_memory() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            tenant: TenantConfig {
                default_slug: DEMO_ORGANIZATION_SLUG.to_string(),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                seed_sample_data: false,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
            },
        }
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_lookup(lookup(&[("DATABASE_URL", "postgresql://localhost/test")]))
                .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:4000");
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.tenant.default_slug, "demo-org");
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert!(!config.store.seed_sample_data);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_memory_backend() {
        let config = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("SEED_SAMPLE_DATA", "true"),
            ("DEFAULT_TENANT_SLUG", "tech-startup"),
            ("CORS_ORIGINS", "http://localhost:3000, http://localhost:5173"),
        ]))
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.store.seed_sample_data);
        assert_eq!(config.tenant.default_slug, "tech-startup");
        assert_eq!(config.api.cors_origins.len(), 2);
        assert!(config.database.url.is_empty());
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("API_PORT", "not-a-port"),
        ]))
        .is_err());

        assert!(Config::from_lookup(lookup(&[("STORE_BACKEND", "sqlite")])).is_err());

        assert!(Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("SEED_SAMPLE_DATA", "maybe"),
        ]))
        .is_err());
    }

    #[test]
    fn test_in_memory() {
        let config = Config::in_memory();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.bind_address(), "127.0.0.1:0");
    }
}
