//! # Taskboard API Server
//!
//! Serves the GraphQL API for organizations, projects, tasks and comments.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/taskboard cargo run -p taskboard-api
//! STORE_BACKEND=memory SEED_SAMPLE_DATA=true cargo run -p taskboard-api
//! ```

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use taskboard_api::{
    app::{build_router, AppState},
    config::{Config, StoreBackend},
};
use taskboard_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
};
use taskboard_shared::seed::{bootstrap, seed_sample_data};
use taskboard_shared::store::{MemoryStore, PgStore, Store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "taskboard_api=debug,taskboard_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let (store, pool) = open_store(&config).await?;

    bootstrap(store.as_ref())
        .await
        .context("failed to create the demo organization")?;
    if config.store.seed_sample_data {
        seed_sample_data(store.as_ref())
            .await
            .context("failed to seed sample data")?;
    }

    let address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!("Server listening on http://{}", address);
    tracing::info!("GraphiQL available at http://{}/graphql", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Opens the configured store, migrating the database for postgres
async fn open_store(config: &Config) -> anyhow::Result<(Arc<dyn Store>, Option<PgPool>)> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
            Ok((store, None))
        }
        StoreBackend::Postgres => {
            let pool = create_pool(DatabaseConfig {
                url: config.database.url.clone(),
                max_connections: config.database.max_connections,
                ..Default::default()
            })
            .await
            .context("failed to connect to the database")?;

            run_migrations(&pool).await?;

            let store: Arc<dyn Store> = Arc::new(PgStore::new(pool.clone()));
            Ok((store, Some(pool)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server runs until killed
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
