//! HTTP server initialization and runtime setup.
//!
//! Picks the storage backend, applies migrations, seeds demo data and runs
//! the Axum server until Ctrl-C.

use crate::application::clock::Clock;
use crate::application::services::AuthService;
use crate::config::Config;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::seed::seed_demo_data;
use crate::infrastructure::storage::Storage;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails after all retries
/// - Migrations or seeding fail
/// - Server bind fails
pub async fn run(config: Config) -> Result<()> {
    let storage = match config.database_url {
        Some(ref url) => {
            let pool = connect_pool(&config, url).await?;
            tracing::info!("Connected to database");

            if config.run_migrations {
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to apply migrations")?;
                tracing::info!("Migrations applied");
            }

            Storage::postgres(Arc::new(pool))
        }
        None => {
            tracing::warn!("No database configured, data will be lost on restart");
            Storage::memory()
        }
    };

    let auth = match config.token_signing_secret {
        Some(ref secret) if config.is_auth_enabled() => {
            AuthService::new(secret.clone(), config.api_token_hashes.iter().cloned())
        }
        _ => {
            tracing::warn!("API authentication disabled");
            AuthService::disabled()
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = AppState::new(storage, clock.clone(), auth);

    if config.seed_data {
        let outcome = seed_demo_data(&state, clock.as_ref())
            .await
            .context("Failed to seed demo data")?;
        tracing::info!(?outcome, "Seed step finished");
    }

    let app = app_router(state, config.rate_limit);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Builds the pool, retrying with jittered exponential backoff.
async fn connect_pool(config: &Config, url: &str) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(config.db_connect_retries.saturating_sub(1));

    Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options.connect(url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Database connection attempt failed");
            })
        }
    })
    .await
    .context("Failed to connect to database")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
