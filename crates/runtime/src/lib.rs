use std::sync::Arc;

use anyhow::{Context, Result};
use circle_config::AppConfig;
use circle_database::initialize_database;
use circle_users::{blob, BlobStore, SessionIssuer, UserServices};
use sqlx::SqlitePool;
use tracing::{info, warn};

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub users: UserServices,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let sessions = SessionIssuer::from_config(&config.auth)
            .context("auth.token_secret must be set (CIRCLE__AUTH__TOKEN_SECRET)")?;

        let blob_store = blob::from_config(&config.blob_store)
            .context("failed to configure blob store")?;
        log_blob_store(config, blob_store.as_ref());

        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;

        let users = UserServices::new(
            db_pool.clone(),
            sessions,
            blob_store,
            config.suggestions.limit,
        );

        info!(
            session_ttl_seconds = config.auth.session_ttl_seconds,
            suggestion_limit = config.suggestions.limit,
            "user services ready"
        );

        Ok(Self { db_pool, users })
    }
}

fn log_blob_store(config: &AppConfig, store: Option<&Arc<dyn BlobStore>>) {
    match store {
        Some(_) => info!(provider = ?config.blob_store.provider, "blob store configured"),
        None => warn!("no blob store configured, profile photo uploads will be rejected"),
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(?error, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                warn!(?error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
