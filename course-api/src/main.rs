/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Course platform API server entry point.
//!
//! A standalone Axum service for customers and instructors of an online
//! course platform. Runs on PostgreSQL when a database is configured and on
//! the in-memory store otherwise.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use course_api::config::Config;
use course_api::routes;
use course_api::state::AppState;
use course_api::store::memory::InMemoryStore;
use course_api::store::postgres::PgStore;
use course_api::store::CourseStore;
use tracing_subscriber::EnvFilter;

/// How often expired token revocations are forgotten.
const PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let store: Arc<dyn CourseStore> = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.db_max_connections)
                .await
                .context("failed to connect to PostgreSQL")?;
            store
                .migrate()
                .await
                .context("failed to run database migrations")?;
            tracing::info!("Connected to PostgreSQL");
            Arc::new(store)
        }
        None => {
            tracing::warn!("No database configured; using the in-memory store (data is lost on exit)");
            Arc::new(InMemoryStore::new())
        }
    };

    spawn_revocation_purge(store.clone());

    let state = AppState::new(store, &config);
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!("Course API listening on {}", config.listen_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn spawn_revocation_purge(store: Arc<dyn CourseStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match store.purge_expired_tokens().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Purged expired token revocations"),
                Err(e) => tracing::warn!("Failed to purge token revocations: {e}"),
            }
        }
    });
}
