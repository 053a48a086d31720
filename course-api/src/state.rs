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

//! Shared application state passed to every Axum handler via `State`.

use std::sync::Arc;

use crate::config::Config;
use crate::store::CourseStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend (PostgreSQL or in-memory).
    pub store: Arc<dyn CourseStore>,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Token time-to-live in seconds.
    pub token_ttl_secs: i64,
}

impl AppState {
    pub fn new(store: Arc<dyn CourseStore>, config: &Config) -> Self {
        Self {
            store,
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_secs: config.token_ttl_secs,
        }
    }
}
