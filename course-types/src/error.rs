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

//! API error body.
//!
//! Every failed request is answered with an [`APIError`] body and a non-2xx
//! status code.

use serde::{Deserialize, Serialize};

/// Structured error returned for every failed request.
///
/// ```json
/// { "message": "Conflict", "error": "course capacity exceeded", "code": "CAPACITY_EXCEEDED" }
/// ```
///
/// Clients should dispatch on `code`. The `error` text is for humans and may
/// change between releases.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct APIError {
    /// Short summary of the failure class (the HTTP reason phrase).
    pub message: String,

    /// Human-readable description of what went wrong.
    pub error: String,

    /// Machine-readable error code (e.g. `"ALREADY_ENROLLED"`).
    pub code: String,
}

impl APIError {
    pub fn new(code: &str, message: &str, error: impl Into<String>) -> Self {
        Self {
            message: message.to_string(),
            error: error.into(),
            code: code.to_string(),
        }
    }
}

impl std::fmt::Display for APIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.error)
    }
}

impl std::error::Error for APIError {}
