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

//! Response types for the course platform REST API.
//!
//! Every successful request returns an [`APIResponse<T>`] envelope:
//! `{ "message": "...", "data": <T> }`. Failures return
//! [`crate::APIError`] instead.

use serde::{Deserialize, Serialize};

use crate::token::Role;

// ---------------------------------------------------------------------------
// Generic envelope
// ---------------------------------------------------------------------------

/// Top-level success envelope.
///
/// ```json
/// { "message": "course created", "data": { "id": "…", "name": "Rust 101", … } }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct APIResponse<A: Serialize> {
    pub message: String,
    pub data: A,
}

impl<A: Serialize> APIResponse<A> {
    /// Wrap a successful result.
    pub fn ok(message: impl Into<String>, data: A) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Public view of a customer or instructor account.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccountResponse {
    pub id: String,
    pub role: Role,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub is_active: bool,
    /// Unix timestamp in seconds.
    pub created_at: i64,
}

/// Response payload for the login endpoints.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginResponse {
    /// Signed JWT to send as `Authorization: Bearer <token>`.
    pub token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// Unix timestamp in seconds after which the token is rejected.
    pub expires_at: i64,
    pub account: AccountResponse,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CourseResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub objective: String,
    pub price: i64,
    pub discount: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Remaining open seats.
    pub capacity: i32,
    pub instructor_id: String,
    pub category_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Response payload for `GET /courses/{course_id}`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CourseDetailResponse {
    pub course: CourseResponse,
    /// Modules ordered by `no_module`.
    pub modules: Vec<ModuleResponse>,
    /// Mean of the published ratings, or `null` when there are none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    pub rating_count: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModuleResponse {
    pub id: String,
    pub name: String,
    pub content: String,
    pub course_id: String,
    pub no_module: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Response payload for the module detail endpoints.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModuleDetailResponse {
    pub module: ModuleResponse,
    pub media: Vec<MediaResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<AssignmentResponse>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MediaResponse {
    pub id: String,
    pub url: String,
    pub module_id: String,
    pub created_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuizResponse {
    pub id: String,
    pub course_id: String,
    pub link: String,
    pub created_at: i64,
    pub updated_at: i64,
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AssignmentResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub module_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A customer's submission for an assignment.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubmissionResponse {
    pub id: String,
    pub file: String,
    /// Grade (0-100), or `null` until the instructor grades it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<i32>,
    pub assignment_id: String,
    pub customer_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

// ---------------------------------------------------------------------------
// Enrollment & feedback
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnrollmentResponse {
    pub id: String,
    pub customer_id: String,
    pub course_id: String,
    /// `true` while the customer is enrolled.
    pub status: bool,
    /// Progress cursor: number of modules completed.
    pub no_module: i32,
    pub is_finish: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FavoriteResponse {
    pub id: String,
    pub customer_id: String,
    pub course_id: String,
    pub created_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RatingResponse {
    pub id: String,
    pub rating: i32,
    pub testimonial: String,
    pub is_publish: bool,
    pub customer_id: String,
    pub course_id: String,
    pub created_at: i64,
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

/// Response payload for delete endpoints.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeletedResponse {
    pub id: String,
}

/// Response payload for `GET /health`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HealthResponse {
    pub status: String,
    /// Storage backend in use (`"memory"` or `"postgres"`).
    pub backend: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_has_message_and_data() {
        let resp = APIResponse::ok("ok", DeletedResponse { id: "x".into() });
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["message"], "ok");
        assert_eq!(value["data"]["id"], "x");
    }

    #[test]
    fn ungraded_submission_omits_grade() {
        let resp = SubmissionResponse {
            id: "s".into(),
            file: "f".into(),
            grade: None,
            assignment_id: "a".into(),
            customer_id: "c".into(),
            created_at: 0,
            updated_at: 0,
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value.get("grade").is_none());
    }
}
