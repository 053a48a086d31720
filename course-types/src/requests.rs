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

//! Request types for the course platform REST API.
//!
//! These types define the shape of request bodies and query parameters.
//! They are used by both the server (for deserialization) and clients
//! (for serialization). Every `Update*` body is a partial update: fields left
//! out are not touched.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Request body for `POST /customer/register` and `POST /instructor/register`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    /// Plain-text password (hashed with Argon2 before storage, min 8 chars).
    pub password: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Request body for `POST /customer/login` and `POST /instructor/login`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `PUT /customer/profile` and `PUT /instructor/profile`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Request body for `POST /instructor/categories`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request body for `PUT /instructor/categories/{category_id}`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for `POST /instructor/courses`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateCourseRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub objective: String,
    /// Price in the smallest currency unit.
    pub price: i64,
    /// Discount percentage (0-100).
    #[serde(default)]
    pub discount: i32,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Number of open seats.
    pub capacity: i32,
    pub category_id: String,
}

/// Request body for `PUT /instructor/courses/{course_id}`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdateCourseRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub discount: Option<i32>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub category_id: Option<String>,
}

/// Query parameters for `GET /courses`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ListCoursesQuery {
    /// Case-insensitive substring match on the course name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

/// Request body for `POST /instructor/courses/{course_id}/modules`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateModuleRequest {
    pub name: String,
    #[serde(default)]
    pub content: String,
    /// Position of the module inside the course (0-based).
    pub no_module: i32,
}

/// Request body for `PUT /instructor/modules/{module_id}`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdateModuleRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub no_module: Option<i32>,
}

/// Request body for `POST /instructor/modules/{module_id}/media`
/// and `PUT /instructor/media/{media_id}`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MediaRequest {
    pub url: String,
}

/// Request body for `POST /instructor/courses/{course_id}/quizzes`
/// and `PUT /instructor/quizzes/{quiz_id}`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuizRequest {
    pub link: String,
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

/// Request body for `POST /instructor/modules/{module_id}/assignment`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateAssignmentRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Request body for `PUT /instructor/assignments/{assignment_id}`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdateAssignmentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for `POST /customer/assignments/{assignment_id}/submissions`
/// and `PUT /customer/submissions/{submission_id}`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubmissionRequest {
    /// Location of the uploaded work (URL or storage key).
    pub file: String,
}

/// Request body for `PUT /instructor/submissions/{submission_id}/grade`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GradeRequest {
    /// Grade in the range 0-100.
    pub grade: i32,
}

// ---------------------------------------------------------------------------
// Enrollment & feedback
// ---------------------------------------------------------------------------

/// Request body for `PUT /customer/enrollments/{enrollment_id}/progress`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateProgressRequest {
    /// Number of modules completed so far.
    pub no_module: i32,
}

/// Request body for `POST /customer/courses/{course_id}/ratings`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateRatingRequest {
    /// Score in the range 1-5.
    pub rating: i32,
    pub testimonial: String,
}

/// Request body for `PUT /instructor/ratings/{rating_id}/publish`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PublishRatingRequest {
    pub is_publish: bool,
}
