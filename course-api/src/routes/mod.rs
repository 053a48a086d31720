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

//! Axum router configuration for the course platform API.

pub mod accounts;
pub mod assignments;
pub mod courses;
pub mod enrollments;
pub mod feedback;
pub mod modules;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use course_types::responses::{APIResponse, HealthResponse};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<APIResponse<T>>, AppError>;
pub type Created<T> = (StatusCode, Json<APIResponse<T>>);

pub(crate) fn ok<T: Serialize>(message: &str, data: T) -> Json<APIResponse<T>> {
    Json(APIResponse::ok(message, data))
}

pub(crate) fn created<T: Serialize>(message: &str, data: T) -> Created<T> {
    (StatusCode::CREATED, ok(message, data))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> ApiResult<HealthResponse> {
    state.store.health_check().await?;
    Ok(ok(
        "healthy",
        HealthResponse {
            status: "ok".to_string(),
            backend: state.store.backend_name().to_string(),
        },
    ))
}

/// Router with state, CORS and per-request tracing spans applied.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
            )
        });

    router().layer(cors).layer(trace_layer).with_state(state)
}

/// Build the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Accounts
        .route("/customer/register", post(accounts::customer_register))
        .route("/customer/login", post(accounts::customer_login))
        .route("/customer/logout", post(accounts::customer_logout))
        .route(
            "/customer/profile",
            get(accounts::customer_profile).put(accounts::update_customer_profile),
        )
        .route("/instructor/register", post(accounts::instructor_register))
        .route("/instructor/login", post(accounts::instructor_login))
        .route("/instructor/logout", post(accounts::instructor_logout))
        .route(
            "/instructor/profile",
            get(accounts::instructor_profile).put(accounts::update_instructor_profile),
        )
        // Public catalog
        .route("/categories", get(courses::list_categories))
        .route("/categories/{category_id}", get(courses::get_category))
        .route("/courses", get(courses::browse_courses))
        .route("/courses/{course_id}", get(courses::get_course))
        .route(
            "/courses/{course_id}/ratings",
            get(feedback::list_public_ratings),
        )
        // Customer
        .route(
            "/customer/courses/{course_id}/enroll",
            post(enrollments::take_course),
        )
        .route("/customer/enrollments", get(enrollments::list_my_enrollments))
        .route(
            "/customer/enrollments/{enrollment_id}",
            delete(enrollments::unenroll),
        )
        .route(
            "/customer/enrollments/{enrollment_id}/progress",
            put(enrollments::update_progress),
        )
        .route(
            "/customer/courses/{course_id}/modules",
            get(modules::list_enrolled_modules),
        )
        .route(
            "/customer/modules/{module_id}",
            get(modules::get_enrolled_module),
        )
        .route(
            "/customer/courses/{course_id}/quizzes",
            get(modules::list_enrolled_quizzes),
        )
        .route(
            "/customer/assignments/{assignment_id}/submissions",
            post(assignments::submit),
        )
        .route("/customer/submissions", get(assignments::list_my_submissions))
        .route(
            "/customer/submissions/{submission_id}",
            put(assignments::update_submission).delete(assignments::delete_submission),
        )
        .route(
            "/customer/courses/{course_id}/favorite",
            post(feedback::add_favorite),
        )
        .route("/customer/favorites", get(feedback::list_favorites))
        .route(
            "/customer/favorites/{favorite_id}",
            delete(feedback::delete_favorite),
        )
        .route(
            "/customer/courses/{course_id}/ratings",
            post(feedback::add_rating),
        )
        .route(
            "/customer/ratings/{rating_id}",
            delete(feedback::delete_rating),
        )
        // Instructor: catalog
        .route("/instructor/categories", post(courses::create_category))
        .route(
            "/instructor/categories/{category_id}",
            put(courses::update_category).delete(courses::delete_category),
        )
        .route(
            "/instructor/courses",
            get(courses::list_my_courses).post(courses::create_course),
        )
        .route(
            "/instructor/courses/{course_id}",
            put(courses::update_course).delete(courses::delete_course),
        )
        .route(
            "/instructor/courses/{course_id}/enrollments",
            get(enrollments::list_course_enrollments),
        )
        // Instructor: content
        .route(
            "/instructor/courses/{course_id}/modules",
            get(modules::list_course_modules).post(modules::create_module),
        )
        .route(
            "/instructor/modules/{module_id}",
            get(modules::get_module)
                .put(modules::update_module)
                .delete(modules::delete_module),
        )
        .route(
            "/instructor/modules/{module_id}/media",
            post(modules::add_media),
        )
        .route(
            "/instructor/media/{media_id}",
            put(modules::update_media).delete(modules::delete_media),
        )
        .route(
            "/instructor/courses/{course_id}/quizzes",
            post(modules::create_quiz),
        )
        .route(
            "/instructor/quizzes/{quiz_id}",
            put(modules::update_quiz).delete(modules::delete_quiz),
        )
        // Instructor: assignments
        .route(
            "/instructor/modules/{module_id}/assignment",
            post(assignments::create_assignment),
        )
        .route(
            "/instructor/assignments/{assignment_id}",
            put(assignments::update_assignment).delete(assignments::delete_assignment),
        )
        .route(
            "/instructor/assignments/{assignment_id}/submissions",
            get(assignments::list_submissions),
        )
        .route(
            "/instructor/submissions/{submission_id}/grade",
            put(assignments::grade_submission),
        )
        // Instructor: feedback
        .route(
            "/instructor/courses/{course_id}/ratings",
            get(feedback::list_course_ratings),
        )
        .route(
            "/instructor/ratings/{rating_id}/publish",
            put(feedback::publish_rating),
        )
}
