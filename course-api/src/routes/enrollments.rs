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

//! Handlers for taking, leaving and progressing through courses.

use axum::{
    extract::{Path, State},
    Json,
};
use course_types::{
    requests::UpdateProgressRequest,
    responses::{CourseResponse, EnrollmentResponse},
};

use super::{created, ok, ApiResult, Created};
use crate::auth::{CustomerUser, InstructorUser};
use crate::error::AppError;
use crate::services::enrollment;
use crate::state::AppState;

/// POST /customer/courses/{course_id}/enroll
///
/// Takes one seat. Responds 409 `CAPACITY_EXCEEDED` when none are left and
/// 409 `ALREADY_ENROLLED` on a repeat.
pub async fn take_course(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(course_id): Path<String>,
) -> Result<Created<EnrollmentResponse>, AppError> {
    let row = enrollment::take_course(state.store.as_ref(), &principal, &course_id).await?;
    Ok(created("success take course", row.into()))
}

/// DELETE /customer/enrollments/{enrollment_id}
///
/// Returns the course with the seat given back.
pub async fn unenroll(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(enrollment_id): Path<String>,
) -> ApiResult<CourseResponse> {
    let course = enrollment::unenroll(state.store.as_ref(), &principal, &enrollment_id).await?;
    Ok(ok("success delete customer course", course.into()))
}

/// GET /customer/enrollments
pub async fn list_my_enrollments(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
) -> ApiResult<Vec<EnrollmentResponse>> {
    let rows = enrollment::list_my_enrollments(state.store.as_ref(), &principal).await?;
    Ok(ok("enrollments", rows.into_iter().map(Into::into).collect()))
}

/// PUT /customer/enrollments/{enrollment_id}/progress
pub async fn update_progress(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(enrollment_id): Path<String>,
    Json(req): Json<UpdateProgressRequest>,
) -> ApiResult<EnrollmentResponse> {
    let row =
        enrollment::update_progress(state.store.as_ref(), &principal, &enrollment_id, req).await?;
    Ok(ok("progress updated", row.into()))
}

/// GET /instructor/courses/{course_id}/enrollments
pub async fn list_course_enrollments(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(course_id): Path<String>,
) -> ApiResult<Vec<EnrollmentResponse>> {
    let rows =
        enrollment::list_course_enrollments(state.store.as_ref(), &principal, &course_id).await?;
    Ok(ok("enrollments", rows.into_iter().map(Into::into).collect()))
}
