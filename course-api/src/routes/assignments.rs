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

//! Handlers for assignments, submissions and grading.

use axum::{
    extract::{Path, State},
    Json,
};
use course_types::{
    requests::{
        CreateAssignmentRequest, GradeRequest, SubmissionRequest, UpdateAssignmentRequest,
    },
    responses::{AssignmentResponse, DeletedResponse, SubmissionResponse},
};

use super::{created, ok, ApiResult, Created};
use crate::auth::{CustomerUser, InstructorUser};
use crate::error::AppError;
use crate::services::assignments;
use crate::state::AppState;

// -- Instructor --

/// POST /instructor/modules/{module_id}/assignment
pub async fn create_assignment(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(module_id): Path<String>,
    Json(req): Json<CreateAssignmentRequest>,
) -> Result<Created<AssignmentResponse>, AppError> {
    let assignment =
        assignments::create_assignment(state.store.as_ref(), &principal, &module_id, req).await?;
    Ok(created("assignment created", assignment.into()))
}

/// PUT /instructor/assignments/{assignment_id}
pub async fn update_assignment(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(assignment_id): Path<String>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> ApiResult<AssignmentResponse> {
    let assignment =
        assignments::update_assignment(state.store.as_ref(), &principal, &assignment_id, req)
            .await?;
    Ok(ok("assignment updated", assignment.into()))
}

/// DELETE /instructor/assignments/{assignment_id}
pub async fn delete_assignment(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(assignment_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    assignments::delete_assignment(state.store.as_ref(), &principal, &assignment_id).await?;
    Ok(ok("assignment deleted", DeletedResponse { id: assignment_id }))
}

/// GET /instructor/assignments/{assignment_id}/submissions
pub async fn list_submissions(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(assignment_id): Path<String>,
) -> ApiResult<Vec<SubmissionResponse>> {
    let rows =
        assignments::list_submissions(state.store.as_ref(), &principal, &assignment_id).await?;
    Ok(ok("submissions", rows.into_iter().map(Into::into).collect()))
}

/// PUT /instructor/submissions/{submission_id}/grade
pub async fn grade_submission(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(submission_id): Path<String>,
    Json(req): Json<GradeRequest>,
) -> ApiResult<SubmissionResponse> {
    let row =
        assignments::grade_submission(state.store.as_ref(), &principal, &submission_id, req)
            .await?;
    Ok(ok("submission graded", row.into()))
}

// -- Customer --

/// POST /customer/assignments/{assignment_id}/submissions
pub async fn submit(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(assignment_id): Path<String>,
    Json(req): Json<SubmissionRequest>,
) -> Result<Created<SubmissionResponse>, AppError> {
    let row = assignments::submit(state.store.as_ref(), &principal, &assignment_id, req).await?;
    Ok(created("assignment submitted", row.into()))
}

/// GET /customer/submissions
pub async fn list_my_submissions(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
) -> ApiResult<Vec<SubmissionResponse>> {
    let rows = assignments::list_my_submissions(state.store.as_ref(), &principal).await?;
    Ok(ok("submissions", rows.into_iter().map(Into::into).collect()))
}

/// PUT /customer/submissions/{submission_id}
pub async fn update_submission(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(submission_id): Path<String>,
    Json(req): Json<SubmissionRequest>,
) -> ApiResult<SubmissionResponse> {
    let row =
        assignments::update_submission(state.store.as_ref(), &principal, &submission_id, req)
            .await?;
    Ok(ok("submission updated", row.into()))
}

/// DELETE /customer/submissions/{submission_id}
pub async fn delete_submission(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(submission_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    assignments::delete_submission(state.store.as_ref(), &principal, &submission_id).await?;
    Ok(ok("submission deleted", DeletedResponse { id: submission_id }))
}
