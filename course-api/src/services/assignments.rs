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

//! Module assignments, customer submissions and grading.

use chrono::Utc;
use course_types::requests::{
    CreateAssignmentRequest, GradeRequest, SubmissionRequest, UpdateAssignmentRequest,
};

use super::{ensure_enrolled, ensure_module_owner, load_module, new_id};
use crate::auth::Principal;
use crate::error::AppError;
use crate::model::{Assignment, Course, Submission};
use crate::store::{AssignmentPatch, CourseStore, StoreError, SubmissionPatch};
use crate::validate;

async fn load_assignment(store: &dyn CourseStore, id: &str) -> Result<Assignment, AppError> {
    store
        .get_assignment(id)
        .await?
        .ok_or(AppError::NotFound("assignment"))
}

async fn owned_assignment(
    store: &dyn CourseStore,
    principal: &Principal,
    assignment_id: &str,
) -> Result<(Assignment, Course), AppError> {
    let assignment = load_assignment(store, assignment_id).await?;
    let (_, course) = ensure_module_owner(store, principal, &assignment.module_id).await?;
    Ok((assignment, course))
}

async fn own_submission(
    store: &dyn CourseStore,
    principal: &Principal,
    submission_id: &str,
) -> Result<Submission, AppError> {
    let submission = store
        .get_submission(submission_id)
        .await?
        .ok_or(AppError::NotFound("submission"))?;
    if submission.customer_id != principal.id {
        return Err(AppError::NotAuthorized);
    }
    Ok(submission)
}

// -- Assignments (instructor) --

/// At most one live assignment per module.
pub async fn create_assignment(
    store: &dyn CourseStore,
    principal: &Principal,
    module_id: &str,
    req: CreateAssignmentRequest,
) -> Result<Assignment, AppError> {
    ensure_module_owner(store, principal, module_id).await?;

    let now = Utc::now();
    let assignment = Assignment {
        id: new_id(),
        title: validate::required_text("title", &req.title)?,
        description: req.description.trim().to_string(),
        module_id: module_id.to_string(),
        created_at: now,
        updated_at: now,
    };
    let assignment = store
        .create_assignment(assignment)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => AppError::AssignmentExists,
            other => other.into(),
        })?;
    tracing::info!(assignment_id = %assignment.id, module_id, "Assignment created");
    Ok(assignment)
}

pub async fn update_assignment(
    store: &dyn CourseStore,
    principal: &Principal,
    assignment_id: &str,
    req: UpdateAssignmentRequest,
) -> Result<Assignment, AppError> {
    owned_assignment(store, principal, assignment_id).await?;
    let patch = AssignmentPatch {
        title: req
            .title
            .map(|t| validate::required_text("title", &t))
            .transpose()?,
        description: req.description.map(|d| d.trim().to_string()),
    };
    Ok(store.update_assignment(assignment_id, patch).await?)
}

pub async fn delete_assignment(
    store: &dyn CourseStore,
    principal: &Principal,
    assignment_id: &str,
) -> Result<(), AppError> {
    owned_assignment(store, principal, assignment_id).await?;
    Ok(store.delete_assignment(assignment_id).await?)
}

pub async fn list_submissions(
    store: &dyn CourseStore,
    principal: &Principal,
    assignment_id: &str,
) -> Result<Vec<Submission>, AppError> {
    owned_assignment(store, principal, assignment_id).await?;
    Ok(store.list_submissions_by_assignment(assignment_id).await?)
}

pub async fn grade_submission(
    store: &dyn CourseStore,
    principal: &Principal,
    submission_id: &str,
    req: GradeRequest,
) -> Result<Submission, AppError> {
    validate::grade(req.grade)?;
    let submission = store
        .get_submission(submission_id)
        .await?
        .ok_or(AppError::NotFound("submission"))?;
    owned_assignment(store, principal, &submission.assignment_id).await?;

    let patch = SubmissionPatch {
        file: None,
        grade: Some(req.grade),
    };
    let graded = store.update_submission(submission_id, patch).await?;
    tracing::info!(submission_id, grade = req.grade, "Submission graded");
    Ok(graded)
}

// -- Submissions (customer) --

/// One submission per customer and assignment; the customer must be enrolled
/// in the assignment's course.
pub async fn submit(
    store: &dyn CourseStore,
    principal: &Principal,
    assignment_id: &str,
    req: SubmissionRequest,
) -> Result<Submission, AppError> {
    let file = validate::required("file", &req.file)?;
    let assignment = load_assignment(store, assignment_id).await?;
    let module = load_module(store, &assignment.module_id).await?;
    ensure_enrolled(store, principal, &module.course_id).await?;

    let now = Utc::now();
    let submission = Submission {
        id: new_id(),
        file,
        grade: None,
        assignment_id: assignment_id.to_string(),
        customer_id: principal.id.clone(),
        created_at: now,
        updated_at: now,
    };
    store
        .create_submission(submission)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => AppError::AlreadySubmitted,
            other => other.into(),
        })
}

/// Submissions to assignments that have since been deleted are left out.
pub async fn list_my_submissions(
    store: &dyn CourseStore,
    principal: &Principal,
) -> Result<Vec<Submission>, AppError> {
    Ok(store.list_submissions_by_customer(&principal.id).await?)
}

/// Replace the file of an ungraded submission to a live assignment.
pub async fn update_submission(
    store: &dyn CourseStore,
    principal: &Principal,
    submission_id: &str,
    req: SubmissionRequest,
) -> Result<Submission, AppError> {
    let submission = own_submission(store, principal, submission_id).await?;
    load_assignment(store, &submission.assignment_id).await?;
    if submission.grade.is_some() {
        return Err(AppError::validation("graded submissions cannot be changed"));
    }
    let patch = SubmissionPatch {
        file: Some(validate::required("file", &req.file)?),
        grade: None,
    };
    Ok(store.update_submission(submission_id, patch).await?)
}

pub async fn delete_submission(
    store: &dyn CourseStore,
    principal: &Principal,
    submission_id: &str,
) -> Result<(), AppError> {
    own_submission(store, principal, submission_id).await?;
    Ok(store.delete_submission(submission_id).await?)
}
