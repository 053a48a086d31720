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

//! Taking and leaving courses, and tracking progress through them.
//!
//! A course's `capacity` is the number of seats still free. Enrolling takes
//! one seat and unenrolling gives it back; both run as a single atomic store
//! operation so the counter and the enrollment rows never disagree.

use chrono::Utc;
use course_types::requests::UpdateProgressRequest;

use super::{ensure_course_owner, new_id};
use crate::auth::Principal;
use crate::error::AppError;
use crate::model::{Course, Enrollment};
use crate::store::{CourseStore, StoreError};

/// Enroll the calling customer in `course_id`.
///
/// Fails with `NotFound("course")`, `CapacityExceeded` or `AlreadyEnrolled`,
/// checked in that order. A failure writes nothing.
pub async fn take_course(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
) -> Result<Enrollment, AppError> {
    let now = Utc::now();
    let enrollment = Enrollment {
        id: new_id(),
        customer_id: principal.id.clone(),
        course_id: course_id.to_string(),
        status: true,
        no_module: 0,
        is_finish: false,
        created_at: now,
        updated_at: now,
    };

    let enrollment = store.enroll(enrollment).await.map_err(|e| match e {
        StoreError::NotFound(_) => AppError::NotFound("course"),
        StoreError::CapacityExceeded => AppError::CapacityExceeded,
        StoreError::Conflict(_) => AppError::AlreadyEnrolled,
        other => other.into(),
    })?;

    tracing::info!(
        enrollment_id = %enrollment.id,
        course_id,
        customer_id = %principal.id,
        "Customer enrolled"
    );
    Ok(enrollment)
}

/// Remove the caller's enrollment and return the seat to the course.
/// Returns the course with its updated capacity.
pub async fn unenroll(
    store: &dyn CourseStore,
    principal: &Principal,
    enrollment_id: &str,
) -> Result<Course, AppError> {
    let enrollment = store
        .get_enrollment(enrollment_id)
        .await?
        .ok_or(AppError::NotEnrolled)?;
    if enrollment.customer_id != principal.id {
        return Err(AppError::NotAuthorized);
    }

    let course = store
        .unenroll(enrollment_id, &principal.id)
        .await
        .map_err(|e| match e {
            // Raced with another unenroll of the same row.
            StoreError::NotFound("enrollment") => AppError::NotEnrolled,
            other => other.into(),
        })?;

    tracing::info!(
        enrollment_id,
        course_id = %course.id,
        customer_id = %principal.id,
        "Customer unenrolled"
    );
    Ok(course)
}

pub async fn list_my_enrollments(
    store: &dyn CourseStore,
    principal: &Principal,
) -> Result<Vec<Enrollment>, AppError> {
    Ok(store.list_enrollments_by_customer(&principal.id).await?)
}

/// Record how many modules the caller has completed. The course counts as
/// finished once every module is done.
pub async fn update_progress(
    store: &dyn CourseStore,
    principal: &Principal,
    enrollment_id: &str,
    req: UpdateProgressRequest,
) -> Result<Enrollment, AppError> {
    let enrollment = store
        .get_enrollment(enrollment_id)
        .await?
        .ok_or(AppError::NotEnrolled)?;
    if enrollment.customer_id != principal.id {
        return Err(AppError::NotAuthorized);
    }

    let module_count = store.count_modules(&enrollment.course_id).await?;
    let no_module = i64::from(req.no_module);
    if no_module < 0 || no_module > module_count {
        return Err(AppError::validation(format!(
            "no_module must be between 0 and {module_count}"
        )));
    }
    let is_finish = module_count > 0 && no_module == module_count;

    Ok(store
        .update_progress(enrollment_id, req.no_module, is_finish)
        .await?)
}

pub async fn list_course_enrollments(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
) -> Result<Vec<Enrollment>, AppError> {
    ensure_course_owner(store, principal, course_id).await?;
    Ok(store.list_enrollments_by_course(course_id).await?)
}
