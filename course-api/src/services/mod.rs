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

//! Business rules. Handlers authenticate and parse; services validate, check
//! ownership and talk to the [`CourseStore`].

pub mod accounts;
pub mod assignments;
pub mod catalog;
pub mod enrollment;
pub mod feedback;
pub mod modules;

use uuid::Uuid;

use crate::auth::Principal;
use crate::error::AppError;
use crate::model::{Course, Enrollment, Module};
use crate::store::CourseStore;

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) async fn load_course(store: &dyn CourseStore, id: &str) -> Result<Course, AppError> {
    store
        .get_course(id)
        .await?
        .ok_or(AppError::NotFound("course"))
}

pub(crate) async fn load_module(store: &dyn CourseStore, id: &str) -> Result<Module, AppError> {
    store
        .get_module(id)
        .await?
        .ok_or(AppError::NotFound("module"))
}

/// The course, if `principal` is the instructor who owns it.
pub(crate) async fn ensure_course_owner(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
) -> Result<Course, AppError> {
    let course = load_course(store, course_id).await?;
    if course.instructor_id != principal.id {
        return Err(AppError::NotAuthorized);
    }
    Ok(course)
}

/// A module and its course, if `principal` owns the course.
pub(crate) async fn ensure_module_owner(
    store: &dyn CourseStore,
    principal: &Principal,
    module_id: &str,
) -> Result<(Module, Course), AppError> {
    let module = load_module(store, module_id).await?;
    let course = ensure_course_owner(store, principal, &module.course_id).await?;
    Ok((module, course))
}

/// The caller's live enrollment in `course_id`.
pub(crate) async fn ensure_enrolled(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
) -> Result<Enrollment, AppError> {
    store
        .find_enrollment(course_id, &principal.id)
        .await?
        .ok_or(AppError::NotEnrolled)
}

/// `Some(trimmed)` for a non-blank value, `None` otherwise.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
