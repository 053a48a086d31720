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

//! Handlers for categories and courses: public browsing plus instructor CRUD.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use course_types::{
    requests::{
        CreateCategoryRequest, CreateCourseRequest, ListCoursesQuery, UpdateCategoryRequest,
        UpdateCourseRequest,
    },
    responses::{CategoryResponse, CourseDetailResponse, CourseResponse, DeletedResponse},
};

use super::{created, ok, ApiResult, Created};
use crate::auth::InstructorUser;
use crate::error::AppError;
use crate::services::catalog;
use crate::state::AppState;

// -- Categories --

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryResponse>> {
    let categories = catalog::list_categories(state.store.as_ref()).await?;
    Ok(ok(
        "categories",
        categories.into_iter().map(Into::into).collect(),
    ))
}

/// GET /categories/{category_id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> ApiResult<CategoryResponse> {
    let category = catalog::get_category(state.store.as_ref(), &category_id).await?;
    Ok(ok("category", category.into()))
}

/// POST /instructor/categories
pub async fn create_category(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<Created<CategoryResponse>, AppError> {
    let category = catalog::create_category(state.store.as_ref(), &principal, req).await?;
    Ok(created("category created", category.into()))
}

/// PUT /instructor/categories/{category_id}
pub async fn update_category(
    State(state): State<AppState>,
    InstructorUser(_): InstructorUser,
    Path(category_id): Path<String>,
    Json(req): Json<UpdateCategoryRequest>,
) -> ApiResult<CategoryResponse> {
    let category = catalog::update_category(state.store.as_ref(), &category_id, req).await?;
    Ok(ok("category updated", category.into()))
}

/// DELETE /instructor/categories/{category_id}
pub async fn delete_category(
    State(state): State<AppState>,
    InstructorUser(_): InstructorUser,
    Path(category_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    catalog::delete_category(state.store.as_ref(), &category_id).await?;
    Ok(ok("category deleted", DeletedResponse { id: category_id }))
}

// -- Courses (public) --

/// GET /courses?name=&category_id=
pub async fn browse_courses(
    State(state): State<AppState>,
    Query(query): Query<ListCoursesQuery>,
) -> ApiResult<Vec<CourseResponse>> {
    let courses = catalog::browse_courses(state.store.as_ref(), query).await?;
    Ok(ok("courses", courses.into_iter().map(Into::into).collect()))
}

/// GET /courses/{course_id}
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> ApiResult<CourseDetailResponse> {
    let detail = catalog::course_detail(state.store.as_ref(), &course_id).await?;
    Ok(ok("course", detail))
}

// -- Courses (instructor) --

/// GET /instructor/courses
pub async fn list_my_courses(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
) -> ApiResult<Vec<CourseResponse>> {
    let courses = catalog::list_instructor_courses(state.store.as_ref(), &principal).await?;
    Ok(ok("courses", courses.into_iter().map(Into::into).collect()))
}

/// POST /instructor/courses
pub async fn create_course(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Json(req): Json<CreateCourseRequest>,
) -> Result<Created<CourseResponse>, AppError> {
    let course = catalog::create_course(state.store.as_ref(), &principal, req).await?;
    Ok(created("course created", course.into()))
}

/// PUT /instructor/courses/{course_id}
pub async fn update_course(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(course_id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> ApiResult<CourseResponse> {
    let course = catalog::update_course(state.store.as_ref(), &principal, &course_id, req).await?;
    Ok(ok("course updated", course.into()))
}

/// DELETE /instructor/courses/{course_id}
///
/// Also removes the course's modules, media, assignments, quizzes,
/// enrollments, favorites and ratings.
pub async fn delete_course(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(course_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    catalog::delete_course(state.store.as_ref(), &principal, &course_id).await?;
    Ok(ok("course deleted", DeletedResponse { id: course_id }))
}
