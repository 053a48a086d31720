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

//! Handlers for course content: modules, media and quizzes.

use axum::{
    extract::{Path, State},
    Json,
};
use course_types::{
    requests::{CreateModuleRequest, MediaRequest, QuizRequest, UpdateModuleRequest},
    responses::{DeletedResponse, MediaResponse, ModuleDetailResponse, ModuleResponse, QuizResponse},
};

use super::{created, ok, ApiResult, Created};
use crate::auth::{CustomerUser, InstructorUser};
use crate::error::AppError;
use crate::services::modules;
use crate::state::AppState;

// -- Instructor --

/// GET /instructor/courses/{course_id}/modules
pub async fn list_course_modules(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(course_id): Path<String>,
) -> ApiResult<Vec<ModuleResponse>> {
    let items = modules::list_modules_for_owner(state.store.as_ref(), &principal, &course_id).await?;
    Ok(ok("modules", items.into_iter().map(Into::into).collect()))
}

/// POST /instructor/courses/{course_id}/modules
pub async fn create_module(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(course_id): Path<String>,
    Json(req): Json<CreateModuleRequest>,
) -> Result<Created<ModuleResponse>, AppError> {
    let module = modules::create_module(state.store.as_ref(), &principal, &course_id, req).await?;
    Ok(created("module created", module.into()))
}

/// GET /instructor/modules/{module_id}
pub async fn get_module(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(module_id): Path<String>,
) -> ApiResult<ModuleDetailResponse> {
    let detail = modules::module_for_owner(state.store.as_ref(), &principal, &module_id).await?;
    Ok(ok("module", detail))
}

/// PUT /instructor/modules/{module_id}
pub async fn update_module(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(module_id): Path<String>,
    Json(req): Json<UpdateModuleRequest>,
) -> ApiResult<ModuleResponse> {
    let module = modules::update_module(state.store.as_ref(), &principal, &module_id, req).await?;
    Ok(ok("module updated", module.into()))
}

/// DELETE /instructor/modules/{module_id}
pub async fn delete_module(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(module_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    modules::delete_module(state.store.as_ref(), &principal, &module_id).await?;
    Ok(ok("module deleted", DeletedResponse { id: module_id }))
}

/// POST /instructor/modules/{module_id}/media
pub async fn add_media(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(module_id): Path<String>,
    Json(req): Json<MediaRequest>,
) -> Result<Created<MediaResponse>, AppError> {
    let media = modules::add_media(state.store.as_ref(), &principal, &module_id, req).await?;
    Ok(created("media created", media.into()))
}

/// PUT /instructor/media/{media_id}
pub async fn update_media(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(media_id): Path<String>,
    Json(req): Json<MediaRequest>,
) -> ApiResult<MediaResponse> {
    let media = modules::update_media(state.store.as_ref(), &principal, &media_id, req).await?;
    Ok(ok("media updated", media.into()))
}

/// DELETE /instructor/media/{media_id}
pub async fn delete_media(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(media_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    modules::delete_media(state.store.as_ref(), &principal, &media_id).await?;
    Ok(ok("media deleted", DeletedResponse { id: media_id }))
}

/// POST /instructor/courses/{course_id}/quizzes
pub async fn create_quiz(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(course_id): Path<String>,
    Json(req): Json<QuizRequest>,
) -> Result<Created<QuizResponse>, AppError> {
    let quiz = modules::create_quiz(state.store.as_ref(), &principal, &course_id, req).await?;
    Ok(created("quiz created", quiz.into()))
}

/// PUT /instructor/quizzes/{quiz_id}
pub async fn update_quiz(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(quiz_id): Path<String>,
    Json(req): Json<QuizRequest>,
) -> ApiResult<QuizResponse> {
    let quiz = modules::update_quiz(state.store.as_ref(), &principal, &quiz_id, req).await?;
    Ok(ok("quiz updated", quiz.into()))
}

/// DELETE /instructor/quizzes/{quiz_id}
pub async fn delete_quiz(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(quiz_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    modules::delete_quiz(state.store.as_ref(), &principal, &quiz_id).await?;
    Ok(ok("quiz deleted", DeletedResponse { id: quiz_id }))
}

// -- Customer --

/// GET /customer/courses/{course_id}/modules
pub async fn list_enrolled_modules(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(course_id): Path<String>,
) -> ApiResult<Vec<ModuleResponse>> {
    let items =
        modules::list_modules_for_customer(state.store.as_ref(), &principal, &course_id).await?;
    Ok(ok("modules", items.into_iter().map(Into::into).collect()))
}

/// GET /customer/modules/{module_id}
pub async fn get_enrolled_module(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(module_id): Path<String>,
) -> ApiResult<ModuleDetailResponse> {
    let detail = modules::module_for_customer(state.store.as_ref(), &principal, &module_id).await?;
    Ok(ok("module", detail))
}

/// GET /customer/courses/{course_id}/quizzes
pub async fn list_enrolled_quizzes(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(course_id): Path<String>,
) -> ApiResult<Vec<QuizResponse>> {
    let items =
        modules::list_quizzes_for_customer(state.store.as_ref(), &principal, &course_id).await?;
    Ok(ok("quizzes", items.into_iter().map(Into::into).collect()))
}
