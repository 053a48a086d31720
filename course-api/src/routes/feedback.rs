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

//! Handlers for favorites and ratings.

use axum::{
    extract::{Path, State},
    Json,
};
use course_types::{
    requests::{CreateRatingRequest, PublishRatingRequest},
    responses::{DeletedResponse, FavoriteResponse, RatingResponse},
};

use super::{created, ok, ApiResult, Created};
use crate::auth::{CustomerUser, InstructorUser};
use crate::error::AppError;
use crate::services::feedback;
use crate::state::AppState;

/// POST /customer/courses/{course_id}/favorite
pub async fn add_favorite(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(course_id): Path<String>,
) -> Result<Created<FavoriteResponse>, AppError> {
    let favorite = feedback::add_favorite(state.store.as_ref(), &principal, &course_id).await?;
    Ok(created("success add favorite", favorite.into()))
}

/// GET /customer/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
) -> ApiResult<Vec<FavoriteResponse>> {
    let rows = feedback::list_favorites(state.store.as_ref(), &principal).await?;
    Ok(ok("favorites", rows.into_iter().map(Into::into).collect()))
}

/// DELETE /customer/favorites/{favorite_id}
pub async fn delete_favorite(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(favorite_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    feedback::delete_favorite(state.store.as_ref(), &principal, &favorite_id).await?;
    Ok(ok("favorite deleted", DeletedResponse { id: favorite_id }))
}

/// POST /customer/courses/{course_id}/ratings
pub async fn add_rating(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(course_id): Path<String>,
    Json(req): Json<CreateRatingRequest>,
) -> Result<Created<RatingResponse>, AppError> {
    let rating = feedback::add_rating(state.store.as_ref(), &principal, &course_id, req).await?;
    Ok(created("success add rating", rating.into()))
}

/// DELETE /customer/ratings/{rating_id}
pub async fn delete_rating(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Path(rating_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    feedback::delete_rating(state.store.as_ref(), &principal, &rating_id).await?;
    Ok(ok("rating deleted", DeletedResponse { id: rating_id }))
}

/// GET /courses/{course_id}/ratings
///
/// Published ratings only.
pub async fn list_public_ratings(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> ApiResult<Vec<RatingResponse>> {
    let rows = feedback::list_public_ratings(state.store.as_ref(), &course_id).await?;
    Ok(ok("ratings", rows.into_iter().map(Into::into).collect()))
}

/// GET /instructor/courses/{course_id}/ratings
pub async fn list_course_ratings(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(course_id): Path<String>,
) -> ApiResult<Vec<RatingResponse>> {
    let rows = feedback::list_course_ratings(state.store.as_ref(), &principal, &course_id).await?;
    Ok(ok("ratings", rows.into_iter().map(Into::into).collect()))
}

/// PUT /instructor/ratings/{rating_id}/publish
pub async fn publish_rating(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Path(rating_id): Path<String>,
    Json(req): Json<PublishRatingRequest>,
) -> ApiResult<RatingResponse> {
    let rating =
        feedback::publish_rating(state.store.as_ref(), &principal, &rating_id, req).await?;
    Ok(ok("rating updated", rating.into()))
}
