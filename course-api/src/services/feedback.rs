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

//! Favorites and ratings.
//!
//! A customer can favorite and rate a course at most once each. Rating also
//! requires having finished the course. Ratings stay hidden from the public
//! until the course's instructor publishes them.

use chrono::Utc;
use course_types::requests::{CreateRatingRequest, PublishRatingRequest};

use super::{ensure_course_owner, ensure_enrolled, load_course, new_id};
use crate::auth::Principal;
use crate::error::AppError;
use crate::model::{Favorite, Rating};
use crate::store::{CourseStore, StoreError};
use crate::validate;

// -- Favorites --

pub async fn add_favorite(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
) -> Result<Favorite, AppError> {
    load_course(store, course_id).await?;
    let favorite = Favorite {
        id: new_id(),
        customer_id: principal.id.clone(),
        course_id: course_id.to_string(),
        created_at: Utc::now(),
    };
    store.create_favorite(favorite).await.map_err(|e| match e {
        StoreError::Conflict(_) => AppError::AlreadyFavorited,
        other => other.into(),
    })
}

pub async fn list_favorites(
    store: &dyn CourseStore,
    principal: &Principal,
) -> Result<Vec<Favorite>, AppError> {
    Ok(store.list_favorites(&principal.id).await?)
}

pub async fn delete_favorite(
    store: &dyn CourseStore,
    principal: &Principal,
    favorite_id: &str,
) -> Result<(), AppError> {
    let favorite = store
        .get_favorite(favorite_id)
        .await?
        .ok_or(AppError::NotFound("favorite"))?;
    if favorite.customer_id != principal.id {
        return Err(AppError::NotAuthorized);
    }
    Ok(store.delete_favorite(favorite_id).await?)
}

// -- Ratings --

pub async fn add_rating(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
    req: CreateRatingRequest,
) -> Result<Rating, AppError> {
    validate::rating(req.rating)?;
    let testimonial = validate::required("testimonial", &req.testimonial)?;
    load_course(store, course_id).await?;

    let enrollment = ensure_enrolled(store, principal, course_id).await?;
    if !enrollment.is_finish {
        return Err(AppError::CourseNotFinished);
    }

    let now = Utc::now();
    let rating = Rating {
        id: new_id(),
        rating: req.rating,
        testimonial,
        is_publish: false,
        customer_id: principal.id.clone(),
        course_id: course_id.to_string(),
        created_at: now,
        updated_at: now,
    };
    let rating = store.create_rating(rating).await.map_err(|e| match e {
        StoreError::Conflict(_) => AppError::AlreadyRated,
        other => other.into(),
    })?;
    tracing::info!(rating_id = %rating.id, course_id, customer_id = %principal.id, "Course rated");
    Ok(rating)
}

pub async fn delete_rating(
    store: &dyn CourseStore,
    principal: &Principal,
    rating_id: &str,
) -> Result<(), AppError> {
    let rating = store
        .get_rating(rating_id)
        .await?
        .ok_or(AppError::NotFound("rating"))?;
    if rating.customer_id != principal.id {
        return Err(AppError::NotAuthorized);
    }
    Ok(store.delete_rating(rating_id).await?)
}

/// Published ratings of a course, for anyone.
pub async fn list_public_ratings(
    store: &dyn CourseStore,
    course_id: &str,
) -> Result<Vec<Rating>, AppError> {
    load_course(store, course_id).await?;
    Ok(store.list_ratings(course_id, true).await?)
}

/// Every rating of a course, for its instructor.
pub async fn list_course_ratings(
    store: &dyn CourseStore,
    principal: &Principal,
    course_id: &str,
) -> Result<Vec<Rating>, AppError> {
    ensure_course_owner(store, principal, course_id).await?;
    Ok(store.list_ratings(course_id, false).await?)
}

pub async fn publish_rating(
    store: &dyn CourseStore,
    principal: &Principal,
    rating_id: &str,
    req: PublishRatingRequest,
) -> Result<Rating, AppError> {
    let rating = store
        .get_rating(rating_id)
        .await?
        .ok_or(AppError::NotFound("rating"))?;
    ensure_course_owner(store, principal, &rating.course_id).await?;
    Ok(store
        .set_rating_published(rating_id, req.is_publish)
        .await?)
}
