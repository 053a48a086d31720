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

//! Application error type that implements Axum's `IntoResponse`.
//!
//! Every error is returned as an [`APIError`] body paired with the status
//! code of its variant. Internal details are logged, never sent to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use course_types::APIError;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing or invalid access token")]
    Unauthorized,
    #[error("email or password not match")]
    InvalidCredentials,
    #[error("you are not allowed to access this resource")]
    NotAuthorized,
    #[error("account is not active")]
    AccountInactive,
    #[error("course must be finished before rating it")]
    CourseNotFinished,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("you are not enrolled in this course")]
    NotEnrolled,
    #[error("email is already registered")]
    EmailTaken,
    #[error("course capacity exceeded")]
    CapacityExceeded,
    #[error("already enrolled in this course")]
    AlreadyEnrolled,
    #[error("course is already a favorite")]
    AlreadyFavorited,
    #[error("course already rated")]
    AlreadyRated,
    #[error("assignment already submitted")]
    AlreadySubmitted,
    #[error("module already has an assignment")]
    AssignmentExists,
    #[error("{0} is still in use")]
    InUse(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("internal server error")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotAuthorized | Self::AccountInactive | Self::CourseNotFinished => {
                StatusCode::FORBIDDEN
            }
            Self::NotFound(_) | Self::NotEnrolled => StatusCode::NOT_FOUND,
            Self::EmailTaken
            | Self::CapacityExceeded
            | Self::AlreadyEnrolled
            | Self::AlreadyFavorited
            | Self::AlreadyRated
            | Self::AlreadySubmitted
            | Self::AssignmentExists
            | Self::InUse(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::AccountInactive => "ACCOUNT_INACTIVE",
            Self::CourseNotFinished => "COURSE_NOT_FINISHED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::NotEnrolled => "NOT_ENROLLED",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::CapacityExceeded => "CAPACITY_EXCEEDED",
            Self::AlreadyEnrolled => "ALREADY_ENROLLED",
            Self::AlreadyFavorited => "ALREADY_FAVORITED",
            Self::AlreadyRated => "ALREADY_RATED",
            Self::AlreadySubmitted => "ALREADY_SUBMITTED",
            Self::AssignmentExists => "ASSIGNMENT_EXISTS",
            Self::InUse(_) => "IN_USE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Body sent to the client for this error.
    pub fn body(&self) -> APIError {
        let status = self.status();
        APIError::new(
            self.code(),
            status.canonical_reason().unwrap_or("Error"),
            self.to_string(),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!("Internal error: {detail}");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

/// Generic mapping for store failures. Services that know what a conflict
/// means for their operation translate `Conflict` themselves first.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::CapacityExceeded => Self::CapacityExceeded,
            StoreError::InUse(what) => Self::InUse(what),
            StoreError::Conflict(what) => Self::Validation(format!("{what} already exists")),
            StoreError::Database(err) => Self::internal(format!("database error: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    /// Consume the response body and deserialize it to `APIError`.
    async fn read_error_body(resp: Response) -> (StatusCode, APIError) {
        let status = resp.status();
        let bytes = Body::new(resp.into_body())
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let parsed: APIError = serde_json::from_slice(&bytes).expect("deserialize error body");
        (status, parsed)
    }

    #[tokio::test]
    async fn unauthorized_produces_401_with_correct_code() {
        let (status, body) = read_error_body(AppError::Unauthorized.into_response()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.code, "UNAUTHORIZED");
        assert_eq!(body.message, "Unauthorized");
    }

    #[tokio::test]
    async fn capacity_exceeded_produces_409() {
        let (status, body) = read_error_body(AppError::CapacityExceeded.into_response()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "CAPACITY_EXCEEDED");
        assert_eq!(body.error, "course capacity exceeded");
    }

    #[tokio::test]
    async fn store_in_use_maps_to_conflict() {
        let err: AppError = StoreError::InUse("category").into();
        let (status, body) = read_error_body(err.into_response()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "IN_USE");
        assert_eq!(body.error, "category is still in use");
    }

    #[tokio::test]
    async fn not_found_names_the_entity() {
        let (status, body) = read_error_body(AppError::NotFound("course").into_response()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(body.error, "course not found");
    }

    #[tokio::test]
    async fn invalid_credentials_uses_fixed_message() {
        let (status, body) = read_error_body(AppError::InvalidCredentials.into_response()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "email or password not match");
    }

    #[tokio::test]
    async fn internal_hides_detail_from_client() {
        let err = AppError::internal("db exploded");
        let (status, body) = read_error_body(err.into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "INTERNAL_ERROR");
        assert!(!body.error.contains("db exploded"));
    }

    #[test]
    fn every_forbidden_variant_maps_to_403() {
        for err in [
            AppError::NotAuthorized,
            AppError::AccountInactive,
            AppError::CourseNotFinished,
        ] {
            assert_eq!(err.status(), StatusCode::FORBIDDEN, "{}", err.code());
        }
    }

    #[test]
    fn store_errors_translate() {
        assert!(matches!(
            AppError::from(StoreError::NotFound("module")),
            AppError::NotFound("module")
        ));
        assert!(matches!(
            AppError::from(StoreError::CapacityExceeded),
            AppError::CapacityExceeded
        ));
        assert_eq!(
            AppError::from(StoreError::Database(sqlx::Error::RowNotFound)).code(),
            "INTERNAL_ERROR"
        );
    }
}
