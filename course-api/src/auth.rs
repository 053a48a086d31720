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

//! Axum extractors that authenticate the caller from an `Authorization:
//! Bearer <jwt>` header.
//!
//! [`AuthUser`] accepts any valid, unrevoked token whose account still exists
//! and is active. [`CustomerUser`] and
//! [`InstructorUser`] additionally require the matching role and reject the
//! other realm with `NotAuthorized`.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::{DateTime, Utc};
use course_types::Role;

use crate::error::AppError;
use crate::state::AppState;
use crate::token::verify_access_token;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Account id (`sub` claim).
    pub id: String,
    pub role: Role,
    /// Token id (`jti` claim), revoked on logout.
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Extractor for any authenticated account.
///
/// Usage in a handler:
/// ```ignore
/// async fn my_handler(AuthUser(principal): AuthUser) { ... }
/// ```
#[derive(Debug)]
pub struct AuthUser(pub Principal);

/// Extractor for an authenticated customer.
#[derive(Debug)]
pub struct CustomerUser(pub Principal);

/// Extractor for an authenticated instructor.
#[derive(Debug)]
pub struct InstructorUser(pub Principal);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let claims = verify_access_token(&state.jwt_secret, token).map_err(|e| {
            tracing::debug!("Rejected access token: {e}");
            AppError::Unauthorized
        })?;
        if state.store.is_token_revoked(&claims.jti).await? {
            tracing::debug!(jti = %claims.jti, "Rejected revoked access token");
            return Err(AppError::Unauthorized);
        }
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AppError::Unauthorized)?;

        // Deactivation and deletion take effect on tokens already issued.
        let account = state
            .store
            .get_account(claims.role, &claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;
        if !account.is_active {
            return Err(AppError::AccountInactive);
        }

        Ok(AuthUser(Principal {
            id: claims.sub,
            role: claims.role,
            token_id: claims.jti,
            expires_at,
        }))
    }
}

async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    role: Role,
) -> Result<Principal, AppError> {
    let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
    if principal.role != role {
        return Err(AppError::NotAuthorized);
    }
    Ok(principal)
}

impl FromRequestParts<AppState> for CustomerUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Customer).await.map(Self)
    }
}

impl FromRequestParts<AppState> for InstructorUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Instructor).await.map(Self)
    }
}
