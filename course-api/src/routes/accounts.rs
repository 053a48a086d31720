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

//! Handlers for registration, login, logout and profiles of both realms.

use axum::{extract::State, Json};
use course_types::{
    requests::{LoginRequest, RegisterRequest, UpdateProfileRequest},
    responses::{AccountResponse, LoginResponse},
    Role,
};

use super::{created, ok, ApiResult, Created};
use crate::auth::{CustomerUser, InstructorUser, Principal};
use crate::error::AppError;
use crate::services::accounts;
use crate::state::AppState;

async fn register(
    state: &AppState,
    role: Role,
    req: RegisterRequest,
) -> Result<Created<AccountResponse>, AppError> {
    let account = accounts::register(state.store.as_ref(), role, req).await?;
    Ok(created("account registered", account.into()))
}

async fn login(state: &AppState, role: Role, req: LoginRequest) -> ApiResult<LoginResponse> {
    let outcome = accounts::login(
        state.store.as_ref(),
        &state.jwt_secret,
        state.token_ttl_secs,
        role,
        req,
    )
    .await?;
    Ok(ok(
        "login success",
        LoginResponse {
            token: outcome.token.token,
            token_type: "Bearer".to_string(),
            expires_at: outcome.token.claims.exp,
            account: outcome.account.into(),
        },
    ))
}

async fn logout(state: &AppState, principal: &Principal) -> ApiResult<()> {
    accounts::logout(state.store.as_ref(), principal).await?;
    Ok(ok("logout success", ()))
}

async fn profile(state: &AppState, principal: &Principal) -> ApiResult<AccountResponse> {
    let account = accounts::profile(state.store.as_ref(), principal).await?;
    Ok(ok("profile", account.into()))
}

async fn update_profile(
    state: &AppState,
    principal: &Principal,
    req: UpdateProfileRequest,
) -> ApiResult<AccountResponse> {
    let account = accounts::update_profile(state.store.as_ref(), principal, req).await?;
    Ok(ok("profile updated", account.into()))
}

// -- Customers --

/// POST /customer/register
pub async fn customer_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Created<AccountResponse>, AppError> {
    register(&state, Role::Customer, req).await
}

/// POST /customer/login
pub async fn customer_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    login(&state, Role::Customer, req).await
}

/// POST /customer/logout
///
/// Revokes the presented token. Other tokens of the same account stay valid.
pub async fn customer_logout(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
) -> ApiResult<()> {
    logout(&state, &principal).await
}

/// GET /customer/profile
pub async fn customer_profile(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
) -> ApiResult<AccountResponse> {
    profile(&state, &principal).await
}

/// PUT /customer/profile
pub async fn update_customer_profile(
    State(state): State<AppState>,
    CustomerUser(principal): CustomerUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<AccountResponse> {
    update_profile(&state, &principal, req).await
}

// -- Instructors --

/// POST /instructor/register
pub async fn instructor_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Created<AccountResponse>, AppError> {
    register(&state, Role::Instructor, req).await
}

/// POST /instructor/login
pub async fn instructor_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    login(&state, Role::Instructor, req).await
}

/// POST /instructor/logout
pub async fn instructor_logout(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
) -> ApiResult<()> {
    logout(&state, &principal).await
}

/// GET /instructor/profile
pub async fn instructor_profile(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
) -> ApiResult<AccountResponse> {
    profile(&state, &principal).await
}

/// PUT /instructor/profile
pub async fn update_instructor_profile(
    State(state): State<AppState>,
    InstructorUser(principal): InstructorUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<AccountResponse> {
    update_profile(&state, &principal, req).await
}
