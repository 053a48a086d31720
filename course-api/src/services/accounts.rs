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

//! Registration, login, logout and profile management for both realms.

use chrono::Utc;
use course_types::requests::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use course_types::Role;

use super::{new_id, non_blank};
use crate::auth::Principal;
use crate::error::AppError;
use crate::model::Account;
use crate::password::{hash_password, verify_password};
use crate::store::{AccountPatch, CourseStore, StoreError};
use crate::token::{issue_access_token, IssuedToken};
use crate::validate;

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: IssuedToken,
    pub account: Account,
}

pub async fn register(
    store: &dyn CourseStore,
    role: Role,
    req: RegisterRequest,
) -> Result<Account, AppError> {
    let name = validate::required_text("name", &req.name)?;
    let email = validate::email(&req.email)?;
    validate::password(&req.password)?;

    if store.find_account_by_email(role, &email).await?.is_some() {
        return Err(AppError::EmailTaken);
    }

    let now = Utc::now();
    let account = Account {
        id: new_id(),
        role,
        name,
        email,
        password_hash: hash_password(&req.password)?,
        profile_image: non_blank(req.profile_image),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let account = store.create_account(account).await.map_err(|e| match e {
        StoreError::Conflict(_) => AppError::EmailTaken,
        other => other.into(),
    })?;

    tracing::info!(account_id = %account.id, role = %role, "Account registered");
    Ok(account)
}

/// Unknown email and wrong password fail the same way.
pub async fn login(
    store: &dyn CourseStore,
    jwt_secret: &str,
    token_ttl_secs: i64,
    role: Role,
    req: LoginRequest,
) -> Result<LoginOutcome, AppError> {
    let email = req.email.trim().to_lowercase();
    let account = store
        .find_account_by_email(role, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&req.password, &account.password_hash) {
        tracing::debug!(account_id = %account.id, "Login rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }
    if !account.is_active {
        return Err(AppError::AccountInactive);
    }

    let token = issue_access_token(jwt_secret, token_ttl_secs, &account.id, role)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(account_id = %account.id, role = %role, "Login succeeded");
    Ok(LoginOutcome { token, account })
}

/// Revoke the caller's token until it would have expired anyway.
pub async fn logout(store: &dyn CourseStore, principal: &Principal) -> Result<(), AppError> {
    store
        .revoke_token(&principal.token_id, principal.expires_at)
        .await?;
    tracing::info!(account_id = %principal.id, role = %principal.role, "Logged out");
    Ok(())
}

pub async fn profile(store: &dyn CourseStore, principal: &Principal) -> Result<Account, AppError> {
    store
        .get_account(principal.role, &principal.id)
        .await?
        .ok_or(AppError::NotFound("account"))
}

pub async fn update_profile(
    store: &dyn CourseStore,
    principal: &Principal,
    req: UpdateProfileRequest,
) -> Result<Account, AppError> {
    let name = req
        .name
        .map(|n| validate::required_text("name", &n))
        .transpose()?;
    let password_hash = match req.password {
        Some(password) => {
            validate::password(&password)?;
            Some(hash_password(&password)?)
        }
        None => None,
    };
    let patch = AccountPatch {
        name,
        profile_image: non_blank(req.profile_image),
        password_hash,
    };
    Ok(store
        .update_account(principal.role, &principal.id, patch)
        .await?)
}
