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

//! JWT access token signing and verification.
//!
//! Customers and instructors get the same kind of token; the `role` claim
//! selects the realm. Each token carries a unique `jti` so logout can revoke
//! it individually.

use chrono::Utc;
use course_types::{AccessTokenClaims, Role};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign access token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
    #[error("invalid access token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// A freshly signed token and its claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: AccessTokenClaims,
}

/// Sign an access token for `account_id` in `role`'s realm.
pub fn issue_access_token(
    secret: &str,
    ttl_secs: i64,
    account_id: &str,
    role: Role,
) -> Result<IssuedToken, TokenError> {
    let now = Utc::now().timestamp();
    let claims = AccessTokenClaims {
        sub: account_id.to_string(),
        role,
        jti: Uuid::new_v4().to_string(),
        iat: now,
        exp: now + ttl_secs,
        iss: AccessTokenClaims::ISSUER.to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Sign)?;
    Ok(IssuedToken { token, claims })
}

/// Check signature, expiry and issuer; return the claims.
///
/// Expiry is exact: revocations are purged once `exp` passes, so a token must
/// not be accepted after that point.
pub fn verify_access_token(secret: &str, token: &str) -> Result<AccessTokenClaims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    validation.set_issuer(&[AccessTokenClaims::ISSUER]);
    decode::<AccessTokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(TokenError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "super-secret-test-key";

    #[test]
    fn token_round_trips_with_correct_claims() {
        let issued = issue_access_token(TEST_SECRET, 600, "cust-1", Role::Customer)
            .expect("should sign");
        let claims = verify_access_token(TEST_SECRET, &issued.token).expect("should verify");

        assert_eq!(claims.sub, "cust-1");
        assert_eq!(claims.role, Role::Customer);
        assert_eq!(claims.iss, "course-platform-backend");
        assert_eq!(claims, issued.claims);
    }

    #[test]
    fn exp_is_now_plus_ttl() {
        let before = Utc::now().timestamp();
        let issued = issue_access_token(TEST_SECRET, 900, "i", Role::Instructor).unwrap();
        let after = Utc::now().timestamp();
        assert!(issued.claims.exp >= before + 900);
        assert!(issued.claims.exp <= after + 900);
    }

    #[test]
    fn each_token_gets_its_own_jti() {
        let a = issue_access_token(TEST_SECRET, 60, "x", Role::Customer).unwrap();
        let b = issue_access_token(TEST_SECRET, 60, "x", Role::Customer).unwrap();
        assert_ne!(a.claims.jti, b.claims.jti);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issued = issue_access_token(TEST_SECRET, 600, "x", Role::Customer).unwrap();
        assert!(verify_access_token("other-secret", &issued.token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = issue_access_token(TEST_SECRET, -120, "x", Role::Customer).unwrap();
        assert!(matches!(
            verify_access_token(TEST_SECRET, &issued.token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn recently_expired_token_is_rejected() {
        let issued = issue_access_token(TEST_SECRET, -5, "x", Role::Customer).unwrap();
        assert!(verify_access_token(TEST_SECRET, &issued.token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_access_token(TEST_SECRET, "not.a.jwt").is_err());
    }
}
