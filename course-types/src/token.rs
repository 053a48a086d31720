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

//! Access token (JWT) claims.
//!
//! Both realms (customers and instructors) receive the same kind of token.
//! The `role` claim tells the backend which realm the bearer belongs to.

use serde::{Deserialize, Serialize};

/// Account realm a token was issued for.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Instructor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Instructor => "instructor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT payload for an access token.
///
/// # Example payload
///
/// ```json
/// {
///   "sub": "9b2f3c3e-8f4e-4c1a-9d59-3f8a3b7f2a10",
///   "role": "customer",
///   "jti": "0e5c4d8a-3c55-4a4e-b1f7-6d7b8a9c0d11",
///   "iat": 1707000000,
///   "exp": 1707086400,
///   "iss": "course-platform-backend"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccessTokenClaims {
    /// Account id of the bearer.
    pub sub: String,

    /// Realm of the bearer.
    pub role: Role,

    /// Unique token id. Logging out revokes this id until `exp`.
    pub jti: String,

    /// Issued-at timestamp (Unix seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix seconds).
    pub exp: i64,

    /// Issuer identifier. Always `"course-platform-backend"`.
    pub iss: String,
}

impl AccessTokenClaims {
    /// The expected issuer value for tokens produced by the backend.
    pub const ISSUER: &'static str = "course-platform-backend";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Instructor).unwrap(),
            "\"instructor\""
        );
        let role: Role = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(role, Role::Customer);
    }
}
