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

//! Application configuration loaded from environment variables.

use std::env;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Configuration for the course platform API.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server (e.g. "0.0.0.0:8080").
    pub listen_addr: String,
    /// PostgreSQL connection string. `None` runs on the in-memory store.
    pub database_url: Option<String>,
    /// Maximum size of the PostgreSQL pool.
    pub db_max_connections: u32,
    /// Shared secret used to sign access tokens (HMAC-SHA256).
    pub jwt_secret: String,
    /// Token time-to-live in seconds (default: 86400 = 24 hours).
    pub token_ttl_secs: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required
    /// - `JWT_SECRET`
    ///
    /// # Optional
    /// - `LISTEN_ADDR` (default: `"0.0.0.0:8080"`)
    /// - `TOKEN_TTL_SECS` (default: `"86400"`)
    /// - `DATABASE_URL`, or all of `DB_HOST`, `DB_USER`, `DB_PASSWORD`,
    ///   `DB_NAME` with optional `DB_PORT` (default `5432`)
    /// - `DB_MAX_CONNECTIONS` (default: `"20"`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let listen_addr = get("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let token_ttl_secs = parse_or("TOKEN_TTL_SECS", get("TOKEN_TTL_SECS"), 86_400_i64)?;
        if token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                name: "TOKEN_TTL_SECS",
                expected: "positive integer",
                value: token_ttl_secs.to_string(),
            });
        }
        let db_max_connections =
            parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 20_u32)?;

        let database_url = match get("DATABASE_URL") {
            Some(url) => Some(url),
            None => match (
                get("DB_HOST"),
                get("DB_USER"),
                get("DB_PASSWORD"),
                get("DB_NAME"),
            ) {
                (Some(host), Some(user), Some(password), Some(name)) => {
                    let port: u16 = parse_or("DB_PORT", get("DB_PORT"), 5432)?;
                    Some(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
                }
                _ => None,
            },
        };

        Ok(Self {
            listen_addr,
            database_url,
            db_max_connections,
            jwt_secret,
            token_ttl_secs,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected: "integer",
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn jwt_secret_is_required() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert_eq!(
            config_from(&[("JWT_SECRET", "  ")]).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn defaults_without_database() {
        let config = config_from(&[("JWT_SECRET", "s")]).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.token_ttl_secs, 86_400);
        assert_eq!(config.db_max_connections, 20);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn database_url_from_parts() {
        let config = config_from(&[
            ("JWT_SECRET", "s"),
            ("DB_HOST", "db"),
            ("DB_USER", "course"),
            ("DB_PASSWORD", "pw"),
            ("DB_NAME", "courses"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://course:pw@db:5432/courses")
        );
    }

    #[test]
    fn explicit_database_url_wins() {
        let config = config_from(&[
            ("JWT_SECRET", "s"),
            ("DATABASE_URL", "postgres://a@b/c"),
            ("DB_HOST", "ignored"),
        ])
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://a@b/c"));
    }

    #[test]
    fn bad_ttl_is_rejected() {
        let err = config_from(&[("JWT_SECRET", "s"), ("TOKEN_TTL_SECS", "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "TOKEN_TTL_SECS",
                ..
            }
        ));
        assert!(config_from(&[("JWT_SECRET", "s"), ("TOKEN_TTL_SECS", "0")]).is_err());
    }
}
