//! Runtime configuration from environment variables (optionally loaded from `.env`).

use crate::error::ConfigError;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::str::FromStr;

/// The service always listens here.
pub const LISTEN_ADDR: &str = "0.0.0.0:8080";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: PgConnectOptions,
    pub max_connections: u32,
    /// Insert the sample books into an empty table at startup.
    pub seed: bool,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ConfigError::Invalid {
                    var: ".env",
                    reason: e.to_string(),
                });
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = database_options(&lookup)?;
        let max_connections = match non_empty(&lookup, "DB_MAX_CONNECTIONS") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                reason: format!("'{}' is not an integer", v),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let seed = match non_empty(&lookup, "BOOKS_SEED") {
            Some(v) => parse_flag(&v).ok_or_else(|| ConfigError::Invalid {
                var: "BOOKS_SEED",
                reason: format!("'{}' is not a boolean", v),
            })?,
            None => true,
        };
        Ok(Config {
            database,
            max_connections,
            seed,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key).ok_or(ConfigError::Missing(key))
}

/// `DATABASE_URL` wins; otherwise the `DB_*` parts are assembled.
fn database_options<F>(lookup: &F) -> Result<PgConnectOptions, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = non_empty(lookup, "DATABASE_URL") {
        return PgConnectOptions::from_str(&url).map_err(|e| ConfigError::Invalid {
            var: "DATABASE_URL",
            reason: e.to_string(),
        });
    }

    let mut opts = PgConnectOptions::new()
        .host(&required(lookup, "DB_HOST")?)
        .username(&required(lookup, "DB_USER")?)
        .database(&required(lookup, "DB_NAME")?);
    if let Some(pass) = lookup("DB_PASS") {
        opts = opts.password(&pass);
    }
    if let Some(port) = non_empty(lookup, "DB_PORT") {
        let port: u16 = port.parse().map_err(|_| ConfigError::Invalid {
            var: "DB_PORT",
            reason: format!("'{}' is not a port number", port),
        })?;
        opts = opts.port(port);
    }
    if let Some(mode) = non_empty(lookup, "DB_SSLMODE") {
        let mode = PgSslMode::from_str(&mode).map_err(|e| ConfigError::Invalid {
            var: "DB_SSLMODE",
            reason: e.to_string(),
        })?;
        opts = opts.ssl_mode(mode);
    }
    Ok(opts)
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
