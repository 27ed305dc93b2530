use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    /// Set when the URL came from `POSTGRES_URL` (hosted Postgres).
    pub require_tls: bool,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,
    pub database: DatabaseConfig,
    pub run_migrations: bool,
    pub shutdown_timeout_secs: u64,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = DatabaseConfig::from_lookup(&get)?;

        let server_addr = match get("SERVER_ADDR") {
            Some(addr) => addr,
            None => format!("0.0.0.0:{}", parse_or(&get, "PORT", 5000u16)?),
        };

        Ok(Self {
            server_addr,
            api_prefix: get("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            database,
            run_migrations: parse_or(&get, "RUN_MIGRATIONS", true)?,
            shutdown_timeout_secs: parse_or(&get, "SHUTDOWN_TIMEOUT_SECS", 30)?,
            log_dir: get("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parse_or(&get, "LOG_LEVEL", tracing::Level::DEBUG)?,
        })
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(&|key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let (url, require_tls) = match (get("POSTGRES_URL"), get("DATABASE_URL")) {
            (Some(url), _) => (url, true),
            (None, Some(url)) => (url, false),
            (None, None) => return Err(anyhow!("POSTGRES_URL or DATABASE_URL must be set")),
        };

        Ok(Self {
            url,
            require_tls,
            max_connections: parse_or(get, "DB_MAX_CONNECTIONS", 10)?,
            acquire_timeout_secs: parse_or(get, "DB_ACQUIRE_TIMEOUT_SECS", 30)?,
        })
    }
}

fn parse_or<T>(get: &dyn Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
