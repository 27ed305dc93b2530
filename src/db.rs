use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use derive_more::Display;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow, PgSslMode};
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// SQLSTATE raised by PostgreSQL on a UNIQUE constraint violation.
pub const UNIQUE_VIOLATION: &str = "23505";

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connects the shared pool. TLS is required (without certificate checks) when the
/// connection string came from `POSTGRES_URL`, and switched off otherwise.
pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let ssl_mode = if config.require_tls {
        PgSslMode::Require
    } else {
        PgSslMode::Disable
    };
    let options = PgConnectOptions::from_str(&config.url)?.ssl_mode(ssl_mode);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    info!(
        max_connections = config.max_connections,
        tls = config.require_tls,
        "Database pool ready"
    );
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Driver failure, carrying the SQLSTATE code when the server reported one.
#[derive(Debug, Display)]
#[display(fmt = "{}", message)]
pub struct DbError {
    code: Option<String>,
    message: String,
}

impl DbError {
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(str::to_owned),
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code() == Some(UNIQUE_VIOLATION)
    }
}

impl std::error::Error for DbError {}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        let code = match &e {
            sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
            _ => None,
        };
        Self {
            code,
            message: e.to_string(),
        }
    }
}

/// Positional parameter bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    I32(i32),
    Date(NaiveDate),
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_owned())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::I32(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

/// Thin executor over the pool. Every statement in the crate goes through `execute`.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs `sql` with `params` bound in order and returns the rows as the driver produced them.
    pub async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<PgRow>, DbError> {
        debug!(sql = %sql, params = ?params, "Executing statement");

        let mut query = sqlx::query(sql);
        for value in params {
            query = match value {
                SqlValue::Text(v) => query.bind(v.clone()),
                SqlValue::I32(v) => query.bind(*v),
                SqlValue::Date(v) => query.bind(*v),
            };
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn fetch_all_as<T>(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<T>, DbError>
    where
        T: for<'r> FromRow<'r, PgRow>,
    {
        let rows = self.execute(sql, params).await?;
        rows.iter()
            .map(|row| T::from_row(row).map_err(DbError::from))
            .collect()
    }

    pub async fn fetch_one_as<T>(&self, sql: &str, params: &[SqlValue]) -> Result<T, DbError>
    where
        T: for<'r> FromRow<'r, PgRow>,
    {
        self.fetch_all_as(sql, params)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DbError::from(sqlx::Error::RowNotFound))
    }

    /// First column of the first row, e.g. a `COUNT(*)`.
    pub async fn fetch_scalar(&self, sql: &str, params: &[SqlValue]) -> Result<i64, DbError> {
        let (value,): (i64,) = self.fetch_one_as(sql, params).await?;
        Ok(value)
    }
}
