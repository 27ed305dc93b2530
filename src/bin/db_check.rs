//! Connectivity check: prints the server clock and the public tables.

use anyhow::Context;
use chrono::{DateTime, Utc};
use hrms::config::DatabaseConfig;
use hrms::db::{Database, init_pool};
use hrms::logging;
use sqlx::Row;
use tracing::{error, info};

#[actix_web::main]
async fn main() {
    logging::init_stderr(tracing::Level::INFO);

    if let Err(e) = run().await {
        error!(error = ?e, "Connection check failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = DatabaseConfig::from_env()?;
    info!(tls = config.require_tls, "Testing database connection");

    let pool = init_pool(&config).await.context("Failed to connect")?;
    let db = Database::new(pool.clone());

    let now = db.execute("SELECT NOW() AS now", &[]).await?;
    let now: DateTime<Utc> = now
        .first()
        .context("NOW() returned no row")?
        .try_get("now")?;
    info!(%now, "Connection successful");

    let tables = db
        .execute(
            "SELECT table_name::text FROM information_schema.tables \
             WHERE table_schema = 'public' ORDER BY table_name",
            &[],
        )
        .await?;
    let names = tables
        .iter()
        .map(|row| row.try_get::<String, _>(0))
        .collect::<Result<Vec<_>, _>>()?;
    info!(tables = %names.join(", "), "Tables found");

    pool.close().await;
    Ok(())
}
