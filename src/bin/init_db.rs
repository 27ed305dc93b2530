//! Applies the schema migrations and lists the tables that now exist.

use anyhow::Context;
use hrms::config::DatabaseConfig;
use hrms::db::{Database, init_pool, run_migrations};
use hrms::logging;
use sqlx::Row;
use tracing::{error, info};

const PUBLIC_TABLES: &str =
    "SELECT table_name::text FROM information_schema.tables WHERE table_schema = 'public' ORDER BY table_name";

#[actix_web::main]
async fn main() {
    logging::init_stderr(tracing::Level::INFO);

    if let Err(e) = run().await {
        error!(error = ?e, "Database initialisation failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_pool(&config).await.context("Failed to connect")?;

    info!("Applying migrations...");
    run_migrations(&pool).await.context("Failed to apply migrations")?;
    info!("Database initialised");

    let db = Database::new(pool.clone());
    let tables = db.execute(PUBLIC_TABLES, &[]).await?;
    let names = tables
        .iter()
        .map(|row| row.try_get::<String, _>(0))
        .collect::<Result<Vec<_>, _>>()?;
    info!(tables = %names.join(", "), "Tables now present");

    pool.close().await;
    Ok(())
}
