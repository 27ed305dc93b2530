use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use tracing::info;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use hrms::config::Config;
use hrms::db::{Database, init_pool, run_migrations};
use hrms::docs::ApiDoc;
use hrms::repository::{HrmsRepository, PgRepository};
use hrms::{logging, routes};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let _guard = logging::init(&config);

    info!(addr = %config.server_addr, "Server starting...");

    let pool = init_pool(&config.database)
        .await
        .context("Failed to connect to database")?;

    if config.run_migrations {
        run_migrations(&pool)
            .await
            .context("Failed to apply migrations")?;
    }

    let repository: Arc<dyn HrmsRepository> =
        Arc::new(PgRepository::new(Database::new(pool.clone())));
    let api_prefix = config.api_prefix.clone();

    HttpServer::new(move || {
        let api_prefix = api_prefix.clone();
        App::new()
            .wrap(routes::cors())
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::from(repository.clone()))
            .configure(move |cfg| routes::configure(cfg, &api_prefix))
    })
    .shutdown_timeout(config.shutdown_timeout_secs)
    .bind(&config.server_addr)
    .with_context(|| format!("Failed to bind {}", config.server_addr))?
    .run()
    .await?;

    // The server future resolves once in-flight requests have drained.
    info!("Server stopped, closing database pool");
    pool.close().await;

    Ok(())
}
