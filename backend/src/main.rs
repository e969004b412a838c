//! Backend entry-point: configuration, storage, and the HTTP server.

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use sewa_backend::inbound::http::health::HealthState;
#[cfg(debug_assertions)]
use sewa_backend::ApiDoc;
use sewa_backend::outbound::persistence::{DbPool, PoolConfig};
use sewa_backend::server::{self, AppConfig};
use sewa_backend::Trace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::parse();

    let state = match &config.database_url {
        Some(database_url) => {
            run_migrations(database_url.clone()).await?;
            let pool = DbPool::new(PoolConfig::new(database_url))
                .await
                .map_err(|error| std::io::Error::other(error.to_string()))?;
            info!("storage: PostgreSQL");
            server::postgres_state(&config, pool)
        }
        None => {
            warn!("DATABASE_URL is not set; running on the in-memory store");
            server::memory_state(&config)
        }
    };

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let state_data = web::Data::new(state);

    let bind_addr = config.bind_addr;
    let server = HttpServer::new(move || {
        // The portal's static frontends are served from other origins, so
        // every endpoint answers with permissive cross-origin headers.
        let cors = Cors::permissive();

        let app = App::new()
            .app_data(state_data.clone())
            .app_data(server_health_state.clone())
            .wrap(cors)
            .wrap(Trace)
            .configure(server::routes);

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    info!(%bind_addr, "listening");
    server.run().await
}

/// Apply pending migrations on a blocking connection before the pool
/// starts handing out connections.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|error| std::io::Error::other(format!("database connection: {error}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|error| std::io::Error::other(format!("migrations: {error}")))?;
        Ok::<(), std::io::Error>(())
    })
    .await
    .map_err(|error| std::io::Error::other(format!("migration task: {error}")))?
}
