//! # Rusty-Ads Binary
//!
//! The entry point that assembles the application from configuration and
//! compile-time features.

use std::sync::Arc;

use actix_web::middleware::from_fn;
use actix_web::{web, App, HttpServer};
use ra_api::configure_routes;
use ra_api::handlers::AppState;
use ra_api::middleware::{lowercase_query, standard_middleware};
use ra_config::{AppConfig, DatabaseConfig, LogConfig, StorageBackend};
use ra_core::service::AdService;
use ra_core::traits::AdRepo;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Feature-gated imports
#[cfg(feature = "db-memory")]
use ra_db_memory::MemoryAdRepo;

#[cfg(feature = "db-sqlite")]
use ra_db_sqlite::SqliteAdRepo;
#[cfg(feature = "db-sqlite")]
use secrecy::ExposeSecret;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.log);

    // 1. Initialize the selected storage backend
    let repo = build_repo(&config.database).await?;
    let ads = AdService::new(repo);

    // 2. Wrap in AppState (dynamic dispatch over the storage port)
    let state = web::Data::new(AppState { ads: ads.clone() });

    let (host, port) = config.bind_address();
    info!(%host, port, backend = ?config.database.backend, "Rusty-Ads starting");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(from_fn(lowercase_query))
            .wrap(standard_middleware())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    // 3. Release storage once the server has drained
    ads.close().await?;
    info!("Rusty-Ads stopped");
    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn build_repo(database: &DatabaseConfig) -> anyhow::Result<Arc<dyn AdRepo>> {
    match database.backend {
        #[cfg(feature = "db-memory")]
        StorageBackend::Memory => Ok(Arc::new(MemoryAdRepo::new())),

        #[cfg(feature = "db-sqlite")]
        StorageBackend::Sqlite => {
            let repo =
                SqliteAdRepo::new(database.url.expose_secret(), database.max_connections).await?;
            Ok(Arc::new(repo))
        }

        #[allow(unreachable_patterns)]
        other => anyhow::bail!("storage backend {other:?} is not compiled into this binary"),
    }
}
