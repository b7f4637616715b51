use std::{path::Path, sync::Arc};

use anyhow::Context;
use migration::MigratorTrait;
use poem::{
    EndpointExt, Route, Server,
    endpoint::StaticFilesEndpoint,
    listener::TcpListener,
    middleware::{Cors, Tracing as PoemTracing},
};
use poem_openapi::OpenApiService;
use sea_orm::Database;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};

use libris::accent::AccentColorExtractor;
use libris::config::Config;
use libris::library_api::LibraryApi;
use libris::library_api::services::auth::SessionStore;
use libris::storage::FsObjectStorage;

type LibrisResult<T> = anyhow::Result<T>;

#[tokio::main]
async fn main() -> LibrisResult<()> {
    // Initialize tracing (logs). Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,poem=info,reqwest=warn,h2=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting libris");

    // Load environment variables from .env files
    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load();
    match config.validate() {
        Ok(_) => {}
        Err(e) => {
            return Err(anyhow::anyhow!(e));
        }
    }

    let db_conn = Database::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to connect to database")?;

    migration::Migrator::up(&db_conn, None)
        .await
        .with_context(|| "Failed to run database migrations")?;

    tracing::info!(
        storage_root = %config.storage_root.display(),
        public_base = %config.public_base_url,
        "configured object storage"
    );

    run_poem(Arc::new(config), Arc::new(db_conn)).await?;
    Ok(())
}

pub async fn run_poem(
    config: Arc<Config>,
    db: Arc<sea_orm::DatabaseConnection>,
) -> LibrisResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let storage_root = config.storage_root.clone();
    let api = LibraryApi {
        db,
        storage: Arc::new(FsObjectStorage::new(
            &storage_root,
            &config.public_base_url,
        )),
        sessions: Arc::new(SessionStore::new()),
        extractor: Arc::new(AccentColorExtractor::new()),
        config,
    };
    let api_service =
        OpenApiService::new(api, "Libris API", version).server("http://localhost:3000");
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    let route = Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .nest("/files", StaticFilesEndpoint::new(storage_root))
        .with(Cors::new())
        .with(PoemTracing);

    let bind_addr = "0.0.0.0:3000";
    tracing::info!(%bind_addr, "starting HTTP server");
    Server::new(TcpListener::bind(bind_addr)).run(route).await?;
    Ok(())
}
