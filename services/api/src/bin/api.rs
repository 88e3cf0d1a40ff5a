//! services/api/src/bin/api.rs

use std::sync::Arc;

use api_lib::{
    adapters::{DbAdapter, InMemoryStore},
    auth::bootstrap_admin,
    config::Config,
    error::ApiError,
    web::{router, state::AppState},
};
use course_platform_core::CoursePlatformStore;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Connects the store selected by `DATABASE_URL` and brings its schema up to date.
async fn connect_store(config: &Config) -> Result<Arc<dyn CoursePlatformStore>, ApiError> {
    if config.uses_memory_store() {
        info!("Using the in-memory store. Data will not survive a restart.");
        return Ok(Arc::new(InMemoryStore::new()));
    }

    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    let db_adapter = DbAdapter::new(db_pool);
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");
    Ok(Arc::new(db_adapter))
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect the Store ---
    let store = connect_store(&config).await?;

    // --- 3. Create the Bootstrap Administrator ---
    if let Some(admin) = &config.admin_bootstrap {
        bootstrap_admin(store.as_ref(), admin).await?;
    }

    // --- 4. Build the Shared AppState and the Router ---
    let bind_address = config.bind_address;
    let app_state = Arc::new(AppState::new(store, config));
    let app = router(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
