mod api;
mod app;
mod auth;
mod config;
mod db;
mod domain;
mod error;
mod logging;
mod middleware;
mod routes;
mod services;

use anyhow::Result;
use std::sync::Arc;

use auth::TokenVerifier;
use db::Database;
use services::PgProfileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env)?;

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting profile backend"
    );

    // Connections are opened per request; nothing is dialed until the first call
    let database = Database::new(&settings.database_url, settings.database_timeout)?;

    if settings.database_run_migrations {
        database.run_migrations().await?;
    }

    let verifier = TokenVerifier::new(&settings.supabase_jwt_secret);
    let profiles = Arc::new(PgProfileStore::new(database));

    // Create application state
    let state = app::AppState::new(settings.clone(), verifier, profiles);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
