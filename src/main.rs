//! `BillMate` server binary: wires configuration, database, and HTTP router.

use billmate::{api, config};
use billmate::errors::Result;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load application settings
    let settings = config::Settings::from_env()?;

    // 4. Initialize the database and create tables from the entity schema
    let db = config::database::connect(&settings.database_url).await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 5. Serve the HTTP API
    let app = api::router(api::AppState::new(db));
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("Listening on {}", settings.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
