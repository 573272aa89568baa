use dotenvy::dotenv;
use habitude::auth::LocalIdentity;
use habitude::blob::FsBlobStore;
use habitude::config::{database, settings};
use habitude::errors::Result;
use habitude::store::{HabitStore, UserStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = settings::load_or_default("habitude.toml")?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database and ensure the schema exists
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema ensured."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Construct the shared services, held alive until shutdown
    let _habits = Arc::new(HabitStore::new(db.clone()));
    let _users = Arc::new(UserStore::new(db.clone()));
    let _blobs = Arc::new(FsBlobStore::new(&app_config.blob_root));
    let _identity = Arc::new(LocalIdentity::new());

    info!("Habitude core ready; press Ctrl-C to shut down.");

    // 6. Run until interrupted
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting.");

    Ok(())
}
