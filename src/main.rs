use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use mentorbook_api::{config::ApiConfig, ApiState};
use mentorbook_db::{create_pool, schema::initialize_database};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Initialize logging
    mentorbook_api::init_tracing(config.log_level)?;

    let state = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = create_pool(database_url, config.database_max_connections).await?;

            // Initialize database schema
            initialize_database(&db_pool).await?;

            ApiState::with_postgres(db_pool)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory storage");
            ApiState::in_memory()
        }
    };

    // Start API server
    mentorbook_api::start_server(config, Arc::new(state)).await?;

    Ok(())
}
