use color_eyre::eyre::Result;
use dotenv::dotenv;
use slotbook_api::config::ApiConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Open the reservation store (PostgreSQL when DATABASE_URL is set)
    let store = slotbook_api::connect_store(&config.store).await?;

    // Start API server
    slotbook_api::start_server(config, store).await?;

    Ok(())
}
