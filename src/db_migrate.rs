use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use slotbook_db::schema::initialize_database;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load environment variables
    dotenv().ok();

    // The JSON slot store needs no schema, so only PostgreSQL is migrated
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| eyre!("DATABASE_URL must be set to migrate the reservation database"))?;

    info!("Connecting to database...");
    let db_pool = slotbook_db::create_pool(&database_url).await?;

    initialize_database(&db_pool).await?;
    info!("Reservation schema is up to date.");

    Ok(())
}
