use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Insertion order is carried by seq; ids are not unique
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            seq BIGSERIAL PRIMARY KEY,
            id VARCHAR(64) NOT NULL,
            counterparty_name VARCHAR(255) NOT NULL,
            counterparty_role VARCHAR(255) NOT NULL,
            counterparty_avatar_ref VARCHAR(1024) NOT NULL,
            date DATE NOT NULL,
            time VARCHAR(5) NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            service_label VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_reservations_date ON reservations(date);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
