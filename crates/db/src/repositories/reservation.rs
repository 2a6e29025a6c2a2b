use async_trait::async_trait;
use chrono::Utc;
use eyre::Result;
use slotbook_core::{errors::BookingResult, models::Reservation, store::ReservationStore};
use sqlx::{Pool, Postgres};
use tracing::warn;

use crate::models::DbReservation;

pub async fn insert_reservation(
    pool: &Pool<Postgres>,
    reservation: &Reservation,
) -> Result<DbReservation> {
    let now = Utc::now();

    tracing::debug!(
        "Inserting reservation: id={}, date={}, time={}",
        reservation.id, reservation.date, reservation.time
    );

    let row = sqlx::query_as::<_, DbReservation>(
        r#"
        INSERT INTO reservations (
            id, counterparty_name, counterparty_role, counterparty_avatar_ref,
            date, time, price, status, service_label, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING seq, id, counterparty_name, counterparty_role, counterparty_avatar_ref,
                  date, time, price, status, service_label, created_at
        "#,
    )
    .bind(&reservation.id)
    .bind(&reservation.counterparty_name)
    .bind(&reservation.counterparty_role)
    .bind(&reservation.counterparty_avatar_ref)
    .bind(reservation.date)
    .bind(&reservation.time)
    .bind(reservation.price)
    .bind(reservation.status.as_str())
    .bind(&reservation.service_label)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn list_reservations(pool: &Pool<Postgres>) -> Result<Vec<DbReservation>> {
    let rows = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT seq, id, counterparty_name, counterparty_role, counterparty_avatar_ref,
               date, time, price, status, service_label, created_at
        FROM reservations
        ORDER BY seq ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Reservation store backed by the `reservations` table.
#[derive(Debug, Clone)]
pub struct PgReservationStore {
    pool: Pool<Postgres>,
}

impl PgReservationStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn append(&self, reservation: Reservation) -> BookingResult<()> {
        insert_reservation(&self.pool, &reservation).await?;
        Ok(())
    }

    async fn list_all(&self) -> BookingResult<Vec<Reservation>> {
        let rows = list_reservations(&self.pool).await?;

        // Rows that no longer decode are skipped, like a malformed slot
        let reservations = rows
            .into_iter()
            .filter_map(|row| {
                let seq = row.seq;
                Reservation::try_from(row)
                    .map_err(|err| warn!("Skipping reservation row {}: {}", seq, err))
                    .ok()
            })
            .collect();

        Ok(reservations)
    }
}
