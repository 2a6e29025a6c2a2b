use chrono::{DateTime, NaiveDate, Utc};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use slotbook_core::models::{Reservation, ReservationStatus};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservation {
    pub seq: i64,
    pub id: String,
    pub counterparty_name: String,
    pub counterparty_role: String,
    pub counterparty_avatar_ref: String,
    pub date: NaiveDate,
    pub time: String,
    pub price: f64,
    pub status: String,
    pub service_label: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbReservation> for Reservation {
    type Error = eyre::Report;

    fn try_from(row: DbReservation) -> Result<Self> {
        let status = ReservationStatus::parse(&row.status)
            .ok_or_else(|| eyre!("Unknown reservation status '{}'", row.status))?;

        Ok(Reservation {
            id: row.id,
            counterparty_name: row.counterparty_name,
            counterparty_role: row.counterparty_role,
            counterparty_avatar_ref: row.counterparty_avatar_ref,
            date: row.date,
            time: row.time,
            price: row.price,
            status,
            service_label: row.service_label,
        })
    }
}
