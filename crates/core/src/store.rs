use async_trait::async_trait;

use crate::{errors::BookingResult, models::Reservation};

/// Append-only persistence of reservations.
///
/// Implementations keep insertion order and never deduplicate. `list_all`
/// treats missing or unreadable content as an empty list rather than an error;
/// only failures to reach the backing storage itself are reported.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Adds `reservation` after every record already stored.
    async fn append(&self, reservation: Reservation) -> BookingResult<()>;

    /// Returns every stored reservation in insertion order.
    async fn list_all(&self) -> BookingResult<Vec<Reservation>>;
}
