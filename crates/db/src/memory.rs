use async_trait::async_trait;
use slotbook_core::{errors::BookingResult, models::Reservation, store::ReservationStore};
use tokio::sync::RwLock;

/// Process-local reservation list, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reservations: RwLock<Vec<Reservation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reservations(reservations: Vec<Reservation>) -> Self {
        Self {
            reservations: RwLock::new(reservations),
        }
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn append(&self, reservation: Reservation) -> BookingResult<()> {
        self.reservations.write().await.push(reservation);
        Ok(())
    }

    async fn list_all(&self) -> BookingResult<Vec<Reservation>> {
        Ok(self.reservations.read().await.clone())
    }
}
