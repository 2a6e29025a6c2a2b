use async_trait::async_trait;
use mockall::mock;
use slotbook_core::{errors::BookingResult, models::Reservation, store::ReservationStore};

// Mock store for exercising failure paths in tests
mock! {
    pub Reservations {}

    #[async_trait]
    impl ReservationStore for Reservations {
        async fn append(&self, reservation: Reservation) -> BookingResult<()>;
        async fn list_all(&self) -> BookingResult<Vec<Reservation>>;
    }
}
