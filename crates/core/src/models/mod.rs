pub mod day_slot;
pub mod reservation;
pub mod time_slot;

pub use day_slot::DaySlot;
pub use reservation::{Reservation, ReservationStatus};
pub use time_slot::TimeSlot;
