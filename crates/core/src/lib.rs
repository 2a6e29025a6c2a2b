//! # SlotBook Core
//!
//! Domain types and logic for booking a consultation slot: the deterministic
//! availability calendars, the booking wizard state machine and the
//! reservation store contract that persistence backends implement.

pub mod availability;
pub mod clock;
pub mod errors;
pub mod models;
pub mod settings;
pub mod store;
pub mod wizard;
