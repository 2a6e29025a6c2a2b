use std::time::Duration;

/// Fixed values stamped on every reservation the wizard creates, plus the
/// knobs of the availability window and the simulated submission.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSettings {
    /// Number of consecutive days offered, starting today
    pub window_days: u32,

    /// Price of one session
    pub price: f64,

    /// Length of one session in minutes
    pub session_minutes: u32,

    pub counterparty_name: String,
    pub counterparty_role: String,
    pub counterparty_avatar_ref: String,
    pub service_label: String,

    /// Processing delay applied before the reservation is stored
    pub submit_delay: Duration,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            window_days: 30,
            price: 50.0,
            session_minutes: 30,
            counterparty_name: "Professional".to_string(),
            counterparty_role: "Professional Consultant".to_string(),
            counterparty_avatar_ref: "/favicon.ico".to_string(),
            service_label: "Personalised Consultation".to_string(),
            submit_delay: Duration::from_millis(2000),
        }
    }
}

impl BookingSettings {
    /// Settings with no submission delay, for tests and scripted runs.
    pub fn immediate() -> Self {
        Self {
            submit_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
