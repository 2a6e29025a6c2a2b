use serde::{Deserialize, Serialize};

/// One bookable half-hour window, keyed by its "HH:MM" start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: String,
    pub is_available: bool,
}

impl TimeSlot {
    pub fn is_selectable(&self) -> bool {
        self.is_available
    }
}
