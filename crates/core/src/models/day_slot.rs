use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of the booking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlot {
    pub date: NaiveDate,
    pub is_past: bool,
    pub is_available: bool,
}

impl DaySlot {
    /// Past days are never selectable, whatever their availability.
    pub fn is_selectable(&self) -> bool {
        !self.is_past && self.is_available
    }
}
