use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::settings::BookingSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// Human readable label used by the "my bookings" listing.
    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Completed => "Completed",
            ReservationStatus::Cancelled => "Cancelled",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ReservationStatus::Pending),
            "confirmed" => Some(ReservationStatus::Confirmed),
            "completed" => Some(ReservationStatus::Completed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }
}

/// A booking record persisted once the wizard completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub counterparty_name: String,
    pub counterparty_role: String,
    pub counterparty_avatar_ref: String,
    pub date: NaiveDate,
    pub time: String,
    pub price: f64,
    pub status: ReservationStatus,
    pub service_label: String,
}

impl Reservation {
    /// Builds the pending reservation created by a confirmed wizard.
    pub fn pending(id: String, date: NaiveDate, time: &str, settings: &BookingSettings) -> Self {
        Self {
            id,
            counterparty_name: settings.counterparty_name.clone(),
            counterparty_role: settings.counterparty_role.clone(),
            counterparty_avatar_ref: settings.counterparty_avatar_ref.clone(),
            date,
            time: time.to_string(),
            price: settings.price,
            status: ReservationStatus::Pending,
            service_label: settings.service_label.clone(),
        }
    }

    /// Text of the notice shown once the request has been sent.
    pub fn summary(&self, session_minutes: u32) -> String {
        format!(
            "Request sent.\n\nDetails:\n- Professional: {}\n- Date: {}\n- Time: {}\n- Price: €{}/{}min\n\nYou will find it under \"My bookings\".",
            self.counterparty_name,
            self.date.format("%a %-d %b"),
            self.time,
            self.price,
            session_minutes,
        )
    }
}
