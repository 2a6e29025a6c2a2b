//! # Availability Handlers
//!
//! Serve the two calendars the booking wizard renders. Days are generated
//! relative to the server clock; time slots are the same for every day.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use slotbook_core::{
    availability,
    errors::BookingError,
    models::{DaySlot, TimeSlot},
};

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the day calendar
#[derive(Debug, Default, Deserialize)]
pub struct DaysQuery {
    /// Number of days to list; defaults to and may not exceed the configured
    /// window, so every listed day can also be picked in a wizard
    pub window: Option<u32>,
}

/// Lists the bookable window of days starting today
///
/// # Endpoint
///
/// ```text
/// GET /api/availability/days?window=30
/// ```
///
/// # Errors
///
/// * `BookingError::Validation` - window of zero days or longer than the
///   configured booking window
#[axum::debug_handler]
pub async fn list_days(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DaysQuery>,
) -> Result<Json<Vec<DaySlot>>, AppError> {
    let max_window = state.settings.window_days;
    let window = query.window.unwrap_or(max_window);
    if window == 0 || window > max_window {
        return Err(AppError(BookingError::Validation(format!(
            "window must be between 1 and {} days",
            max_window
        ))));
    }

    let days = availability::list_upcoming_days(window, state.clock.now());
    Ok(Json(days))
}

/// Lists the half-hour slots offered on any day
///
/// ```text
/// GET /api/availability/times
/// ```
pub async fn list_times() -> Json<Vec<TimeSlot>> {
    Json(availability::list_time_slots())
}
