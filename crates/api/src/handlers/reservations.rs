use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use slotbook_core::models::Reservation;

use crate::{middleware::error_handling::AppError, ApiState};

/// A stored reservation as listed on the "my bookings" page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationView {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub status_label: String,
}

impl From<Reservation> for ReservationView {
    fn from(reservation: Reservation) -> Self {
        let status_label = reservation.status.label().to_string();
        Self {
            reservation,
            status_label,
        }
    }
}

/// Lists every stored reservation in booking order
///
/// ```text
/// GET /api/reservations
/// ```
#[axum::debug_handler]
pub async fn list_reservations(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ReservationView>>, AppError> {
    let reservations = state.store.list_all().await?;
    Ok(Json(reservations.into_iter().map(ReservationView::from).collect()))
}
