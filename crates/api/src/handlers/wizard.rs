//! # Booking Wizard Handlers
//!
//! Each wizard session lives in [`ApiState::wizards`] under its own id. The
//! handlers translate requests into wizard steps and return the resulting
//! state, so a client renders whatever step the session is on.
//!
//! Confirmation never holds the session lock across the processing delay:
//! the session is moved to `Submitting` under the lock, the reservation is
//! stored without it, and the outcome is settled under the lock again. A
//! second confirm arriving in between sees `Submitting` and gets a 409.
//! Storing and settling run on a spawned task, so a request that is dropped
//! mid-way still leaves the session in `Done` or `Confirming`.
//!
//! Sessions idle for longer than [`SessionLimits::idle_ttl`] are dropped, and
//! opening a session beyond [`SessionLimits::max_open`] evicts the least
//! recently used one. A session that is submitting is never dropped.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use slotbook_core::{
    availability,
    errors::BookingError,
    models::Reservation,
    wizard::{self, BookingWizard, WizardState},
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState, SessionLimits, WizardSession};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub state: WizardState,
}

impl WizardResponse {
    fn new(id: Uuid, state: &WizardState) -> Self {
        Self {
            id,
            state: state.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectDayRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectTimeRequest {
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmResponse {
    pub id: Uuid,
    pub reservation: Reservation,
    /// Confirmation notice for the user
    pub summary: String,
}

fn is_submitting(session: &WizardSession) -> bool {
    matches!(session.wizard.state(), WizardState::Submitting { .. })
}

fn is_expired(session: &WizardSession, now: DateTime<Utc>, limits: &SessionLimits) -> bool {
    !is_submitting(session) && now - session.touched_at > limits.idle_ttl
}

/// Looks up a live session and marks it as used
fn session_mut<'a>(
    state: &ApiState,
    wizards: &'a mut HashMap<Uuid, WizardSession>,
    id: Uuid,
) -> Result<&'a mut BookingWizard, BookingError> {
    let now = state.clock.now();
    if wizards
        .get(&id)
        .is_some_and(|session| is_expired(session, now, &state.session_limits))
    {
        wizards.remove(&id);
        debug!("Dropped idle booking wizard {}", id);
    }

    let session = wizards
        .get_mut(&id)
        .ok_or_else(|| BookingError::NotFound(format!("Booking wizard with ID {} not found", id)))?;
    session.touched_at = now;
    Ok(&mut session.wizard)
}

/// Drops idle sessions, then evicts the least recently used ones until there
/// is room for one more.
fn prune_sessions(state: &ApiState, wizards: &mut HashMap<Uuid, WizardSession>) {
    let now = state.clock.now();
    let limits = &state.session_limits;
    wizards.retain(|_, session| !is_expired(session, now, limits));

    while wizards.len() >= limits.max_open {
        let oldest = wizards
            .iter()
            .filter(|(_, session)| !is_submitting(session))
            .min_by_key(|(_, session)| session.touched_at)
            .map(|(id, _)| *id);
        match oldest {
            Some(id) => {
                wizards.remove(&id);
                debug!("Evicted booking wizard {} to make room", id);
            }
            None => break,
        }
    }
}

/// Opens a new wizard session on the day picker
///
/// ```text
/// POST /api/wizards
/// ```
#[axum::debug_handler]
pub async fn create_wizard(
    State(state): State<Arc<ApiState>>,
) -> (StatusCode, Json<WizardResponse>) {
    let id = Uuid::new_v4();
    let wizard = BookingWizard::new()
        .on_date(move |date| info!("Wizard {} confirmed date {}", id, date))
        .on_time(move |time| info!("Wizard {} confirmed time {}", id, time));
    let response = WizardResponse::new(id, wizard.state());

    let mut wizards = state.wizards.lock().await;
    prune_sessions(&state, &mut wizards);
    wizards.insert(
        id,
        WizardSession {
            wizard,
            touched_at: state.clock.now(),
        },
    );
    debug!("Opened booking wizard {} ({} open)", id, wizards.len());

    (StatusCode::CREATED, Json(response))
}

/// Returns the current step of a session
#[axum::debug_handler]
pub async fn get_wizard(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let mut wizards = state.wizards.lock().await;
    let wizard = session_mut(&state, &mut wizards, id)?;
    Ok(Json(WizardResponse::new(id, wizard.state())))
}

/// Picks a day of the current window
///
/// The day is looked up in the window generated from the server clock, so a
/// client cannot book a day the calendar shows as past or unavailable.
///
/// # Errors
///
/// * `BookingError::NotFound` - unknown session
/// * `BookingError::Rejected` - day outside the window, past or unavailable
/// * `BookingError::InvalidTransition` - session is not picking a day
#[axum::debug_handler]
pub async fn select_day(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectDayRequest>,
) -> Result<Json<WizardResponse>, AppError> {
    let day = availability::find_day(payload.date, state.settings.window_days, state.clock.now())
        .ok_or_else(|| {
            BookingError::Rejected(format!("{} is outside the booking window", payload.date))
        })?;

    let mut wizards = state.wizards.lock().await;
    let wizard = session_mut(&state, &mut wizards, id)?;
    let next = wizard.select_day(&day)?;
    Ok(Json(WizardResponse::new(id, next)))
}

/// Picks one of the fixed time slots
#[axum::debug_handler]
pub async fn select_time(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectTimeRequest>,
) -> Result<Json<WizardResponse>, AppError> {
    let slot = availability::find_time_slot(&payload.time).ok_or_else(|| {
        BookingError::Rejected(format!("{} is not a bookable time", payload.time))
    })?;

    let mut wizards = state.wizards.lock().await;
    let wizard = session_mut(&state, &mut wizards, id)?;
    let next = wizard.select_time(&slot)?;
    Ok(Json(WizardResponse::new(id, next)))
}

/// Returns from the confirmation step to the time picker
#[axum::debug_handler]
pub async fn back(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let mut wizards = state.wizards.lock().await;
    let wizard = session_mut(&state, &mut wizards, id)?;
    let next = wizard.back()?;
    Ok(Json(WizardResponse::new(id, next)))
}

/// Clears the selections and returns to the day picker
#[axum::debug_handler]
pub async fn reset(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let mut wizards = state.wizards.lock().await;
    let wizard = session_mut(&state, &mut wizards, id)?;
    let next = wizard.reset()?;
    Ok(Json(WizardResponse::new(id, next)))
}

/// Clears the notice left by a failed confirmation
#[axum::debug_handler]
pub async fn dismiss_notice(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let mut wizards = state.wizards.lock().await;
    let wizard = session_mut(&state, &mut wizards, id)?;
    let next = wizard.dismiss_notice()?;
    Ok(Json(WizardResponse::new(id, next)))
}

/// Confirms the selected day and time and stores the reservation
///
/// # Errors
///
/// * `BookingError::SubmissionInProgress` - the session is already submitting
/// * `BookingError::InvalidTransition` - nothing to confirm yet
/// * `BookingError::Storage` - the reservation could not be stored; the
///   session is back on the confirmation step with a notice
/// * `BookingError::Internal` - the submission task panicked
#[axum::debug_handler]
pub async fn confirm(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConfirmResponse>, AppError> {
    let selection = {
        let mut wizards = state.wizards.lock().await;
        session_mut(&state, &mut wizards, id)?.begin_submit()?
    };

    let task_state = Arc::clone(&state);
    let settling = tokio::spawn(async move {
        let outcome = wizard::submit(
            selection,
            task_state.store.as_ref(),
            task_state.clock.as_ref(),
            &task_state.settings,
        )
        .await;

        let mut wizards = task_state.wizards.lock().await;
        session_mut(&task_state, &mut wizards, id)?.settle(outcome)
    });

    let reservation = settling
        .await
        .map_err(|err| BookingError::Internal(Box::new(err)))??;

    let summary = reservation.summary(state.settings.session_minutes);
    Ok(Json(ConfirmResponse {
        id,
        reservation,
        summary,
    }))
}
