//! # Booking Wizard
//!
//! The wizard walks a user from a day, to a time, to a confirmed reservation.
//! Its progress is an explicit [`WizardState`] value and every step is a pure
//! [`transition`], so the flow can be driven and tested without any view.
//!
//! ```text
//! PickingDay --select_day--> PickingTime --select_time--> Confirming
//!     ^                           |                         |   ^
//!     +-----------reset-----------+                    submit   | failed
//!     ^                           ^---------back------------+   |
//!     |                                                     v   |
//!     +------------------reset------------------ Done <--- Submitting
//! ```
//!
//! While `Submitting`, another submit is refused with
//! [`BookingError::SubmissionInProgress`], which keeps a double click from
//! storing the same booking twice. A failed append returns the wizard to
//! `Confirming` with its selections and a notice, ready to retry.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    errors::{BookingError, BookingResult},
    models::{DaySlot, Reservation, TimeSlot},
    settings::BookingSettings,
    store::ReservationStore,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum WizardState {
    PickingDay,
    PickingTime {
        date: NaiveDate,
    },
    Confirming {
        date: NaiveDate,
        time: String,
        /// Dismissable message left by a failed submission
        notice: Option<String>,
    },
    Submitting {
        date: NaiveDate,
        time: String,
    },
    Done {
        reservation: Reservation,
    },
}

impl WizardState {
    pub fn name(&self) -> &'static str {
        match self {
            WizardState::PickingDay => "picking_day",
            WizardState::PickingTime { .. } => "picking_time",
            WizardState::Confirming { .. } => "confirming",
            WizardState::Submitting { .. } => "submitting",
            WizardState::Done { .. } => "done",
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        match self {
            WizardState::PickingDay => None,
            WizardState::PickingTime { date }
            | WizardState::Confirming { date, .. }
            | WizardState::Submitting { date, .. } => Some(*date),
            WizardState::Done { reservation } => Some(reservation.date),
        }
    }

    pub fn selected_time(&self) -> Option<&str> {
        match self {
            WizardState::PickingDay | WizardState::PickingTime { .. } => None,
            WizardState::Confirming { time, .. } | WizardState::Submitting { time, .. } => {
                Some(time)
            }
            WizardState::Done { reservation } => Some(&reservation.time),
        }
    }

    pub fn notice(&self) -> Option<&str> {
        match self {
            WizardState::Confirming { notice, .. } => notice.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    SelectDay(DaySlot),
    SelectTime(TimeSlot),
    Back,
    Reset,
    Submit,
    SubmissionSucceeded(Reservation),
    SubmissionFailed(String),
    DismissNotice,
}

impl WizardEvent {
    fn action(&self) -> &'static str {
        match self {
            WizardEvent::SelectDay(_) => "select a day",
            WizardEvent::SelectTime(_) => "select a time",
            WizardEvent::Back => "go back",
            WizardEvent::Reset => "reset",
            WizardEvent::Submit => "confirm",
            WizardEvent::SubmissionSucceeded(_) | WizardEvent::SubmissionFailed(_) => {
                "settle a submission"
            }
            WizardEvent::DismissNotice => "dismiss the notice",
        }
    }
}

/// Computes the state following `event`. On error the caller keeps `state`.
pub fn transition(state: &WizardState, event: WizardEvent) -> BookingResult<WizardState> {
    let invalid = |event: &WizardEvent| BookingError::InvalidTransition {
        state: state.name(),
        action: event.action(),
    };

    match (state, event) {
        (WizardState::PickingDay, WizardEvent::SelectDay(day)) => {
            if day.is_past {
                return Err(BookingError::Rejected(format!("{} is in the past", day.date)));
            }
            if !day.is_available {
                return Err(BookingError::Rejected(format!("{} is fully booked", day.date)));
            }
            Ok(WizardState::PickingTime { date: day.date })
        }

        (WizardState::PickingTime { date }, WizardEvent::SelectTime(slot)) => {
            if !slot.is_selectable() {
                return Err(BookingError::Rejected(format!(
                    "{} is not available",
                    slot.time
                )));
            }
            Ok(WizardState::Confirming {
                date: *date,
                time: slot.time,
                notice: None,
            })
        }

        (WizardState::Confirming { date, .. }, WizardEvent::Back) => {
            Ok(WizardState::PickingTime { date: *date })
        }

        (WizardState::Submitting { .. }, WizardEvent::Reset | WizardEvent::Submit) => {
            Err(BookingError::SubmissionInProgress)
        }
        (_, WizardEvent::Reset) => Ok(WizardState::PickingDay),

        (WizardState::Confirming { date, time, .. }, WizardEvent::Submit) => {
            Ok(WizardState::Submitting {
                date: *date,
                time: time.clone(),
            })
        }

        (WizardState::Submitting { .. }, WizardEvent::SubmissionSucceeded(reservation)) => {
            Ok(WizardState::Done { reservation })
        }

        (WizardState::Submitting { date, time }, WizardEvent::SubmissionFailed(reason)) => {
            Ok(WizardState::Confirming {
                date: *date,
                time: time.clone(),
                notice: Some(reason),
            })
        }

        (WizardState::Confirming { date, time, .. }, WizardEvent::DismissNotice) => {
            Ok(WizardState::Confirming {
                date: *date,
                time: time.clone(),
                notice: None,
            })
        }
        (_, WizardEvent::DismissNotice) => Ok(state.clone()),

        (_, event) => Err(invalid(&event)),
    }
}

/// The day and time being submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub date: NaiveDate,
    pub time: String,
}

pub type DateCallback = Box<dyn FnMut(NaiveDate) + Send>;
pub type TimeCallback = Box<dyn FnMut(&str) + Send>;

/// A wizard session: the current state plus the caller's completion callbacks.
pub struct BookingWizard {
    state: WizardState,
    on_date: Option<DateCallback>,
    on_time: Option<TimeCallback>,
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BookingWizard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingWizard")
            .field("state", &self.state)
            .field("on_date", &self.on_date.is_some())
            .field("on_time", &self.on_time.is_some())
            .finish()
    }
}

impl BookingWizard {
    pub fn new() -> Self {
        Self {
            state: WizardState::PickingDay,
            on_date: None,
            on_time: None,
        }
    }

    /// Called with the confirmed date once the reservation is stored.
    pub fn on_date(mut self, callback: impl FnMut(NaiveDate) + Send + 'static) -> Self {
        self.on_date = Some(Box::new(callback));
        self
    }

    /// Called with the confirmed "HH:MM" time once the reservation is stored.
    pub fn on_time(mut self, callback: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_time = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    fn apply(&mut self, event: WizardEvent) -> BookingResult<&WizardState> {
        let next = transition(&self.state, event)?;
        debug!("wizard {} -> {}", self.state.name(), next.name());
        self.state = next;
        Ok(&self.state)
    }

    pub fn select_day(&mut self, day: &DaySlot) -> BookingResult<&WizardState> {
        self.apply(WizardEvent::SelectDay(*day))
    }

    pub fn select_time(&mut self, slot: &TimeSlot) -> BookingResult<&WizardState> {
        self.apply(WizardEvent::SelectTime(slot.clone()))
    }

    pub fn back(&mut self) -> BookingResult<&WizardState> {
        self.apply(WizardEvent::Back)
    }

    pub fn reset(&mut self) -> BookingResult<&WizardState> {
        self.apply(WizardEvent::Reset)
    }

    pub fn dismiss_notice(&mut self) -> BookingResult<&WizardState> {
        self.apply(WizardEvent::DismissNotice)
    }

    /// Enters `Submitting` and hands back what must be stored.
    pub fn begin_submit(&mut self) -> BookingResult<Selection> {
        self.apply(WizardEvent::Submit)?;
        match &self.state {
            WizardState::Submitting { date, time } => Ok(Selection {
                date: *date,
                time: time.clone(),
            }),
            other => Err(BookingError::InvalidTransition {
                state: other.name(),
                action: "confirm",
            }),
        }
    }

    /// Records the outcome of a submission started with [`Self::begin_submit`].
    ///
    /// Success moves to `Done` and fires the callbacks. Failure returns to
    /// `Confirming` with a notice and hands the error back to the caller.
    pub fn settle(&mut self, outcome: BookingResult<Reservation>) -> BookingResult<Reservation> {
        match outcome {
            Ok(reservation) => {
                self.apply(WizardEvent::SubmissionSucceeded(reservation.clone()))?;
                if let Some(on_date) = self.on_date.as_mut() {
                    on_date(reservation.date);
                }
                if let Some(on_time) = self.on_time.as_mut() {
                    on_time(&reservation.time);
                }
                Ok(reservation)
            }
            Err(err) => {
                warn!("Booking submission failed: {}", err);
                self.apply(WizardEvent::SubmissionFailed(format!(
                    "Your booking could not be saved, please try again. ({})",
                    err
                )))?;
                Err(err)
            }
        }
    }

    /// Runs the whole confirmation step against `store`.
    pub async fn confirm(
        &mut self,
        store: &dyn ReservationStore,
        clock: &dyn Clock,
        settings: &BookingSettings,
    ) -> BookingResult<Reservation> {
        let selection = self.begin_submit()?;
        let outcome = submit(selection, store, clock, settings).await;
        self.settle(outcome)
    }
}

/// Waits out the processing delay, then appends a pending reservation.
pub async fn submit(
    selection: Selection,
    store: &dyn ReservationStore,
    clock: &dyn Clock,
    settings: &BookingSettings,
) -> BookingResult<Reservation> {
    if !settings.submit_delay.is_zero() {
        tokio::time::sleep(settings.submit_delay).await;
    }

    let id = clock.now().timestamp_millis().to_string();
    let reservation = Reservation::pending(id, selection.date, &selection.time, settings);
    store.append(reservation.clone()).await?;

    info!(
        "Reservation {} stored for {} at {}",
        reservation.id, reservation.date, reservation.time
    );
    Ok(reservation)
}
