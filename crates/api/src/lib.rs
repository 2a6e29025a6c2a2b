//! # SlotBook API
//!
//! The API crate provides the web server for the SlotBook booking flow. It
//! exposes the availability calendars, drives booking wizard sessions and
//! lists the stored reservations.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into calendar lookups and wizard steps
//! - **Middleware**: Map booking errors to HTTP responses
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Reservations go through the
//! [`ReservationStore`] trait, backed by PostgreSQL or a JSON slot file.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement the booking flow
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{http::HeaderValue, Router};
use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};
use slotbook_core::{
    clock::{Clock, SystemClock},
    settings::BookingSettings,
    store::ReservationStore,
    wizard::BookingWizard,
};
use slotbook_db::{schema::initialize_database, JsonSlotStore, PgReservationStore};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use crate::config::{ApiConfig, StoreBackend};

/// How long idle wizard sessions are kept and how many may be open at once
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionLimits {
    /// Sessions untouched for longer than this are dropped
    pub idle_ttl: chrono::Duration,

    /// Opening a session beyond this count evicts the least recently used one
    pub max_open: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_ttl: chrono::Duration::minutes(60),
            max_open: 10_000,
        }
    }
}

/// An open wizard and the last time a request touched it
#[derive(Debug)]
pub struct WizardSession {
    pub wizard: BookingWizard,
    pub touched_at: DateTime<Utc>,
}

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Where confirmed reservations are appended
    pub store: Arc<dyn ReservationStore>,

    /// Source of "today" for the calendar and of reservation ids
    pub clock: Arc<dyn Clock>,

    /// Price, labels, window size and submission delay
    pub settings: BookingSettings,

    /// Open wizard sessions by id
    pub wizards: Mutex<HashMap<Uuid, WizardSession>>,

    pub session_limits: SessionLimits,
}

impl ApiState {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        clock: Arc<dyn Clock>,
        settings: BookingSettings,
    ) -> Self {
        Self {
            store,
            clock,
            settings,
            wizards: Mutex::new(HashMap::new()),
            session_limits: SessionLimits::default(),
        }
    }

    pub fn with_session_limits(mut self, limits: SessionLimits) -> Self {
        self.session_limits = limits;
        self
    }
}

/// Opens the reservation store selected by the configuration
///
/// For PostgreSQL this also creates the schema when it is missing.
pub async fn connect_store(backend: &StoreBackend) -> Result<Arc<dyn ReservationStore>> {
    match backend {
        StoreBackend::Postgres { database_url } => {
            let pool = slotbook_db::create_pool(database_url)
                .await
                .wrap_err("Failed to connect to the reservation database")?;
            initialize_database(&pool).await?;
            info!("Storing reservations in PostgreSQL");
            Ok(Arc::new(PgReservationStore::new(pool)))
        }
        StoreBackend::JsonSlot { dir, slot } => {
            let store = JsonSlotStore::new(dir, slot);
            info!("Storing reservations in {}", store.path().display());
            Ok(Arc::new(store))
        }
    }
}

/// Builds the application router with all routes attached to `state`
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Calendar endpoints
        .merge(routes::availability::routes())
        // Booking wizard sessions
        .merge(routes::wizard::routes())
        // "My bookings" listing
        .merge(routes::reservations::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and reservation store
///
/// This function initializes logging, configures routes and middleware, and
/// serves HTTP until the process stops.
pub async fn start_server(config: ApiConfig, store: Arc<dyn ReservationStore>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(
        ApiState::new(store, Arc::new(SystemClock), config.booking.clone())
            .with_session_limits(config.sessions),
    );

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| {
                origin
                    .parse()
                    .wrap_err_with(|| format!("Invalid CORS origin {}", origin))
            })
            .collect::<Result<Vec<HeaderValue>>>()?;

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request tracing and timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
