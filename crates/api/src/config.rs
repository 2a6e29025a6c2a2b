//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the SlotBook API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `DATABASE_URL`: PostgreSQL connection string; when set, reservations are stored there
//! - `SLOTBOOK_STORE_DIR`: Directory of the reservation slot file (default: "./data")
//! - `SLOTBOOK_STORE_SLOT`: Name of the reservation slot (default: "reservations")
//! - `SLOTBOOK_WINDOW_DAYS`: Days offered by the calendar (default: 30)
//! - `SLOTBOOK_PRICE`: Price stamped on new reservations (default: 50)
//! - `SLOTBOOK_SUBMIT_DELAY_MS`: Simulated processing delay on confirm (default: 2000)
//! - `SLOTBOOK_SESSION_IDLE_MINUTES`: Idle time before a wizard session is dropped (default: 60)
//! - `SLOTBOOK_MAX_SESSIONS`: Most wizard sessions kept open at once (default: 10000)

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use eyre::{eyre, Result, WrapErr};
use slotbook_core::settings::BookingSettings;
use slotbook_db::json_slot::DEFAULT_SLOT;
use tracing::Level;

use crate::SessionLimits;

/// Where confirmed reservations are persisted
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// The `reservations` table of a PostgreSQL database
    Postgres { database_url: String },

    /// A single named JSON slot inside a directory
    JsonSlot { dir: PathBuf, slot: String },
}

/// Configuration for the SlotBook API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use slotbook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Reservation persistence backend
    pub store: StoreBackend,

    /// Values used by the availability calendar and the booking wizard
    pub booking: BookingSettings,

    /// Expiry and cap for open wizard sessions
    pub sessions: SessionLimits,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a new ApiConfig reading each variable through `lookup`
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The API_PORT value cannot be parsed as a u16
    /// - A SLOTBOOK_* numeric value cannot be parsed
    /// - SLOTBOOK_WINDOW_DAYS or SLOTBOOK_MAX_SESSIONS is zero
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "API_PORT", 3000u16)?;

        // Logging settings
        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(30);

        // Storage settings
        let store = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(database_url) => StoreBackend::Postgres { database_url },
            None => StoreBackend::JsonSlot {
                dir: PathBuf::from(
                    lookup("SLOTBOOK_STORE_DIR").unwrap_or_else(|| "./data".to_string()),
                ),
                slot: lookup("SLOTBOOK_STORE_SLOT").unwrap_or_else(|| DEFAULT_SLOT.to_string()),
            },
        };

        // Booking settings
        let defaults = BookingSettings::default();
        let window_days = parse_or(&lookup, "SLOTBOOK_WINDOW_DAYS", defaults.window_days)?;
        if window_days == 0 {
            return Err(eyre!("SLOTBOOK_WINDOW_DAYS must be at least 1"));
        }
        let price = parse_or(&lookup, "SLOTBOOK_PRICE", defaults.price)?;
        let submit_delay_ms = parse_or(
            &lookup,
            "SLOTBOOK_SUBMIT_DELAY_MS",
            defaults.submit_delay.as_millis() as u64,
        )?;

        let booking = BookingSettings {
            window_days,
            price,
            submit_delay: Duration::from_millis(submit_delay_ms),
            ..defaults
        };

        // Session settings
        let session_defaults = SessionLimits::default();
        let idle_minutes = parse_or(
            &lookup,
            "SLOTBOOK_SESSION_IDLE_MINUTES",
            session_defaults.idle_ttl.num_minutes() as u32,
        )?;
        let max_open = parse_or(&lookup, "SLOTBOOK_MAX_SESSIONS", session_defaults.max_open)?;
        if max_open == 0 {
            return Err(eyre!("SLOTBOOK_MAX_SESSIONS must be at least 1"));
        }
        let sessions = SessionLimits {
            idle_ttl: chrono::Duration::minutes(i64::from(idle_minutes)),
            max_open,
        };

        Ok(Self {
            host,
            port,
            log_level,
            cors_origins,
            request_timeout,
            store,
            booking,
            sessions,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid {} value", key)),
        None => Ok(default),
    }
}
