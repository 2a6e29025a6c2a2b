//! Reservation store backed by a single named slot on disk.
//!
//! The slot is one JSON file, `<dir>/<slot>.json`, holding the whole ordered
//! list. Every append rewrites the full list. Appends from this process are
//! serialized; separate processes sharing the directory can still race and
//! drop each other's writes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use eyre::WrapErr;
use slotbook_core::{errors::BookingResult, models::Reservation, store::ReservationStore};
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const DEFAULT_SLOT: &str = "reservations";

#[derive(Debug)]
pub struct JsonSlotStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonSlotStore {
    pub fn new(dir: impl AsRef<Path>, slot: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{slot}.json")),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the slot. Absent or malformed content reads as an empty list.
    async fn read_slot(&self) -> eyre::Result<Vec<Reservation>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .wrap_err_with(|| format!("Failed to read {}", self.path.display()));
            }
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        // Bytes that are not UTF-8 fail here too.
        match serde_json::from_slice(&raw) {
            Ok(reservations) => Ok(reservations),
            Err(err) => {
                warn!(
                    "Ignoring malformed reservation slot {}: {}",
                    self.path.display(),
                    err
                );
                Ok(Vec::new())
            }
        }
    }

    async fn write_slot(&self, reservations: &[Reservation]) -> eyre::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }

        let body = serde_json::to_vec(reservations).wrap_err("Failed to encode reservations")?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, body)
            .await
            .wrap_err_with(|| format!("Failed to write {}", staging.display()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .wrap_err_with(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}

#[async_trait]
impl ReservationStore for JsonSlotStore {
    async fn append(&self, reservation: Reservation) -> BookingResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut reservations = self.read_slot().await?;
        reservations.push(reservation);
        self.write_slot(&reservations).await?;

        debug!(
            "Appended reservation to {} ({} total)",
            self.path.display(),
            reservations.len()
        );
        Ok(())
    }

    async fn list_all(&self) -> BookingResult<Vec<Reservation>> {
        Ok(self.read_slot().await?)
    }
}
