use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use slotbook_api::routes::health::{HealthResponse, VersionResponse};
use slotbook_core::{errors::BookingError, settings::BookingSettings};
use slotbook_db::mock::MockReservations;

use crate::common::{server_with_store, TestContext};

#[tokio::test]
async fn test_health_ok() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.store, "ok");
}

#[test_log::test(tokio::test)]
async fn test_health_degraded_when_store_fails() {
    let mut store = MockReservations::new();
    store
        .expect_list_all()
        .returning(|| Err(BookingError::Storage(eyre::eyre!("connection refused"))));
    let server = server_with_store(Arc::new(store), BookingSettings::immediate());

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "degraded");
}

#[tokio::test]
async fn test_version() {
    let ctx = TestContext::new();

    let version: VersionResponse = ctx.server.get("/version").await.json();

    assert_eq!(version.version, env!("CARGO_PKG_VERSION"));
}
