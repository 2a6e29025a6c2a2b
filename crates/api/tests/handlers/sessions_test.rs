use std::{future::IntoFuture, sync::Arc, time::Duration};

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use slotbook_api::{handlers::wizard::WizardResponse, ApiState, SessionLimits};
use slotbook_core::settings::BookingSettings;
use slotbook_db::MemoryStore;
use uuid::Uuid;

use crate::common::{server_with_state, SteppingClock};

fn limits(idle_minutes: i64, max_open: usize) -> SessionLimits {
    SessionLimits {
        idle_ttl: chrono::Duration::minutes(idle_minutes),
        max_open,
    }
}

fn stepping_server(
    clock: Arc<SteppingClock>,
    settings: BookingSettings,
    limits: SessionLimits,
) -> axum_test::TestServer {
    let state = ApiState::new(Arc::new(MemoryStore::new()), clock, settings)
        .with_session_limits(limits);
    server_with_state(state)
}

async fn open(server: &axum_test::TestServer) -> Uuid {
    let wizard: WizardResponse = server.post("/api/wizards").await.json();
    wizard.id
}

async fn status_of(server: &axum_test::TestServer, id: Uuid) -> StatusCode {
    server.get(&format!("/api/wizards/{}", id)).await.status_code()
}

#[tokio::test]
async fn test_idle_session_expires() {
    let clock = Arc::new(SteppingClock::new());
    let server = stepping_server(clock.clone(), BookingSettings::immediate(), limits(10, 100));
    let id = open(&server).await;

    clock.advance(chrono::Duration::minutes(5));
    assert_eq!(status_of(&server, id).await, StatusCode::OK);

    // Each request restarts the idle timer.
    clock.advance(chrono::Duration::minutes(8));
    assert_eq!(status_of(&server, id).await, StatusCode::OK);

    clock.advance(chrono::Duration::minutes(11));
    assert_eq!(status_of(&server, id).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_sessions_are_swept_on_open() {
    let clock = Arc::new(SteppingClock::new());
    let server = stepping_server(clock.clone(), BookingSettings::immediate(), limits(10, 100));
    let stale = open(&server).await;

    clock.advance(chrono::Duration::minutes(30));
    let fresh = open(&server).await;

    assert_eq!(status_of(&server, stale).await, StatusCode::NOT_FOUND);
    assert_eq!(status_of(&server, fresh).await, StatusCode::OK);
}

#[tokio::test]
async fn test_cap_evicts_least_recently_used() {
    let clock = Arc::new(SteppingClock::new());
    let server = stepping_server(clock.clone(), BookingSettings::immediate(), limits(60, 2));

    let first = open(&server).await;
    clock.advance(chrono::Duration::minutes(1));
    let second = open(&server).await;
    clock.advance(chrono::Duration::minutes(1));
    assert_eq!(status_of(&server, first).await, StatusCode::OK);

    let third = open(&server).await;

    assert_eq!(status_of(&server, second).await, StatusCode::NOT_FOUND);
    assert_eq!(status_of(&server, first).await, StatusCode::OK);
    assert_eq!(status_of(&server, third).await, StatusCode::OK);
}

#[tokio::test]
async fn test_submitting_session_outlives_idle_timeout() {
    let clock = Arc::new(SteppingClock::new());
    let settings = BookingSettings {
        submit_delay: Duration::from_millis(100),
        ..BookingSettings::default()
    };
    let server = stepping_server(clock.clone(), settings, limits(1, 1));
    let id = open(&server).await;
    server
        .post(&format!("/api/wizards/{}/day", id))
        .json(&json!({ "date": "2024-01-25" }))
        .await
        .assert_status_ok();
    server
        .post(&format!("/api/wizards/{}/time", id))
        .json(&json!({ "time": "09:00" }))
        .await
        .assert_status_ok();

    let confirm = server
        .post(&format!("/api/wizards/{}/confirm", id))
        .into_future();
    let meanwhile = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        clock.advance(chrono::Duration::minutes(5));
        open(&server).await
    };
    let (confirmed, other) = tokio::join!(confirm, meanwhile);

    confirmed.assert_status_ok();
    assert_eq!(status_of(&server, id).await, StatusCode::OK);
    assert_eq!(status_of(&server, other).await, StatusCode::OK);
}
