use std::{future::IntoFuture, sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use slotbook_api::handlers::wizard::{
    self, ConfirmResponse, SelectDayRequest, SelectTimeRequest, WizardResponse,
};
use slotbook_core::{
    models::ReservationStatus, settings::BookingSettings, store::ReservationStore,
    wizard::WizardState,
};
use slotbook_db::MemoryStore;

use crate::common::{fixed_state, TestContext};

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

async fn open_wizard(ctx: &TestContext) -> String {
    let response = ctx.server.post("/api/wizards").await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let wizard: WizardResponse = response.json();
    assert_eq!(wizard.state, WizardState::PickingDay);
    wizard.id.to_string()
}

async fn open_confirming(ctx: &TestContext) -> String {
    let id = open_wizard(ctx).await;
    ctx.server
        .post(&format!("/api/wizards/{}/day", id))
        .json(&json!({ "date": "2024-01-25" }))
        .await
        .assert_status_ok();
    ctx.server
        .post(&format!("/api/wizards/{}/time", id))
        .json(&json!({ "time": "09:00" }))
        .await
        .assert_status_ok();
    id
}

#[tokio::test]
async fn test_books_a_slot_end_to_end() {
    let ctx = TestContext::new();
    let id = open_wizard(&ctx).await;

    let picked: WizardResponse = ctx
        .server
        .post(&format!("/api/wizards/{}/day", id))
        .json(&json!({ "date": "2024-01-25" }))
        .await
        .json();
    assert_eq!(
        picked.state,
        WizardState::PickingTime {
            date: date("2024-01-25")
        }
    );

    let confirming: WizardResponse = ctx
        .server
        .post(&format!("/api/wizards/{}/time", id))
        .json(&json!({ "time": "09:00" }))
        .await
        .json();
    assert_eq!(
        confirming.state,
        WizardState::Confirming {
            date: date("2024-01-25"),
            time: "09:00".to_string(),
            notice: None,
        }
    );

    let response = ctx.server.post(&format!("/api/wizards/{}/confirm", id)).await;
    response.assert_status_ok();
    let confirmed: ConfirmResponse = response.json();
    assert_eq!(confirmed.reservation.date, date("2024-01-25"));
    assert_eq!(confirmed.reservation.time, "09:00");
    assert_eq!(confirmed.reservation.price, 50.0);
    assert_eq!(confirmed.reservation.status, ReservationStatus::Pending);
    assert!(confirmed.summary.contains("Thu 25 Jan"));
    assert!(confirmed.summary.contains("€50/30min"));

    let stored = ctx.store.list_all().await.unwrap();
    assert_eq!(stored, vec![confirmed.reservation.clone()]);

    let done: WizardResponse = ctx.server.get(&format!("/api/wizards/{}", id)).await.json();
    assert_eq!(
        done.state,
        WizardState::Done {
            reservation: confirmed.reservation
        }
    );
}

#[tokio::test]
async fn test_rejects_unavailable_day() {
    let ctx = TestContext::new();
    let id = open_wizard(&ctx).await;

    let response = ctx
        .server
        .post(&format!("/api/wizards/{}/day", id))
        .json(&json!({ "date": "2024-01-28" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let state: WizardResponse = ctx.server.get(&format!("/api/wizards/{}", id)).await.json();
    assert_eq!(state.state, WizardState::PickingDay);
}

#[tokio::test]
async fn test_rejects_day_outside_window() {
    let ctx = TestContext::new();
    let id = open_wizard(&ctx).await;

    for day in ["2024-01-09", "2024-03-01"] {
        let response = ctx
            .server
            .post(&format!("/api/wizards/{}/day", id))
            .json(&json!({ "date": day }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_rejects_unknown_time() {
    let ctx = TestContext::new();
    let id = open_wizard(&ctx).await;
    ctx.server
        .post(&format!("/api/wizards/{}/day", id))
        .json(&json!({ "date": "2024-01-25" }))
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .post(&format!("/api/wizards/{}/time", id))
        .json(&json!({ "time": "13:00" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_step_out_of_order_conflicts() {
    let ctx = TestContext::new();
    let id = open_wizard(&ctx).await;

    let response = ctx
        .server
        .post(&format!("/api/wizards/{}/time", id))
        .json(&json!({ "time": "09:00" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = ctx.server.post(&format!("/api/wizards/{}/confirm", id)).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert!(ctx.store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_back_and_reset() {
    let ctx = TestContext::new();
    let id = open_confirming(&ctx).await;

    let back: WizardResponse = ctx
        .server
        .post(&format!("/api/wizards/{}/back", id))
        .await
        .json();
    assert_eq!(
        back.state,
        WizardState::PickingTime {
            date: date("2024-01-25")
        }
    );

    let reset: WizardResponse = ctx
        .server
        .post(&format!("/api/wizards/{}/reset", id))
        .await
        .json();
    assert_eq!(reset.state, WizardState::PickingDay);
}

#[tokio::test]
async fn test_unknown_wizard_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/wizards/00000000-0000-0000-0000-000000000000")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn test_second_confirm_while_submitting_conflicts() {
    let ctx = TestContext::with_settings(BookingSettings {
        submit_delay: Duration::from_millis(100),
        ..BookingSettings::default()
    });
    let id = open_confirming(&ctx).await;
    let path = format!("/api/wizards/{}/confirm", id);

    let first = ctx.server.post(&path).into_future();
    let second = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        ctx.server.post(&path).await
    };
    let (first, second) = tokio::join!(first, second);

    first.assert_status_ok();
    assert_eq!(second.status_code(), StatusCode::CONFLICT);
    assert_eq!(ctx.store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_confirm_settles_after_request_is_dropped() {
    let store = Arc::new(MemoryStore::new());
    let settings = BookingSettings {
        submit_delay: Duration::from_millis(150),
        ..BookingSettings::default()
    };
    let state = Arc::new(fixed_state(store.clone(), settings));

    let (_, Json(opened)) = wizard::create_wizard(State(state.clone())).await;
    let id = opened.id;
    wizard::select_day(
        State(state.clone()),
        Path(id),
        Json(SelectDayRequest {
            date: date("2024-01-25"),
        }),
    )
    .await
    .unwrap();
    wizard::select_time(
        State(state.clone()),
        Path(id),
        Json(SelectTimeRequest {
            time: "09:00".to_string(),
        }),
    )
    .await
    .unwrap();

    let dropped = tokio::time::timeout(
        Duration::from_millis(30),
        wizard::confirm(State(state.clone()), Path(id)),
    )
    .await;
    assert!(dropped.is_err());

    tokio::time::sleep(Duration::from_millis(400)).await;

    let Json(current) = wizard::get_wizard(State(state.clone()), Path(id))
        .await
        .unwrap();
    assert!(matches!(current.state, WizardState::Done { .. }));
    assert_eq!(store.list_all().await.unwrap().len(), 1);

    let Json(reset) = wizard::reset(State(state), Path(id)).await.unwrap();
    assert_eq!(reset.state, WizardState::PickingDay);
}
