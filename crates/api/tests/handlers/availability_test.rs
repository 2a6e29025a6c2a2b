use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use slotbook_api::handlers::wizard::WizardResponse;
use slotbook_core::{
    models::{DaySlot, TimeSlot},
    settings::BookingSettings,
};

use crate::common::TestContext;

#[tokio::test]
async fn test_days_default_window() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/availability/days").await;

    response.assert_status_ok();
    let days: Vec<DaySlot> = response.json();
    assert_eq!(days.len(), 30);
    assert_eq!(days[0].date.to_string(), "2024-01-10");
    assert_eq!(days[29].date.to_string(), "2024-02-08");
    assert!(days.iter().all(|day| !day.is_past));
}

#[tokio::test]
async fn test_days_flags_follow_calendar_fields() {
    let ctx = TestContext::new();

    let days: Vec<DaySlot> = ctx.server.get("/api/availability/days").await.json();

    let by_date = |date: &str| {
        days.iter()
            .find(|day| day.date.to_string() == date)
            .copied()
            .unwrap()
    };
    assert!(by_date("2024-01-25").is_available);
    assert!(!by_date("2024-01-28").is_available);
}

#[tokio::test]
async fn test_days_custom_window() {
    let ctx = TestContext::new();

    let days: Vec<DaySlot> = ctx
        .server
        .get("/api/availability/days")
        .add_query_param("window", 7)
        .await
        .json();

    assert_eq!(days.len(), 7);
}

#[rstest]
#[case(0)]
#[case(31)]
#[case(366)]
#[tokio::test]
async fn test_days_window_out_of_range(#[case] window: u32) {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/availability/days")
        .add_query_param("window", window)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_every_listed_open_day_is_selectable() {
    let ctx = TestContext::with_settings(BookingSettings {
        window_days: 12,
        submit_delay: Duration::ZERO,
        ..BookingSettings::default()
    });

    let days: Vec<DaySlot> = ctx
        .server
        .get("/api/availability/days")
        .add_query_param("window", 12)
        .await
        .json();
    assert_eq!(days.len(), 12);

    for day in days.iter().filter(|day| day.is_selectable()) {
        let wizard: WizardResponse = ctx.server.post("/api/wizards").await.json();
        let response = ctx
            .server
            .post(&format!("/api/wizards/{}/day", wizard.id))
            .json(&json!({ "date": day.date }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK, "{}", day.date);
    }

    let beyond = ctx
        .server
        .get("/api/availability/days")
        .add_query_param("window", 13)
        .await;
    assert_eq!(beyond.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_times_are_fixed() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/availability/times").await;

    response.assert_status_ok();
    let slots: Vec<TimeSlot> = response.json();
    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0].time, "09:00");
    assert_eq!(slots[5].time, "11:30");
    assert_eq!(slots[6].time, "14:00");
    assert_eq!(slots[15].time, "18:30");
}
