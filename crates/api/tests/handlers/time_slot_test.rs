use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use crate::test_utils::{slot, TestContext};

#[tokio::test]
async fn test_publish_and_get_day() {
    let ctx = TestContext::new();

    let created = ctx.publish_day(&["10:00", "09:00"]).await;
    assert_eq!(created["admin_id"], "adm1");
    assert_eq!(created["version"], 1);
    assert_eq!(
        created["slots"],
        json!([
            { "time": "09:00", "available": true, "booked": false },
            { "time": "10:00", "available": true, "booked": false },
        ])
    );

    let (status, found) = ctx.get("/api/time-slot-days/adm1/2025-11-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, created);
}

#[tokio::test]
async fn test_get_unknown_day_is_not_found() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/api/time-slot-days/adm1/2025-11-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No time slots defined for admin adm1 on 2025-11-01");
}

#[tokio::test]
async fn test_book_and_release_slot() {
    let ctx = TestContext::new();
    ctx.publish_day(&["09:00"]).await;

    let (status, day) = ctx
        .post("/api/time-slot-days/adm1/2025-11-01/book", json!({ "time": "09:00" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slot(&day, "09:00"), &json!({ "time": "09:00", "available": false, "booked": true }));

    let (status, _) = ctx
        .post("/api/time-slot-days/adm1/2025-11-01/book", json!({ "time": "09:00" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, day) = ctx
        .post("/api/time-slot-days/adm1/2025-11-01/release", json!({ "time": "09:00" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slot(&day, "09:00")["booked"], false);
}

#[tokio::test]
async fn test_release_unknown_time_succeeds() {
    let ctx = TestContext::new();
    let before = ctx.publish_day(&["09:00"]).await;

    let (status, after) = ctx
        .post("/api/time-slot-days/adm1/2025-11-01/release", json!({ "time": "17:00" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["slots"], before["slots"]);
}

#[tokio::test]
async fn test_republish_keeps_booked_slot() {
    let ctx = TestContext::new();
    ctx.publish_day(&["09:00"]).await;
    ctx.post("/api/time-slot-days/adm1/2025-11-01/book", json!({ "time": "09:00" }))
        .await;

    let day = ctx.publish_day(&["10:00"]).await;

    assert_eq!(slot(&day, "09:00")["booked"], true);
    assert_eq!(slot(&day, "10:00")["available"], true);
}

#[rstest]
#[case::bad_time(json!([{ "time": "9am" }]))]
#[case::duplicate(json!([{ "time": "09:00" }, { "time": "09:00" }]))]
#[tokio::test]
async fn test_invalid_slots_are_bad_requests(#[case] slots: serde_json::Value) {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post(
            "/api/time-slot-days",
            json!({ "admin_id": "adm1", "date": "2025-11-01", "slots": slots }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Validation error"));
}

#[tokio::test]
async fn test_month_listing() {
    let ctx = TestContext::new();
    ctx.publish_day(&["09:00"]).await;
    ctx.post(
        "/api/time-slot-days",
        json!({ "admin_id": "adm1", "date": "2025-12-01", "slots": [{ "time": "09:00" }] }),
    )
    .await;

    let (status, days) = ctx.get("/api/time-slot-days/adm1?year=2025&month=11").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(days.as_array().unwrap().len(), 1);
    assert_eq!(days[0]["date"], "2025-11-01");

    let (status, _) = ctx.get("/api/time-slot-days/adm1?year=2025&month=13").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
