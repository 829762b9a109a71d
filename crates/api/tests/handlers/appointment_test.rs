use std::sync::Arc;

use axum::http::{Method, StatusCode};
use chrono::NaiveDate;
use mentorbook_api::{ApiState, StorageBackend};
use mentorbook_core::errors::BookingError;
use mentorbook_core::models::appointment::{Appointment, CreateAppointmentRequest};
use mentorbook_core::models::time_slot::{TimeSlot, TimeSlotDay};
use mentorbook_core::store::memory::{
    MemoryAppointmentStore, MemoryNotificationStore, MemoryTimeSlotStore,
};
use mentorbook_core::store::AppointmentStore;
use mentorbook_db::mock::repositories::{MockAppointmentRepo, MockTimeSlotRepo};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{slot, TestContext};

#[tokio::test]
async fn test_create_appointment() {
    let ctx = TestContext::new();
    ctx.publish_day(&["09:00", "10:00"]).await;

    let (status, appointment) = ctx.book("stu1", "10:00").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appointment["status"], "SCHEDULED");
    assert_eq!(appointment["team_id"], json!(null));

    let (_, day) = ctx.get("/api/time-slot-days/adm1/2025-11-01").await;
    assert_eq!(slot(&day, "10:00")["booked"], true);
    assert_eq!(slot(&day, "09:00")["booked"], false);

    let id = appointment["id"].as_str().unwrap();
    let (status, found) = ctx.get(&format!("/api/appointments/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, appointment);
}

#[tokio::test]
async fn test_double_booking_conflicts() {
    let ctx = TestContext::new();
    ctx.publish_day(&["10:00"]).await;
    ctx.book("stu1", "10:00").await;

    let (status, _) = ctx.book("stu2", "10:00").await;

    assert_eq!(status, StatusCode::CONFLICT);
    let (_, listed) = ctx.get("/api/appointments?student_id=stu2").await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_booking_without_calendar_is_not_found() {
    let ctx = TestContext::new();

    let (status, _) = ctx.book("stu1", "10:00").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_then_complete_conflicts() {
    let ctx = TestContext::new();
    ctx.publish_day(&["10:00"]).await;
    let (_, appointment) = ctx.book("stu1", "10:00").await;
    let id = appointment["id"].as_str().unwrap();

    let (status, cancelled) = ctx
        .send(Method::POST, &format!("/api/appointments/{id}/cancel"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");

    let (_, day) = ctx.get("/api/time-slot-days/adm1/2025-11-01").await;
    assert_eq!(slot(&day, "10:00")["available"], true);

    let (status, body) = ctx
        .send(Method::POST, &format!("/api/appointments/{id}/complete"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], format!("Appointment {id} is already CANCELLED"));
}

#[tokio::test]
async fn test_complete_keeps_slot_booked() {
    let ctx = TestContext::new();
    ctx.publish_day(&["10:00"]).await;
    let (_, appointment) = ctx.book("stu1", "10:00").await;
    let id = appointment["id"].as_str().unwrap();

    let (status, completed) = ctx
        .send(Method::POST, &format!("/api/appointments/{id}/complete"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["status"], "COMPLETED");
    let (_, day) = ctx.get("/api/time-slot-days/adm1/2025-11-01").await;
    assert_eq!(slot(&day, "10:00")["booked"], true);
}

#[tokio::test]
async fn test_update_details() {
    let ctx = TestContext::new();
    ctx.publish_day(&["10:00"]).await;
    let (_, appointment) = ctx.book("stu1", "10:00").await;
    let id = appointment["id"].as_str().unwrap();

    let (status, updated) = ctx
        .send(
            Method::PATCH,
            &format!("/api/appointments/{id}"),
            Some(json!({ "meeting_link": "https://meet.example.com/xyz" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["meeting_link"], "https://meet.example.com/xyz");
    assert_eq!(updated["notes"], json!(null));
}

#[tokio::test]
async fn test_unknown_appointment_is_not_found() {
    let ctx = TestContext::new();
    let id = uuid::Uuid::new_v4();

    let (status, _) = ctx
        .send(Method::POST, &format!("/api/appointments/{id}/cancel"), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_requires_exactly_one_filter() {
    let ctx = TestContext::new();
    ctx.publish_day(&["09:00", "10:00"]).await;
    ctx.book("stu1", "09:00").await;
    ctx.post(
        "/api/appointments",
        json!({
            "student_id": "stu2",
            "admin_id": "adm1",
            "team_id": "team9",
            "date": "2025-11-01",
            "time": "10:00",
        }),
    )
    .await;

    let (status, by_admin) = ctx.get("/api/appointments?admin_id=adm1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_admin.as_array().unwrap().len(), 2);

    let (_, by_team) = ctx.get("/api/appointments?team_id=team9").await;
    assert_eq!(by_team[0]["student_id"], "stu2");

    let (status, _) = ctx.get("/api/appointments").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = ctx.get("/api/appointments?admin_id=adm1&student_id=stu1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_failure_is_internal_error_and_frees_slot() {
    let mut appointments = MockAppointmentRepo::new();
    appointments
        .expect_save()
        .returning(|_| Err(BookingError::Database(eyre::eyre!("connection refused"))));

    let ctx = TestContext::with_state(ApiState::new(
        Arc::new(MemoryTimeSlotStore::new()),
        Arc::new(appointments),
        Arc::new(MemoryNotificationStore::new()),
        StorageBackend::Memory,
    ));
    ctx.publish_day(&["10:00"]).await;

    let (status, body) = ctx.book("stu1", "10:00").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    let (_, day) = ctx.get("/api/time-slot-days/adm1/2025-11-01").await;
    assert_eq!(slot(&day, "10:00")["booked"], false);
}

#[tokio::test]
async fn test_failed_release_leaves_appointment_scheduled() {
    let date = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
    let appointments = Arc::new(MemoryAppointmentStore::new());
    let appointment = appointments
        .save(Appointment::scheduled(CreateAppointmentRequest {
            student_id: "stu1".into(),
            admin_id: "adm1".into(),
            team_id: None,
            date,
            time: "10:00".into(),
            notes: None,
        }))
        .await
        .unwrap();

    let mut time_slots = MockTimeSlotRepo::new();
    time_slots
        .expect_find_by_admin_id_and_date()
        .returning(|admin_id, date| {
            let booked = TimeSlot {
                time: "10:00".into(),
                available: false,
                booked: true,
            };
            let mut day = TimeSlotDay::new(admin_id, date, vec![booked]);
            day.version = 1;
            Ok(Some(day))
        });
    time_slots
        .expect_save()
        .returning(|_| Err(BookingError::Conflict("stale calendar".into())));

    let ctx = TestContext::with_state(ApiState::new(
        Arc::new(time_slots),
        appointments,
        Arc::new(MemoryNotificationStore::new()),
        StorageBackend::Memory,
    ));
    let id = appointment.id;

    let (status, _) = ctx
        .send(Method::POST, &format!("/api/appointments/{id}/cancel"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, stored) = ctx.get(&format!("/api/appointments/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["status"], "SCHEDULED");
}
