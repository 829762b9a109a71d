use std::sync::Arc;

use axum::http::{Method, StatusCode};
use mentorbook_api::{ApiState, StorageBackend};
use mentorbook_core::errors::BookingError;
use mentorbook_core::store::memory::{MemoryAppointmentStore, MemoryTimeSlotStore};
use mentorbook_db::mock::repositories::MockNotificationRepo;
use pretty_assertions::assert_eq;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_lifecycle_notifies_student_and_admin() {
    let ctx = TestContext::new();
    ctx.publish_day(&["10:00"]).await;
    let (_, appointment) = ctx.book("stu1", "10:00").await;
    let id = appointment["id"].as_str().unwrap();
    ctx.send(Method::POST, &format!("/api/appointments/{id}/cancel"), None)
        .await;

    let (status, student) = ctx.get("/api/users/stu1/notifications").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = student
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"Appointment scheduled"));
    assert!(titles.contains(&"Appointment cancelled"));

    let (_, admin) = ctx.get("/api/users/adm1/notifications").await;
    assert_eq!(admin.as_array().unwrap().len(), 2);
    assert_eq!(admin[0]["appointment_id"], id);
}

#[tokio::test]
async fn test_mark_as_read() {
    let ctx = TestContext::new();
    ctx.publish_day(&["10:00"]).await;
    ctx.book("stu1", "10:00").await;
    let (_, notifications) = ctx.get("/api/users/stu1/notifications").await;
    let id = notifications[0]["id"].as_str().unwrap();

    let (status, read) = ctx
        .send(Method::POST, &format!("/api/notifications/{id}/read"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["read"], true);

    let (status, _) = ctx
        .send(
            Method::POST,
            &format!("/api/notifications/{}/read", uuid::Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notification_store_failure_is_internal_error() {
    let mut notifications = MockNotificationRepo::new();
    notifications
        .expect_find_by_recipient_id()
        .withf(|recipient_id| recipient_id == "stu1")
        .times(1)
        .returning(|_| Err(BookingError::Database(eyre::eyre!("connection reset"))));

    let ctx = TestContext::with_state(ApiState::new(
        Arc::new(MemoryTimeSlotStore::new()),
        Arc::new(MemoryAppointmentStore::new()),
        Arc::new(notifications),
        StorageBackend::Memory,
    ));

    let (status, body) = ctx.get("/api/users/stu1/notifications").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}
