use axum::http::StatusCode;
use chrono::NaiveDate;
use mentorbook_api::middleware::error_handling::map_error;
use mentorbook_core::errors::BookingError;
use mentorbook_core::models::appointment::AppointmentStatus;
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::TestContext;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()
}

#[rstest]
#[case::day_not_found(BookingError::day_not_found("adm1", date()), StatusCode::NOT_FOUND)]
#[case::slot_unavailable(
    BookingError::slot_unavailable("adm1", date(), "09:00"),
    StatusCode::CONFLICT
)]
#[case::appointment_not_found(BookingError::AppointmentNotFound(Uuid::nil()), StatusCode::NOT_FOUND)]
#[case::appointment_closed(
    BookingError::AppointmentClosed { id: Uuid::nil(), status: AppointmentStatus::Completed },
    StatusCode::CONFLICT
)]
#[case::notification_not_found(
    BookingError::NotificationNotFound(Uuid::nil()),
    StatusCode::NOT_FOUND
)]
#[case::validation(BookingError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
#[case::conflict(BookingError::Conflict("stale".into()), StatusCode::CONFLICT)]
#[case::database(
    BookingError::Database(eyre::eyre!("Database error")),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_health_reports_storage() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}
