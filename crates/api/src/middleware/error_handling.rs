//! # Error Handling Middleware
//!
//! Maps booking errors to HTTP status codes and JSON error bodies, so every
//! handler reports failures the same way.
//!
//! | error | status |
//! |---|---|
//! | `DayNotFound`, `AppointmentNotFound`, `NotificationNotFound` | 404 |
//! | `SlotUnavailable`, `AppointmentClosed`, `Conflict` | 409 |
//! | `Validation` | 400 |
//! | `Database` | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mentorbook_core::errors::BookingError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// Handlers return `Result<_, AppError>` and use `?` on service calls that
/// return `BookingResult`.
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::DayNotFound { .. }
            | BookingError::AppointmentNotFound(_)
            | BookingError::NotificationNotFound(_) => StatusCode::NOT_FOUND,
            BookingError::SlotUnavailable { .. }
            | BookingError::AppointmentClosed { .. }
            | BookingError::Conflict(_) => StatusCode::CONFLICT,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Store failures are logged with their cause chain and hidden from clients.
        let message = match &self.0 {
            BookingError::Database(report) => {
                tracing::error!("Database error: {:?}", report);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Automatic conversion from BookingError to AppError
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Maps a BookingError to an HTTP response
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
