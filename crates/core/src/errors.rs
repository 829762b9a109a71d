use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::appointment::AppointmentStatus;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("No time slots defined for admin {admin_id} on {date}")]
    DayNotFound { admin_id: String, date: NaiveDate },

    #[error("Time slot {time} on {date} is not available for admin {admin_id}")]
    SlotUnavailable {
        admin_id: String,
        date: NaiveDate,
        time: String,
    },

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(Uuid),

    #[error("Appointment {id} is already {status}")]
    AppointmentClosed { id: Uuid, status: AppointmentStatus },

    #[error("Notification not found: {0}")]
    NotificationNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),
}

impl BookingError {
    pub fn day_not_found(admin_id: &str, date: NaiveDate) -> Self {
        BookingError::DayNotFound {
            admin_id: admin_id.to_string(),
            date,
        }
    }

    pub fn slot_unavailable(admin_id: &str, date: NaiveDate, time: &str) -> Self {
        BookingError::SlotUnavailable {
            admin_id: admin_id.to_string(),
            date,
            time: time.to_string(),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
