//! # Persistence Seams
//!
//! Storage traits consumed by the booking services. The services only ever
//! talk to these traits, so the same logic runs against PostgreSQL in
//! production and the in-memory stores in [`memory`] during development and
//! tests.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::BookingResult;
use crate::models::{appointment::Appointment, notification::Notification, time_slot::TimeSlotDay};

/// Storage for slot calendars, keyed by `(admin_id, date)`.
#[async_trait]
pub trait TimeSlotStore: Send + Sync {
    async fn find_by_admin_id_and_date(
        &self,
        admin_id: &str,
        date: NaiveDate,
    ) -> BookingResult<Option<TimeSlotDay>>;

    /// Calendars with `start <= date < end`, ordered by date.
    async fn find_by_admin_id_and_date_between(
        &self,
        admin_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BookingResult<Vec<TimeSlotDay>>;

    /// Writes the whole calendar and returns it with its new version.
    ///
    /// A calendar with `version == 0` is inserted only if none exists for its
    /// `(admin_id, date)`. Otherwise the stored version must equal
    /// `day.version`. Both failures are reported as `BookingError::Conflict`.
    async fn save(&self, day: TimeSlotDay) -> BookingResult<TimeSlotDay>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> BookingResult<Option<Appointment>>;

    async fn find_by_admin_id(&self, admin_id: &str) -> BookingResult<Vec<Appointment>>;

    async fn find_by_student_id(&self, student_id: &str) -> BookingResult<Vec<Appointment>>;

    async fn find_by_team_id(&self, team_id: &str) -> BookingResult<Vec<Appointment>>;

    /// Inserts or replaces the appointment with the same id.
    async fn save(&self, appointment: Appointment) -> BookingResult<Appointment>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn save(&self, notification: Notification) -> BookingResult<Notification>;

    /// Newest first.
    async fn find_by_recipient_id(&self, recipient_id: &str) -> BookingResult<Vec<Notification>>;

    async fn mark_as_read(&self, id: Uuid) -> BookingResult<Notification>;
}
