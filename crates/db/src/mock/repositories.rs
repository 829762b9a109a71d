use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;

use mentorbook_core::errors::BookingResult;
use mentorbook_core::models::{
    appointment::Appointment, notification::Notification, time_slot::TimeSlotDay,
};
use mentorbook_core::store::{AppointmentStore, NotificationStore, TimeSlotStore};

// Mock stores for testing
mock! {
    pub TimeSlotRepo {}

    #[async_trait]
    impl TimeSlotStore for TimeSlotRepo {
        async fn find_by_admin_id_and_date(
            &self,
            admin_id: &str,
            date: NaiveDate,
        ) -> BookingResult<Option<TimeSlotDay>>;

        async fn find_by_admin_id_and_date_between(
            &self,
            admin_id: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> BookingResult<Vec<TimeSlotDay>>;

        async fn save(&self, day: TimeSlotDay) -> BookingResult<TimeSlotDay>;
    }
}

mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentStore for AppointmentRepo {
        async fn find_by_id(&self, id: Uuid) -> BookingResult<Option<Appointment>>;

        async fn find_by_admin_id(&self, admin_id: &str) -> BookingResult<Vec<Appointment>>;

        async fn find_by_student_id(&self, student_id: &str) -> BookingResult<Vec<Appointment>>;

        async fn find_by_team_id(&self, team_id: &str) -> BookingResult<Vec<Appointment>>;

        async fn save(&self, appointment: Appointment) -> BookingResult<Appointment>;
    }
}

mock! {
    pub NotificationRepo {}

    #[async_trait]
    impl NotificationStore for NotificationRepo {
        async fn save(&self, notification: Notification) -> BookingResult<Notification>;

        async fn find_by_recipient_id(&self, recipient_id: &str) -> BookingResult<Vec<Notification>>;

        async fn mark_as_read(&self, id: Uuid) -> BookingResult<Notification>;
    }
}
