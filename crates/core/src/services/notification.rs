use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::BookingResult;
use crate::models::{appointment::Appointment, notification::Notification};
use crate::store::NotificationStore;

/// Receives appointment lifecycle events.
///
/// Called after the state change has been persisted. Failures are logged by
/// the caller and never undo the change.
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn create_notification_for_appointment(
        &self,
        appointment: &Appointment,
        status_label: &str,
    ) -> BookingResult<()>;
}

/// Records one notification for the student and one for the admin of the
/// appointment.
pub struct StoreNotificationService {
    store: Arc<dyn NotificationStore>,
}

impl StoreNotificationService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationService for StoreNotificationService {
    async fn create_notification_for_appointment(
        &self,
        appointment: &Appointment,
        status_label: &str,
    ) -> BookingResult<()> {
        let verb = status_label.to_lowercase();
        let title = format!("Appointment {}", verb);
        let team = appointment
            .team_id
            .as_deref()
            .map(|team_id| format!(" for team {}", team_id))
            .unwrap_or_default();

        let student_message = format!(
            "Your appointment{} with {} on {} at {} has been {}.",
            team, appointment.admin_id, appointment.date, appointment.time, verb
        );
        let admin_message = format!(
            "The appointment with {}{} on {} at {} has been {}.",
            appointment.student_id, team, appointment.date, appointment.time, verb
        );

        for (recipient, message) in [
            (&appointment.student_id, student_message),
            (&appointment.admin_id, admin_message),
        ] {
            debug!(
                "Creating notification: recipient={}, appointment_id={}, status={}",
                recipient, appointment.id, status_label
            );
            self.store
                .save(Notification::new(
                    recipient.as_str(),
                    Some(appointment.id),
                    title.as_str(),
                    message,
                ))
                .await?;
        }

        Ok(())
    }
}
