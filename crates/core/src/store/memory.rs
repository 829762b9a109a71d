use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AppointmentStore, NotificationStore, TimeSlotStore};
use crate::errors::{BookingError, BookingResult};
use crate::models::{appointment::Appointment, notification::Notification, time_slot::TimeSlotDay};

#[derive(Debug, Default)]
pub struct MemoryTimeSlotStore {
    days: RwLock<HashMap<(String, NaiveDate), TimeSlotDay>>,
}

impl MemoryTimeSlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TimeSlotStore for MemoryTimeSlotStore {
    async fn find_by_admin_id_and_date(
        &self,
        admin_id: &str,
        date: NaiveDate,
    ) -> BookingResult<Option<TimeSlotDay>> {
        let days = self.days.read().await;
        Ok(days.get(&(admin_id.to_string(), date)).cloned())
    }

    async fn find_by_admin_id_and_date_between(
        &self,
        admin_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BookingResult<Vec<TimeSlotDay>> {
        let days = self.days.read().await;
        let mut found: Vec<TimeSlotDay> = days
            .values()
            .filter(|day| day.admin_id == admin_id && day.date >= start && day.date < end)
            .cloned()
            .collect();
        found.sort_by_key(|day| day.date);
        Ok(found)
    }

    async fn save(&self, mut day: TimeSlotDay) -> BookingResult<TimeSlotDay> {
        let mut days = self.days.write().await;
        let key = (day.admin_id.clone(), day.date);

        let stored_version = days.get(&key).map(|existing| existing.version).unwrap_or(0);
        if stored_version != day.version {
            return Err(BookingError::Conflict(format!(
                "time slot day for admin {} on {} was modified concurrently",
                day.admin_id, day.date
            )));
        }

        day.version += 1;
        days.insert(key, day.clone());
        Ok(day)
    }
}

#[derive(Debug, Default)]
pub struct MemoryAppointmentStore {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl MemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<Appointment>
    where
        F: Fn(&Appointment) -> bool,
    {
        let appointments = self.appointments.read().await;
        let mut found: Vec<Appointment> = appointments
            .values()
            .filter(|appointment| predicate(appointment))
            .cloned()
            .collect();
        found.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));
        found
    }
}

#[async_trait]
impl AppointmentStore for MemoryAppointmentStore {
    async fn find_by_id(&self, id: Uuid) -> BookingResult<Option<Appointment>> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn find_by_admin_id(&self, admin_id: &str) -> BookingResult<Vec<Appointment>> {
        Ok(self.filtered(|a| a.admin_id == admin_id).await)
    }

    async fn find_by_student_id(&self, student_id: &str) -> BookingResult<Vec<Appointment>> {
        Ok(self.filtered(|a| a.student_id == student_id).await)
    }

    async fn find_by_team_id(&self, team_id: &str) -> BookingResult<Vec<Appointment>> {
        Ok(self
            .filtered(|a| a.team_id.as_deref() == Some(team_id))
            .await)
    }

    async fn save(&self, appointment: Appointment) -> BookingResult<Appointment> {
        self.appointments
            .write()
            .await
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }
}

#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    notifications: RwLock<HashMap<Uuid, Notification>>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn save(&self, notification: Notification) -> BookingResult<Notification> {
        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn find_by_recipient_id(&self, recipient_id: &str) -> BookingResult<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        let mut found: Vec<Notification> = notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn mark_as_read(&self, id: Uuid) -> BookingResult<Notification> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .get_mut(&id)
            .ok_or(BookingError::NotificationNotFound(id))?;
        notification.read = true;
        Ok(notification.clone())
    }
}
