use chrono::{DateTime, NaiveDate, Utc};
use eyre::{eyre, Result};
use mentorbook_core::models::{
    appointment::Appointment, notification::Notification, time_slot::TimeSlot,
    time_slot::TimeSlotDay,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DbTimeSlotDay {
    pub id: Uuid,
    pub admin_id: String,
    pub date: NaiveDate,
    pub slots: Json<Vec<TimeSlot>>,
    pub version: i64,
}

impl From<DbTimeSlotDay> for TimeSlotDay {
    fn from(row: DbTimeSlotDay) -> Self {
        Self {
            id: row.id,
            admin_id: row.admin_id,
            date: row.date,
            slots: row.slots.0,
            version: row.version,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub student_id: String,
    pub team_id: Option<String>,
    pub admin_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: String,
    pub notes: Option<String>,
    pub meeting_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = eyre::Report;

    fn try_from(row: DbAppointment) -> Result<Self> {
        let status = row
            .status
            .parse()
            .map_err(|e| eyre!("Appointment {} has a corrupt status: {}", row.id, e))?;

        Ok(Self {
            id: row.id,
            student_id: row.student_id,
            team_id: row.team_id,
            admin_id: row.admin_id,
            date: row.date,
            time: row.time,
            status,
            notes: row.notes,
            meeting_link: row.meeting_link,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbNotification {
    pub id: Uuid,
    pub recipient_id: String,
    pub appointment_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbNotification> for Notification {
    fn from(row: DbNotification) -> Self {
        Self {
            id: row.id,
            recipient_id: row.recipient_id,
            appointment_id: row.appointment_id,
            title: row.title,
            message: row.message,
            read: row.read,
            created_at: row.created_at,
        }
    }
}
