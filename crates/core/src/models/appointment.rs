use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::BookingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Completed => "COMPLETED",
        }
    }

    /// Cancelled and completed appointments accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Scheduled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            other => Err(BookingError::Validation(format!(
                "Unknown appointment status '{}'",
                other
            ))),
        }
    }
}

/// A booking of one admin's slot by a student, optionally for a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub student_id: String,
    /// `None` for a solo appointment.
    pub team_id: Option<String>,
    pub admin_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub meeting_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn scheduled(request: CreateAppointmentRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            student_id: request.student_id,
            team_id: request.team_id,
            admin_id: request.admin_id,
            date: request.date,
            time: request.time,
            status: AppointmentStatus::Scheduled,
            notes: request.notes,
            meeting_link: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves a scheduled appointment to `status`.
    pub fn transition_to(&mut self, status: AppointmentStatus) -> Result<(), BookingError> {
        self.ensure_open()?;
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn ensure_open(&self) -> Result<(), BookingError> {
        if self.status.is_terminal() {
            return Err(BookingError::AppointmentClosed {
                id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub student_id: String,
    pub admin_id: String,
    #[serde(default)]
    pub team_id: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentDetailsRequest {
    pub notes: Option<String>,
    pub meeting_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentQuery {
    pub admin_id: Option<String>,
    pub student_id: Option<String>,
    pub team_id: Option<String>,
}
