use crate::models::DbAppointment;
use async_trait::async_trait;
use eyre::{Result, WrapErr};
use mentorbook_core::errors::{BookingError, BookingResult};
use mentorbook_core::models::appointment::Appointment;
use mentorbook_core::store::AppointmentStore;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const APPOINTMENT_COLUMNS: &str = "id, student_id, team_id, admin_id, date, time, status, \
     notes, meeting_link, created_at, updated_at";

pub async fn get_appointment_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {} FROM appointments WHERE id = $1",
        APPOINTMENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .wrap_err("Failed to load appointment")?;

    Ok(appointment)
}

/// Appointments whose `column` equals `value`, in slot order.
async fn get_appointments_where(
    pool: &Pool<Postgres>,
    column: &'static str,
    value: &str,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {} FROM appointments WHERE {} = $1 ORDER BY date ASC, time ASC",
        APPOINTMENT_COLUMNS, column
    ))
    .bind(value)
    .fetch_all(pool)
    .await
    .wrap_err_with(|| format!("Failed to load appointments by {}", column))?;

    Ok(appointments)
}

pub async fn get_appointments_by_admin_id(
    pool: &Pool<Postgres>,
    admin_id: &str,
) -> Result<Vec<DbAppointment>> {
    get_appointments_where(pool, "admin_id", admin_id).await
}

pub async fn get_appointments_by_student_id(
    pool: &Pool<Postgres>,
    student_id: &str,
) -> Result<Vec<DbAppointment>> {
    get_appointments_where(pool, "student_id", student_id).await
}

pub async fn get_appointments_by_team_id(
    pool: &Pool<Postgres>,
    team_id: &str,
) -> Result<Vec<DbAppointment>> {
    get_appointments_where(pool, "team_id", team_id).await
}

pub async fn upsert_appointment(
    pool: &Pool<Postgres>,
    appointment: &Appointment,
) -> std::result::Result<DbAppointment, sqlx::Error> {
    tracing::debug!(
        "Saving appointment: id={}, status={}",
        appointment.id,
        appointment.status
    );

    sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments ({columns})
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (id) DO UPDATE
        SET status = EXCLUDED.status,
            notes = EXCLUDED.notes,
            meeting_link = EXCLUDED.meeting_link,
            updated_at = EXCLUDED.updated_at
        RETURNING {columns}
        "#,
        columns = APPOINTMENT_COLUMNS
    ))
    .bind(appointment.id)
    .bind(&appointment.student_id)
    .bind(&appointment.team_id)
    .bind(&appointment.admin_id)
    .bind(appointment.date)
    .bind(&appointment.time)
    .bind(appointment.status.as_str())
    .bind(&appointment.notes)
    .bind(&appointment.meeting_link)
    .bind(appointment.created_at)
    .bind(appointment.updated_at)
    .fetch_one(pool)
    .await
}

fn into_appointments(rows: Vec<DbAppointment>) -> BookingResult<Vec<Appointment>> {
    rows.into_iter()
        .map(|row| Appointment::try_from(row).map_err(BookingError::from))
        .collect()
}

#[derive(Debug, Clone)]
pub struct PgAppointmentStore {
    pool: Pool<Postgres>,
}

impl PgAppointmentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn find_by_id(&self, id: Uuid) -> BookingResult<Option<Appointment>> {
        match get_appointment_by_id(&self.pool, id).await? {
            Some(row) => Ok(Some(row.try_into()?)),
            None => Ok(None),
        }
    }

    async fn find_by_admin_id(&self, admin_id: &str) -> BookingResult<Vec<Appointment>> {
        into_appointments(get_appointments_by_admin_id(&self.pool, admin_id).await?)
    }

    async fn find_by_student_id(&self, student_id: &str) -> BookingResult<Vec<Appointment>> {
        into_appointments(get_appointments_by_student_id(&self.pool, student_id).await?)
    }

    async fn find_by_team_id(&self, team_id: &str) -> BookingResult<Vec<Appointment>> {
        into_appointments(get_appointments_by_team_id(&self.pool, team_id).await?)
    }

    async fn save(&self, appointment: Appointment) -> BookingResult<Appointment> {
        match upsert_appointment(&self.pool, &appointment).await {
            Ok(row) => Ok(row.try_into()?),
            // Another scheduled appointment already holds this slot.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(BookingError::slot_unavailable(
                    &appointment.admin_id,
                    appointment.date,
                    &appointment.time,
                ))
            }
            Err(err) => Err(eyre::Report::new(err)
                .wrap_err("Failed to save appointment")
                .into()),
        }
    }
}
