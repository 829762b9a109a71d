use crate::models::DbTimeSlotDay;
use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::{Result, WrapErr};
use mentorbook_core::errors::{BookingError, BookingResult};
use mentorbook_core::models::time_slot::TimeSlotDay;
use mentorbook_core::store::TimeSlotStore;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};

pub async fn get_day_by_admin_and_date(
    pool: &Pool<Postgres>,
    admin_id: &str,
    date: NaiveDate,
) -> Result<Option<DbTimeSlotDay>> {
    let day = sqlx::query_as::<_, DbTimeSlotDay>(
        r#"
        SELECT id, admin_id, date, slots, version
        FROM time_slot_days
        WHERE admin_id = $1 AND date = $2
        "#,
    )
    .bind(admin_id)
    .bind(date)
    .fetch_optional(pool)
    .await
    .wrap_err("Failed to load time slot day")?;

    Ok(day)
}

pub async fn get_days_by_admin_between(
    pool: &Pool<Postgres>,
    admin_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DbTimeSlotDay>> {
    let days = sqlx::query_as::<_, DbTimeSlotDay>(
        r#"
        SELECT id, admin_id, date, slots, version
        FROM time_slot_days
        WHERE admin_id = $1 AND date >= $2 AND date < $3
        ORDER BY date ASC
        "#,
    )
    .bind(admin_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
    .wrap_err("Failed to load time slot days")?;

    Ok(days)
}

/// Inserts a new calendar. Returns `None` if one already exists for the
/// admin and date.
pub async fn insert_day(pool: &Pool<Postgres>, day: &TimeSlotDay) -> Result<Option<DbTimeSlotDay>> {
    tracing::debug!(
        "Inserting time slot day: admin_id={}, date={}, slots={}",
        day.admin_id,
        day.date,
        day.slots.len()
    );

    let inserted = sqlx::query_as::<_, DbTimeSlotDay>(
        r#"
        INSERT INTO time_slot_days (id, admin_id, date, slots, version)
        VALUES ($1, $2, $3, $4, 1)
        ON CONFLICT (admin_id, date) DO NOTHING
        RETURNING id, admin_id, date, slots, version
        "#,
    )
    .bind(day.id)
    .bind(&day.admin_id)
    .bind(day.date)
    .bind(Json(&day.slots))
    .fetch_optional(pool)
    .await
    .wrap_err("Failed to insert time slot day")?;

    Ok(inserted)
}

/// Rewrites the slots of a calendar if its stored version still matches.
/// Returns `None` when the row was changed by someone else.
pub async fn update_day(pool: &Pool<Postgres>, day: &TimeSlotDay) -> Result<Option<DbTimeSlotDay>> {
    tracing::debug!(
        "Updating time slot day: admin_id={}, date={}, version={}",
        day.admin_id,
        day.date,
        day.version
    );

    let updated = sqlx::query_as::<_, DbTimeSlotDay>(
        r#"
        UPDATE time_slot_days
        SET slots = $3, version = version + 1
        WHERE admin_id = $1 AND date = $2 AND version = $4
        RETURNING id, admin_id, date, slots, version
        "#,
    )
    .bind(&day.admin_id)
    .bind(day.date)
    .bind(Json(&day.slots))
    .bind(day.version)
    .fetch_optional(pool)
    .await
    .wrap_err("Failed to update time slot day")?;

    Ok(updated)
}

#[derive(Debug, Clone)]
pub struct PgTimeSlotStore {
    pool: Pool<Postgres>,
}

impl PgTimeSlotStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimeSlotStore for PgTimeSlotStore {
    async fn find_by_admin_id_and_date(
        &self,
        admin_id: &str,
        date: NaiveDate,
    ) -> BookingResult<Option<TimeSlotDay>> {
        Ok(get_day_by_admin_and_date(&self.pool, admin_id, date)
            .await?
            .map(Into::into))
    }

    async fn find_by_admin_id_and_date_between(
        &self,
        admin_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BookingResult<Vec<TimeSlotDay>> {
        Ok(get_days_by_admin_between(&self.pool, admin_id, start, end)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn save(&self, day: TimeSlotDay) -> BookingResult<TimeSlotDay> {
        let saved = if day.version == 0 {
            insert_day(&self.pool, &day).await?
        } else {
            update_day(&self.pool, &day).await?
        };

        saved.map(Into::into).ok_or_else(|| {
            BookingError::Conflict(format!(
                "time slot day for admin {} on {} was modified concurrently",
                day.admin_id, day.date
            ))
        })
    }
}
