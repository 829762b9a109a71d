use crate::models::DbNotification;
use async_trait::async_trait;
use eyre::{Result, WrapErr};
use mentorbook_core::errors::{BookingError, BookingResult};
use mentorbook_core::models::notification::Notification;
use mentorbook_core::store::NotificationStore;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_notification(
    pool: &Pool<Postgres>,
    notification: &Notification,
) -> Result<DbNotification> {
    let created = sqlx::query_as::<_, DbNotification>(
        r#"
        INSERT INTO notifications (id, recipient_id, appointment_id, title, message, read, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, recipient_id, appointment_id, title, message, read, created_at
        "#,
    )
    .bind(notification.id)
    .bind(&notification.recipient_id)
    .bind(notification.appointment_id)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(notification.read)
    .bind(notification.created_at)
    .fetch_one(pool)
    .await
    .wrap_err("Failed to create notification")?;

    Ok(created)
}

pub async fn get_notifications_by_recipient(
    pool: &Pool<Postgres>,
    recipient_id: &str,
) -> Result<Vec<DbNotification>> {
    let notifications = sqlx::query_as::<_, DbNotification>(
        r#"
        SELECT id, recipient_id, appointment_id, title, message, read, created_at
        FROM notifications
        WHERE recipient_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(recipient_id)
    .fetch_all(pool)
    .await
    .wrap_err("Failed to load notifications")?;

    Ok(notifications)
}

pub async fn mark_notification_read(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbNotification>> {
    let updated = sqlx::query_as::<_, DbNotification>(
        r#"
        UPDATE notifications
        SET read = TRUE
        WHERE id = $1
        RETURNING id, recipient_id, appointment_id, title, message, read, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .wrap_err("Failed to mark notification as read")?;

    Ok(updated)
}

#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: Pool<Postgres>,
}

impl PgNotificationStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn save(&self, notification: Notification) -> BookingResult<Notification> {
        Ok(create_notification(&self.pool, &notification).await?.into())
    }

    async fn find_by_recipient_id(&self, recipient_id: &str) -> BookingResult<Vec<Notification>> {
        Ok(get_notifications_by_recipient(&self.pool, recipient_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn mark_as_read(&self, id: Uuid) -> BookingResult<Notification> {
        mark_notification_read(&self.pool, id)
            .await?
            .map(Into::into)
            .ok_or(BookingError::NotificationNotFound(id))
    }
}
