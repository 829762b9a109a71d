use eyre::{Result, WrapErr};
use sqlx::{Executor, Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // One slot calendar per admin per date; slots are stored as a JSON array
    // and rewritten as a whole, guarded by `version`.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slot_days (
            id UUID PRIMARY KEY,
            admin_id VARCHAR(255) NOT NULL,
            date DATE NOT NULL,
            slots JSONB NOT NULL DEFAULT '[]'::jsonb,
            version BIGINT NOT NULL DEFAULT 1,
            CONSTRAINT uq_time_slot_days_admin_date UNIQUE (admin_id, date)
        );
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("Failed to create time_slot_days table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY,
            student_id VARCHAR(255) NOT NULL,
            team_id VARCHAR(255) NULL,
            admin_id VARCHAR(255) NOT NULL,
            date DATE NOT NULL,
            time VARCHAR(5) NOT NULL,
            status VARCHAR(16) NOT NULL,
            notes TEXT NULL,
            meeting_link TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (status IN ('SCHEDULED', 'CANCELLED', 'COMPLETED'))
        );
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("Failed to create appointments table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id UUID PRIMARY KEY,
            recipient_id VARCHAR(255) NOT NULL,
            appointment_id UUID NULL REFERENCES appointments(id),
            title VARCHAR(255) NOT NULL,
            message TEXT NOT NULL,
            read BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("Failed to create notifications table")?;

    // At most one scheduled appointment per slot.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uq_appointments_scheduled_slot
            ON appointments(admin_id, date, time) WHERE status = 'SCHEDULED';
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("Failed to create scheduled slot index")?;

    // Several statements in one call need the simple query protocol.
    pool.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_appointments_admin_id ON appointments(admin_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_student_id ON appointments(student_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_team_id ON appointments(team_id);
        CREATE INDEX IF NOT EXISTS idx_notifications_recipient_id ON notifications(recipient_id);
        "#,
    )
    .await
    .wrap_err("Failed to create indexes")?;

    info!("Database schema initialized successfully.");
    Ok(())
}
