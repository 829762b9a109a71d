//! # MentorBook API
//!
//! The API crate provides the web server for mentor appointment booking.
//! It defines RESTful endpoints for slot calendars, appointments and
//! notifications.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Extract requests and delegate to the booking services
//! - **Middleware**: Map domain errors to HTTP responses
//! - **Config**: Handle environment and application configuration
//!
//! The booking rules live in `mentorbook-core`; storage is PostgreSQL via
//! `mentorbook-db`, or in-memory when no database is configured.

/// Configuration module for API settings
pub mod config;
/// Request handlers delegating to the booking services
pub mod handlers;
/// Error-to-response mapping
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, Router};
use eyre::Result;
use mentorbook_core::services::{
    appointment::AppointmentService, notification::StoreNotificationService,
    time_slot_day::TimeSlotDayService,
};
use mentorbook_core::store::{
    memory::{MemoryAppointmentStore, MemoryNotificationStore, MemoryTimeSlotStore},
    AppointmentStore, NotificationStore, TimeSlotStore,
};
use mentorbook_db::{PgAppointmentStore, PgNotificationStore, PgTimeSlotStore};
use serde::Serialize;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub time_slots: Arc<TimeSlotDayService>,
    pub appointments: Arc<AppointmentService>,
    pub notifications: Arc<dyn NotificationStore>,
    pub storage: StorageBackend,
}

impl ApiState {
    /// Wires the booking services on top of the given stores
    pub fn new(
        time_slot_store: Arc<dyn TimeSlotStore>,
        appointment_store: Arc<dyn AppointmentStore>,
        notification_store: Arc<dyn NotificationStore>,
        storage: StorageBackend,
    ) -> Self {
        let time_slots = Arc::new(TimeSlotDayService::new(time_slot_store));
        let notifier = Arc::new(StoreNotificationService::new(notification_store.clone()));
        let appointments = Arc::new(AppointmentService::new(
            appointment_store,
            time_slots.clone(),
            notifier,
        ));

        Self {
            time_slots,
            appointments,
            notifications: notification_store,
            storage,
        }
    }

    pub fn with_postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgTimeSlotStore::new(pool.clone())),
            Arc::new(PgAppointmentStore::new(pool.clone())),
            Arc::new(PgNotificationStore::new(pool)),
            StorageBackend::Postgres,
        )
    }

    /// State backed by process-local stores; nothing survives a restart
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryTimeSlotStore::new()),
            Arc::new(MemoryAppointmentStore::new()),
            Arc::new(MemoryNotificationStore::new()),
            StorageBackend::Memory,
        )
    }
}

/// Installs the global tracing subscriber at the given level
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the application router with all routes and the given state
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot calendar endpoints
        .merge(routes::time_slot::routes())
        // Appointment lifecycle endpoints
        .merge(routes::appointment::routes())
        // Notification endpoints
        .merge(routes::notification::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and state
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use std::sync::Arc;
/// use mentorbook_api::{config::ApiConfig, start_server, ApiState};
///
/// let config = ApiConfig::from_env()?;
/// start_server(config, Arc::new(ApiState::in_memory())).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
        .layer(TraceLayer::new_for_http());

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
