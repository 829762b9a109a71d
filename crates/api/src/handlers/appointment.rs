//! # Appointment Handlers
//!
//! Endpoints for the appointment lifecycle. Creating an appointment books its
//! slot; cancelling it releases the slot again.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mentorbook_core::{
    errors::BookingError,
    models::appointment::{
        Appointment, AppointmentQuery, CreateAppointmentRequest, UpdateAppointmentDetailsRequest,
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Books a slot and creates a scheduled appointment for it
///
/// # Endpoint
///
/// ```text
/// POST /api/appointments
/// {"student_id": "stu1", "admin_id": "adm1", "team_id": null, "date": "2025-11-01", "time": "10:00"}
/// ```
///
/// # Errors
///
/// * `404` - the admin has no calendar for that date
/// * `409` - the slot does not exist or is already taken
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = state.appointments.create_appointment(payload).await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.appointments.get_appointment(id).await?))
}

/// Lists appointments by exactly one of `admin_id`, `student_id` or `team_id`
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = match (query.admin_id, query.student_id, query.team_id) {
        (Some(admin_id), None, None) => state.appointments.get_appointments_by_admin(&admin_id).await?,
        (None, Some(student_id), None) => {
            state.appointments.get_appointments_by_student(&student_id).await?
        }
        (None, None, Some(team_id)) => state.appointments.get_appointments_by_team(&team_id).await?,
        _ => {
            return Err(AppError(BookingError::Validation(
                "Exactly one of admin_id, student_id or team_id is required".to_string(),
            )));
        }
    };

    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentDetailsRequest>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(
        state
            .appointments
            .update_appointment_details(id, payload)
            .await?,
    ))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.appointments.cancel_appointment(id).await?))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.appointments.complete_appointment(id).await?))
}
