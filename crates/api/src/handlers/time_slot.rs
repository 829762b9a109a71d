//! # Time Slot Handlers
//!
//! Endpoints for an admin's slot calendars: publishing availability for a
//! date, reading calendars, and reserving or releasing single slots.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use mentorbook_core::models::time_slot::{
    MonthQuery, SaveTimeSlotDayRequest, SlotTimeRequest, TimeSlot, TimeSlotDay,
};
use std::sync::Arc;

use crate::{middleware::error_handling::AppError, ApiState};

/// Creates the calendar for an admin and date, or merges new slots into it
///
/// # Endpoint
///
/// ```text
/// POST /api/time-slot-days
/// {"admin_id": "adm1", "date": "2025-11-01", "slots": [{"time": "09:00"}]}
/// ```
///
/// Slots that are already booked are kept whatever the request contains.
#[axum::debug_handler]
pub async fn create_or_update_day(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SaveTimeSlotDayRequest>,
) -> Result<Json<TimeSlotDay>, AppError> {
    let slots: Vec<TimeSlot> = payload.slots.into_iter().map(Into::into).collect();

    let day = state
        .time_slots
        .create_or_update_day(&payload.admin_id, payload.date, slots)
        .await?;

    Ok(Json(day))
}

#[axum::debug_handler]
pub async fn get_day(
    State(state): State<Arc<ApiState>>,
    Path((admin_id, date)): Path<(String, NaiveDate)>,
) -> Result<Json<TimeSlotDay>, AppError> {
    let day = state
        .time_slots
        .get_day_by_admin_and_date(&admin_id, date)
        .await?;

    Ok(Json(day))
}

/// Lists an admin's calendars for one month
///
/// ```text
/// GET /api/time-slot-days/adm1?year=2025&month=11
/// ```
#[axum::debug_handler]
pub async fn get_month(
    State(state): State<Arc<ApiState>>,
    Path(admin_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<TimeSlotDay>>, AppError> {
    let days = state
        .time_slots
        .get_slots_by_admin_and_month(&admin_id, query.year, query.month)
        .await?;

    Ok(Json(days))
}

#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    Path((admin_id, date)): Path<(String, NaiveDate)>,
    Json(payload): Json<SlotTimeRequest>,
) -> Result<Json<TimeSlotDay>, AppError> {
    let day = state
        .time_slots
        .mark_slot_as_booked(&admin_id, date, &payload.time)
        .await?;

    Ok(Json(day))
}

#[axum::debug_handler]
pub async fn release_slot(
    State(state): State<Arc<ApiState>>,
    Path((admin_id, date)): Path<(String, NaiveDate)>,
    Json(payload): Json<SlotTimeRequest>,
) -> Result<Json<TimeSlotDay>, AppError> {
    let day = state
        .time_slots
        .release_slot(&admin_id, date, &payload.time)
        .await?;

    Ok(Json(day))
}
