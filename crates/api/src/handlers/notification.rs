use axum::{
    extract::{Path, State},
    Json,
};
use mentorbook_core::{models::notification::Notification, store::NotificationStore};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(state.notifications.find_by_recipient_id(&user_id).await?))
}

#[axum::debug_handler]
pub async fn mark_as_read(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, AppError> {
    Ok(Json(state.notifications.mark_as_read(id).await?))
}
