use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/users/:user_id/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::notification::mark_as_read),
        )
}
