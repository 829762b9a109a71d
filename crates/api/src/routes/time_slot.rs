use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/time-slot-days",
            post(handlers::time_slot::create_or_update_day),
        )
        .route(
            "/api/time-slot-days/:admin_id",
            get(handlers::time_slot::get_month),
        )
        .route(
            "/api/time-slot-days/:admin_id/:date",
            get(handlers::time_slot::get_day),
        )
        .route(
            "/api/time-slot-days/:admin_id/:date/book",
            post(handlers::time_slot::book_slot),
        )
        .route(
            "/api/time-slot-days/:admin_id/:date/release",
            post(handlers::time_slot::release_slot),
        )
}
