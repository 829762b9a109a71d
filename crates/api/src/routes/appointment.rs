use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            post(handlers::appointment::create_appointment)
                .get(handlers::appointment::list_appointments),
        )
        .route(
            "/api/appointments/:id",
            get(handlers::appointment::get_appointment)
                .patch(handlers::appointment::update_appointment),
        )
        .route(
            "/api/appointments/:id/cancel",
            post(handlers::appointment::cancel_appointment),
        )
        .route(
            "/api/appointments/:id/complete",
            post(handlers::appointment::complete_appointment),
        )
}
