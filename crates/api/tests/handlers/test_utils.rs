use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use mentorbook_api::{app, ApiState};
use serde_json::{json, Value};
use tower::ServiceExt;

pub struct TestContext {
    pub state: Arc<ApiState>,
    pub app: Router,
}

impl TestContext {
    /// A router over fresh in-memory stores
    pub fn new() -> Self {
        Self::with_state(ApiState::in_memory())
    }

    pub fn with_state(state: ApiState) -> Self {
        let state = Arc::new(state);
        Self {
            app: app(state.clone()),
            state,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response was not JSON")
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Publishes a calendar for `adm1` on 2025-11-01 with the given times
    pub async fn publish_day(&self, times: &[&str]) -> Value {
        let slots: Vec<Value> = times.iter().map(|t| json!({ "time": t })).collect();
        let (status, body) = self
            .post(
                "/api/time-slot-days",
                json!({ "admin_id": "adm1", "date": "2025-11-01", "slots": slots }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "publish failed: {body}");
        body
    }

    pub async fn book(&self, student_id: &str, time: &str) -> (StatusCode, Value) {
        self.post(
            "/api/appointments",
            json!({
                "student_id": student_id,
                "admin_id": "adm1",
                "date": "2025-11-01",
                "time": time,
            }),
        )
        .await
    }
}

/// The slot with `time` in a serialized calendar
pub fn slot<'a>(day: &'a Value, time: &str) -> &'a Value {
    day["slots"]
        .as_array()
        .expect("slots must be an array")
        .iter()
        .find(|slot| slot["time"] == time)
        .unwrap_or_else(|| panic!("no slot {time} in {day}"))
}
