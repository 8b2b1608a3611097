//! Test doubles: an in-process mock of the feedback backend and a sink
//! that records every notification.

use crate::backend::{BackendClient, BackendSettings};
use crate::notify::{Notification, NotificationKind, NotificationSink};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Data served for one employee. Arrays are served verbatim so tests can
/// exercise malformed payloads; `Value::Null` is served as a 200 with an
/// empty body.
#[derive(Debug, Clone)]
pub struct EmployeeFixture {
    pub reviews: Value,
    pub aspect_summaries: Value,
    pub general_summaries: Value,
    pub psychotype: Value,
    /// Summary prepended to `general_summaries` when analysis is triggered.
    pub pending_summary: Option<Value>,
    /// Artificial latency for every per-employee GET.
    pub delay_ms: u64,
    /// Artificial latency of the analysis trigger.
    pub trigger_delay_ms: u64,
}

impl Default for EmployeeFixture {
    fn default() -> Self {
        Self {
            reviews: json!([]),
            aspect_summaries: json!([]),
            general_summaries: json!([]),
            psychotype: json!({"psychotype": null, "psychotype_description": null}),
            pending_summary: None,
            delay_ms: 0,
            trigger_delay_ms: 0,
        }
    }
}

impl EmployeeFixture {
    pub fn sample() -> Self {
        Self {
            reviews: json!([
                {"ID_reviewer": 11, "ID_under_review": 1, "review": "Explains decisions clearly", "weight": 0.8, "is_self_review": false},
                {"ID_reviewer": 1, "ID_under_review": 1, "review": "I should delegate more", "weight": 0.4, "is_self_review": true}
            ]),
            aspect_summaries: json!([
                {"aspect_name": "Communication", "score": 4.4, "text": "Clear and timely", "created_at": "2024-10-12T09:30:00Z"}
            ]),
            general_summaries: json!([
                {"score": 4.2, "text": "Latest review cycle", "created_at": "2024-10-12T09:30:00Z"},
                {"score": 3.9, "text": "Previous review cycle", "created_at": "2024-04-02T11:00:00Z"}
            ]),
            psychotype: json!({"psychotype": "ENFJ", "psychotype_description": "Warm and organised"}),
            pending_summary: None,
            delay_ms: 0,
            trigger_delay_ms: 0,
        }
    }
}

#[derive(Default)]
struct MockData {
    aspects: Vec<Value>,
    next_aspect_id: i64,
    employees: HashMap<i64, EmployeeFixture>,
    fail_aspect_writes: bool,
    fail_trigger: bool,
    blank_aspect_body: bool,
    hits: HashMap<String, usize>,
}

#[derive(Clone, Default)]
struct MockState {
    inner: Arc<Mutex<MockData>>,
}

impl MockState {
    fn hit(&self, key: String) {
        let mut data = self.inner.lock().unwrap();
        *data.hits.entry(key).or_default() += 1;
    }
}

/// Handle to a mock backend listening on a random local port.
pub struct MockBackend {
    state: MockState,
    base_url: String,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = MockState::default();
        state.inner.lock().unwrap().next_aspect_id = 1;

        let api = Router::new()
            .route("/aspects", get(list_aspects).post(create_aspect))
            .route("/aspects/:id", delete(delete_aspect))
            .route("/feedback/:id", get(reviews))
            .route("/aspect-summaries/:id", get(aspect_summaries))
            .route("/general-summaries/:id", get(general_summaries))
            .route("/feedback/generate-summary/:id", post(generate_summary))
            .route("/employees/feedback-count", get(roster))
            .route("/employee/:id/psychotype", get(psychotype))
            .with_state(state.clone());
        let app = Router::new().nest("/reviews/api", api);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            state,
            base_url: format!("http://{}/reviews/api", addr),
        }
    }

    pub fn client(&self) -> BackendClient {
        BackendClient::new(&BackendSettings {
            base_url: self.base_url.clone(),
            timeout_seconds: Some(5),
        })
        .unwrap()
    }

    pub fn add_aspect(&self, text: &str) {
        let mut data = self.state.inner.lock().unwrap();
        let id = data.next_aspect_id;
        data.next_aspect_id += 1;
        data.aspects.push(json!({"id": id, "text": text}));
    }

    pub fn add_employee(&self, id: i64, fixture: EmployeeFixture) {
        self.state.inner.lock().unwrap().employees.insert(id, fixture);
    }

    pub fn fail_aspect_writes(&self, fail: bool) {
        self.state.inner.lock().unwrap().fail_aspect_writes = fail;
    }

    /// Answer `GET /aspects` with a 200 and no body at all.
    pub fn blank_aspect_body(&self, blank: bool) {
        self.state.inner.lock().unwrap().blank_aspect_body = blank;
    }

    pub fn fail_trigger(&self, fail: bool) {
        self.state.inner.lock().unwrap().fail_trigger = fail;
    }

    /// Number of requests seen for a `"METHOD /path"` key.
    pub fn hits(&self, key: &str) -> usize {
        self.state
            .inner
            .lock()
            .unwrap()
            .hits
            .get(key)
            .copied()
            .unwrap_or_default()
    }

    pub fn total_hits(&self) -> usize {
        self.state.inner.lock().unwrap().hits.values().sum()
    }
}

async fn list_aspects(State(state): State<MockState>) -> Response {
    state.hit("GET /aspects".to_string());
    let data = state.inner.lock().unwrap();
    if data.blank_aspect_body {
        return StatusCode::OK.into_response();
    }
    Json(Value::Array(data.aspects.clone())).into_response()
}

async fn create_aspect(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.hit("POST /aspects".to_string());
    let mut data = state.inner.lock().unwrap();
    if data.fail_aspect_writes {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "boom"})));
    }
    let id = data.next_aspect_id;
    data.next_aspect_id += 1;
    let aspect = json!({"id": id, "text": body["text"]});
    data.aspects.push(aspect.clone());
    (StatusCode::CREATED, Json(aspect))
}

async fn delete_aspect(State(state): State<MockState>, Path(id): Path<i64>) -> impl IntoResponse {
    state.hit(format!("DELETE /aspects/{}", id));
    let mut data = state.inner.lock().unwrap();
    if data.fail_aspect_writes {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let before = data.aspects.len();
    data.aspects.retain(|a| a["id"].as_i64() != Some(id));
    if data.aspects.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn employee_resource(
    state: &MockState,
    key: String,
    id: i64,
    pick: fn(&EmployeeFixture) -> Value,
) -> Response {
    state.hit(key);
    let delay = state
        .inner
        .lock()
        .unwrap()
        .employees
        .get(&id)
        .map(|f| f.delay_ms)
        .unwrap_or_default();
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let data = state.inner.lock().unwrap();
    match data.employees.get(&id).map(pick) {
        Some(Value::Null) => StatusCode::OK.into_response(),
        Some(body) => (StatusCode::OK, Json(body)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Employee not found."})),
        )
            .into_response(),
    }
}

async fn reviews(State(state): State<MockState>, Path(id): Path<i64>) -> impl IntoResponse {
    employee_resource(&state, format!("GET /feedback/{}", id), id, |f| {
        f.reviews.clone()
    })
    .await
}

async fn aspect_summaries(
    State(state): State<MockState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    employee_resource(&state, format!("GET /aspect-summaries/{}", id), id, |f| {
        f.aspect_summaries.clone()
    })
    .await
}

async fn general_summaries(
    State(state): State<MockState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    employee_resource(&state, format!("GET /general-summaries/{}", id), id, |f| {
        f.general_summaries.clone()
    })
    .await
}

async fn psychotype(State(state): State<MockState>, Path(id): Path<i64>) -> impl IntoResponse {
    employee_resource(&state, format!("GET /employee/{}/psychotype", id), id, |f| {
        f.psychotype.clone()
    })
    .await
}

async fn generate_summary(
    State(state): State<MockState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state.hit(format!("POST /feedback/generate-summary/{}", id));
    let delay = state
        .inner
        .lock()
        .unwrap()
        .employees
        .get(&id)
        .map(|f| f.trigger_delay_ms)
        .unwrap_or_default();
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let mut data = state.inner.lock().unwrap();
    if data.fail_trigger {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "LLM unavailable"})),
        );
    }
    let Some(fixture) = data.employees.get_mut(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Employee not found."})),
        );
    };
    if let Some(summary) = fixture.pending_summary.take() {
        if let Value::Array(items) = &mut fixture.general_summaries {
            items.insert(0, summary);
        }
    }
    (StatusCode::OK, Json(json!({"message": "analysis complete"})))
}

async fn roster(State(state): State<MockState>) -> impl IntoResponse {
    state.hit("GET /employees/feedback-count".to_string());
    let data = state.inner.lock().unwrap();
    let mut ids: Vec<_> = data.employees.keys().copied().collect();
    ids.sort();
    let rows: Vec<Value> = ids
        .into_iter()
        .map(|id| {
            let fixture = &data.employees[&id];
            json!({
                "employee_id": id,
                "created_at": null,
                "psychotype": fixture.psychotype["psychotype"],
                "psychotype_description": fixture.psychotype["psychotype_description"],
                "feedback_count": fixture.reviews.as_array().map(|r| r.len()).unwrap_or_default(),
            })
        })
        .collect();
    Json(Value::Array(rows))
}

/// Sink that keeps every notification for later assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notes: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notes.lock().unwrap().clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.lock().unwrap().is_empty()
    }
}

impl NotificationSink for RecordingSink {
    fn show(&self, notification: Notification) {
        self.notes.lock().unwrap().push(notification);
    }
}
