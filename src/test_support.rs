//! In-process fake of the Auth0 management API, the GitHub users API and a
//! Slack webhook, for tests that exercise real HTTP round trips.

use axum::{
    extract::{Form, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use crate::common::AppConfig;

pub struct FakeState {
    pub token_requests: AtomicUsize,
    pub token_status: Mutex<StatusCode>,
    pub expires_in: Mutex<Option<i64>>,
    pub last_token_form: Mutex<HashMap<String, String>>,
    pub orgs: Mutex<Vec<Value>>,
    pub orgs_status: Mutex<StatusCode>,
    pub orgs_delay: Mutex<Option<Duration>>,
    pub org_queries: Mutex<Vec<HashMap<String, String>>>,
    pub members: Mutex<HashMap<String, Vec<Value>>>,
    pub members_status: Mutex<StatusCode>,
    pub member_requests: Mutex<Vec<String>>,
    pub bearer_tokens: Mutex<Vec<String>>,
    pub github_users: Mutex<HashMap<String, String>>,
    pub github_requests: Mutex<Vec<String>>,
    pub webhook_status: Mutex<StatusCode>,
    pub webhook_messages: Mutex<Vec<String>>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            token_requests: AtomicUsize::new(0),
            token_status: Mutex::new(StatusCode::OK),
            expires_in: Mutex::new(Some(86400)),
            last_token_form: Mutex::new(HashMap::new()),
            orgs: Mutex::new(Vec::new()),
            orgs_status: Mutex::new(StatusCode::OK),
            orgs_delay: Mutex::new(None),
            org_queries: Mutex::new(Vec::new()),
            members: Mutex::new(HashMap::new()),
            members_status: Mutex::new(StatusCode::OK),
            member_requests: Mutex::new(Vec::new()),
            bearer_tokens: Mutex::new(Vec::new()),
            github_users: Mutex::new(HashMap::new()),
            github_requests: Mutex::new(Vec::new()),
            webhook_status: Mutex::new(StatusCode::OK),
            webhook_messages: Mutex::new(Vec::new()),
        }
    }
}

impl FakeState {
    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn set_orgs(&self, orgs: Vec<Value>) {
        *self.orgs.lock().unwrap() = orgs;
    }

    pub fn set_members(&self, org_id: &str, members: Vec<Value>) {
        self.members
            .lock()
            .unwrap()
            .insert(org_id.to_string(), members);
    }

    pub fn add_github_user(&self, id: &str, html_url: &str) {
        self.github_users
            .lock()
            .unwrap()
            .insert(id.to_string(), html_url.to_string());
    }

    pub fn webhook_messages(&self) -> Vec<String> {
        self.webhook_messages.lock().unwrap().clone()
    }
}

pub fn org(id: &str) -> Value {
    json!({
        "id": id,
        "name": id.to_lowercase(),
        "display_name": format!("Org {}", id),
    })
}

pub fn member(user_id: &str, name: &str, email: &str) -> Value {
    json!({ "user_id": user_id, "name": name, "email": email })
}

/// Serve the fake on an ephemeral port and return its base URL.
pub async fn spawn(state: Arc<FakeState>) -> String {
    let app = Router::new()
        .route("/oauth/token", post(token))
        .route("/api/v2/organizations", get(organizations))
        .route("/api/v2/organizations/:id/members", get(members))
        .route("/github/user/:id", get(github_user))
        .route("/webhook", post(webhook))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Base URL of a port nothing listens on, for connection failures.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Configuration pointing every external service at `base`.
pub fn config(base: &str, snapshot: &std::path::Path) -> AppConfig {
    let webhook = format!("{}/webhook", base);
    let github = format!("{}/github", base);
    let snapshot = snapshot.to_string_lossy().to_string();
    let vars = HashMap::from([
        ("AUTH0_DOMAIN", "tenant.example.com"),
        ("AUTH0_BASE_URL", base),
        ("AUTH0_CLIENT_ID", "client-id"),
        ("AUTH0_CLIENT_SECRET", "client-secret"),
        ("SLACK_WEBHOOK_URL", webhook.as_str()),
        ("GITHUB_API_URL", github.as_str()),
        ("PREVIOUS_ORGS_FILE", snapshot.as_str()),
        ("POLL_INTERVAL_SECS", "60"),
        ("RETRY_INTERVAL_SECS", "300"),
    ]);
    AppConfig::from_map(&vars)
}

fn record_bearer(state: &FakeState, headers: &HeaderMap) {
    if let Some(token) = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.bearer_tokens.lock().unwrap().push(token.to_string());
    }
}

async fn token(
    State(state): State<Arc<FakeState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let n = state.token_requests.fetch_add(1, Ordering::SeqCst) + 1;
    *state.last_token_form.lock().unwrap() = form;

    let status = *state.token_status.lock().unwrap();
    if !status.is_success() {
        return (status, "access_denied").into_response();
    }

    let mut body = json!({ "access_token": format!("token-{}", n), "token_type": "Bearer" });
    if let Some(expires_in) = *state.expires_in.lock().unwrap() {
        body["expires_in"] = json!(expires_in);
    }
    Json(body).into_response()
}

async fn organizations(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record_bearer(&state, &headers);
    state.org_queries.lock().unwrap().push(query);

    let delay = *state.orgs_delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let status = *state.orgs_status.lock().unwrap();
    if !status.is_success() {
        return (status, "upstream unavailable").into_response();
    }
    Json(state.orgs.lock().unwrap().clone()).into_response()
}

async fn members(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    record_bearer(&state, &headers);
    state.member_requests.lock().unwrap().push(id.clone());

    let status = *state.members_status.lock().unwrap();
    if !status.is_success() {
        return (status, "insufficient scope").into_response();
    }
    let members = state
        .members
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .unwrap_or_default();
    Json(members).into_response()
}

async fn github_user(State(state): State<Arc<FakeState>>, Path(id): Path<String>) -> Response {
    state.github_requests.lock().unwrap().push(id.clone());

    match state.github_users.lock().unwrap().get(&id) {
        Some(url) => Json(json!({ "id": id, "html_url": url })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response(),
    }
}

async fn webhook(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    let status = *state.webhook_status.lock().unwrap();
    if let Some(text) = body.get("text").and_then(Value::as_str) {
        state
            .webhook_messages
            .lock()
            .unwrap()
            .push(text.to_string());
    }
    (status, "ok").into_response()
}
