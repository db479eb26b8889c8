//! Common test utilities for client integration tests
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};

use choosepure_client::{
    AppState, CheckoutWidget, ClientError, ClientResult, Config, Confirm, GatewayOutcome,
    InMemoryStorage, Navigator, Notification, Notifier, Route, Storage,
};
use choosepure_core::{AuthToken, CheckoutOptions, Session, UserId, UserProfile};

// ============================================================================
// Fake backend
// ============================================================================

/// A request as the fake backend saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path below `/api`
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct Script {
    responses: HashMap<String, VecDeque<(u16, Value)>>,
    log: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<Script>>;

/// In-process REST backend with scripted responses keyed by `METHOD /path`.
///
/// Queued responses are served in order; the last one keeps being served.
/// Unscripted routes answer 404.
pub struct FakeBackend {
    pub url: String,
    script: Shared,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let script: Shared = Arc::new(Mutex::new(Script::default()));
        let app = Router::new().fallback(handle).with_state(script.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            script,
        }
    }

    /// Queue a response for `method path`
    pub fn on(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.script
            .lock()
            .unwrap()
            .responses
            .entry(format!("{} {}", method, path))
            .or_default()
            .push_back((status, body));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().unwrap().log.clone()
    }

    /// Requests made to `method path`
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    pub fn config(&self) -> Config {
        Config::for_backend(self.url.clone())
    }
}

async fn handle(
    State(script): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut script = script.lock().unwrap();
    script.log.push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization,
        body,
    });

    let key = format!("{} {}", method, path);
    let response = match script.responses.get_mut(&key) {
        Some(queue) if queue.len() > 1 => queue.pop_front(),
        Some(queue) => queue.front().cloned(),
        None => None,
    };

    match response {
        Some((status, body)) => (StatusCode::from_u16(status).unwrap(), Json(body)),
        None => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" }))),
    }
}

// ============================================================================
// Recording UI
// ============================================================================

/// Records notifications, redirects and confirmation prompts
#[derive(Default)]
pub struct RecordingUi {
    pub notifications: RwLock<Vec<Notification>>,
    pub redirects: RwLock<Vec<Route>>,
    pub prompts: RwLock<Vec<String>>,
    confirm_answer: RwLock<bool>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_confirm(&self, answer: bool) {
        *self.confirm_answer.write().unwrap() = answer;
    }

    pub fn titles(&self) -> Vec<String> {
        self.notifications
            .read()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.read().unwrap().last().cloned()
    }

    pub fn has_title(&self, title: &str) -> bool {
        self.titles().iter().any(|t| t == title)
    }

    pub fn redirects(&self) -> Vec<Route> {
        self.redirects.read().unwrap().clone()
    }
}

impl Notifier for RecordingUi {
    fn notify(&self, notification: Notification) {
        self.notifications.write().unwrap().push(notification);
    }
}

impl Navigator for RecordingUi {
    fn redirect(&self, route: Route) {
        self.redirects.write().unwrap().push(route);
    }
}

impl Confirm for RecordingUi {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.write().unwrap().push(prompt.to_string());
        *self.confirm_answer.read().unwrap()
    }
}

// ============================================================================
// Scripted checkout widget
// ============================================================================

/// Checkout widget that replays queued outcomes
#[derive(Default)]
pub struct ScriptedWidget {
    outcomes: Mutex<VecDeque<GatewayOutcome>>,
    fail_loads: AtomicUsize,
    pub loads: AtomicUsize,
    pub opened: Mutex<Vec<CheckoutOptions>>,
}

impl ScriptedWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, outcome: GatewayOutcome) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    /// Make the next `n` loads fail
    pub fn failing_loads(self, n: usize) -> Self {
        self.fail_loads.store(n, Ordering::SeqCst);
        self
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> Vec<CheckoutOptions> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckoutWidget for ScriptedWidget {
    async fn load(&self) -> ClientResult<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let remaining = self.fail_loads.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_loads.store(remaining - 1, Ordering::SeqCst);
            return Err(ClientError::GatewayUnavailable("script blocked".into()));
        }
        Ok(())
    }

    async fn open(&self, options: CheckoutOptions) -> GatewayOutcome {
        self.opened.lock().unwrap().push(options);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(GatewayOutcome::Dismissed)
    }
}

// ============================================================================
// App wiring
// ============================================================================

/// Build an app against `backend` with in-memory storage
pub fn create_app(backend: &FakeBackend) -> (Arc<AppState>, Arc<RecordingUi>) {
    create_app_with_storage(backend, Arc::new(InMemoryStorage::new()))
}

pub fn create_app_with_storage(
    backend: &FakeBackend,
    storage: Arc<dyn Storage>,
) -> (Arc<AppState>, Arc<RecordingUi>) {
    create_app_with_config(backend.config(), storage)
}

pub fn create_app_with_config(
    config: Config,
    storage: Arc<dyn Storage>,
) -> (Arc<AppState>, Arc<RecordingUi>) {
    let ui = Arc::new(RecordingUi::new());
    let state = AppState::new(config, storage, ui.clone(), ui.clone())
        .expect("Failed to create app state");
    (Arc::new(state), ui)
}

pub fn profile(id: &str, is_admin: bool) -> UserProfile {
    UserProfile {
        id: UserId(id.to_string()),
        name: "Asha".to_string(),
        email: "asha@example.com".to_string(),
        mobile: Some("9876543210".to_string()),
        role: Some(if is_admin { "admin" } else { "member" }.to_string()),
        is_admin,
        is_subscribed: false,
    }
}

/// Put a session in place without going through the login endpoint
pub fn sign_in(state: &AppState, token: &str, is_admin: bool) {
    state
        .session
        .establish(Session::new(AuthToken::new(token), profile("u1", is_admin)))
        .expect("Failed to establish session");
}

/// The JSON the login and register endpoints answer with
pub fn auth_body(token: &str, user_id: &str) -> Value {
    json!({
        "success": true,
        "token": token,
        "user": {
            "id": user_id,
            "name": "Asha",
            "email": "asha@example.com",
            "mobile": "9876543210",
            "role": "member",
            "isAdmin": false
        }
    })
}

pub fn unsubscribed_body() -> Value {
    json!({ "is_subscribed": false, "tier_id": null, "end_date": null, "days_remaining": 0 })
}

pub fn subscribed_body() -> Value {
    json!({
        "is_subscribed": true,
        "tier_id": "t1",
        "end_date": "2026-12-31T00:00:00",
        "days_remaining": 74
    })
}
