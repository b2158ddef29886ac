// Stub of the hosted backend (auth, profiles table, functions) for integration tests.
#![allow(dead_code)]

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use url::Url;

pub const JANE_ID: &str = "6f1c2d9e-0000-4000-8000-000000000001";
pub const JANE_EMAIL: &str = "jane@example.com";
// Signs in with an already-expired access token.
pub const STALE_EMAIL: &str = "stale@example.com";
pub const PASSWORD: &str = "secret-pass";
pub const ANON_KEY: &str = "anon-test-key";

// One request as the stub saw it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Value,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[derive(Clone, Default)]
struct StubState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

pub struct StubBackend {
    pub base_url: Url,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubBackend {
    pub fn functions_url(&self) -> Url {
        self.base_url.join("functions/v1").expect("functions url")
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<CapturedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }
}

// Bind an ephemeral port and serve the stub on the current runtime.
pub async fn spawn_backend() -> StubBackend {
    let state = StubState::default();
    let app = Router::new().fallback(handle).with_state(state.clone());

    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });

    StubBackend {
        base_url: Url::parse(&format!("http://{addr}/")).expect("stub url"),
        requests: state.requests,
    }
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let request = CapturedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    };
    state
        .requests
        .lock()
        .expect("requests mutex poisoned")
        .push(request.clone());

    let query = request.query.as_deref().unwrap_or_default();
    match (method, request.path.as_str()) {
        (Method::POST, "/auth/v1/token") if query.contains("grant_type=password") => {
            password_grant(&request.body)
        }
        (Method::POST, "/auth/v1/token") if query.contains("grant_type=refresh_token") => {
            refresh_grant(&request.body)
        }
        (Method::POST, "/auth/v1/signup") => {
            (StatusCode::OK, axum::Json(json!({ "id": JANE_ID }))).into_response()
        }
        (Method::POST, "/auth/v1/logout") => StatusCode::NO_CONTENT.into_response(),
        (Method::GET, "/rest/v1/profiles") => {
            let rows = if query.contains(JANE_ID) {
                json!([{
                    "id": 7,
                    "user_id": JANE_ID,
                    "first_name": "Jane",
                    "last_name": "Doe",
                    "phone": "+254700000000",
                    "location": null,
                    "preference": "safari",
                    "about": null,
                    "created_at": "2030-01-01T00:00:00Z"
                }])
            } else {
                json!([])
            };
            (StatusCode::OK, axum::Json(rows)).into_response()
        }
        (Method::POST, "/rest/v1/profiles") => StatusCode::CREATED.into_response(),
        (Method::POST, "/functions/v1/rejecting") => (
            StatusCode::OK,
            axum::Json(json!({ "ok": false, "error": "Slot already taken" })),
        )
            .into_response(),
        (Method::POST, "/functions/v1/crashing") => {
            (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>").into_response()
        }
        (Method::POST, "/functions/v1/slow") => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, axum::Json(json!({ "ok": true }))).into_response()
        }
        (Method::POST, path) if path.starts_with("/functions/v1/") => {
            (StatusCode::OK, axum::Json(json!({ "ok": true }))).into_response()
        }
        _ => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "message": "no such route" })),
        )
            .into_response(),
    }
}

fn token(access_token: &str, refresh_token: &str, email: &str, expiry: Value) -> Value {
    let mut body = json!({
        "access_token": access_token,
        "token_type": "bearer",
        "refresh_token": refresh_token,
        "user": {
            "id": JANE_ID,
            "email": email,
            "user_metadata": { "first_name": "Jane", "last_name": "Doe", "country": "Kenya" }
        }
    });
    if let (Some(fields), Some(expiry)) = (body.as_object_mut(), expiry.as_object()) {
        fields.extend(expiry.clone());
    }
    body
}

fn password_grant(body: &Value) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match (email, password == PASSWORD) {
        (JANE_EMAIL, true) => axum::Json(token(
            "jane-token",
            "jane-refresh",
            email,
            json!({ "expires_in": 3600 }),
        ))
        .into_response(),
        (STALE_EMAIL, true) => axum::Json(token(
            "stale-token",
            "jane-refresh",
            email,
            json!({ "expires_at": 1 }),
        ))
        .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })),
        )
            .into_response(),
    }
}

fn refresh_grant(body: &Value) -> Response {
    if body["refresh_token"] == "jane-refresh" {
        return axum::Json(token(
            "refreshed-token",
            "jane-refresh-2",
            JANE_EMAIL,
            json!({ "expires_in": 3600 }),
        ))
        .into_response();
    }
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({ "msg": "Invalid Refresh Token" })),
    )
        .into_response()
}
