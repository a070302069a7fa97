//! In-process fake of the academic-records API for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const VALID_TOKEN: &str = "test-token";
pub const ADMIN_EMAIL: &str = "admin@example.edu";
pub const STUDENT_EMAIL: &str = "student@example.edu";
pub const PASSWORD: &str = "secret";

const CREATED_AT: &str = "2024-09-01T08:00:00";
const UPDATED_AT: &str = "2024-09-02T09:30:00";

#[derive(Default)]
struct Collections {
    next_id: i64,
    items: HashMap<String, BTreeMap<i64, Value>>,
}

#[derive(Clone, Default)]
pub struct Shared(Arc<Mutex<Collections>>);

pub struct FakeApi {
    pub base_url: String,
    state: Shared,
}

impl FakeApi {
    pub async fn spawn() -> Self {
        let state = Shared::default();
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake api");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve fake api");
        });
        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Insert an entity as the server would store it and return its id.
    pub fn seed(&self, collection: &str, mut fields: Value) -> i64 {
        let mut guard = self.state.0.lock().expect("lock");
        guard.next_id += 1;
        let id = guard.next_id;
        if let Some(obj) = fields.as_object_mut() {
            obj.insert("id".into(), json!(id));
            obj.insert("createdAt".into(), json!(CREATED_AT));
            obj.insert("updatedAt".into(), json!(CREATED_AT));
        }
        guard
            .items
            .entry(collection.to_string())
            .or_default()
            .insert(id, fields);
        id
    }

    pub fn stored(&self, collection: &str, id: i64) -> Option<Value> {
        let guard = self.state.0.lock().expect("lock");
        guard.items.get(collection).and_then(|c| c.get(&id)).cloned()
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/{collection}", get(list).post(create))
        .route(
            "/api/{collection}/{id}",
            get(fetch).put(update).delete(remove),
        )
        .route("/api/{collection}/stats/count", get(count))
        .with_state(state)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", VALID_TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Full authentication is required"})))
        .into_response()
}

fn not_found(collection: &str, id: i64) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": format!("{} {} not found", collection, id)})),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    let roles = match email {
        ADMIN_EMAIL => json!(["ROLE_ADMIN", "ROLE_TEACHER"]),
        STUDENT_EMAIL => json!(["ROLE_STUDENT"]),
        _ => json!(null),
    };
    if roles.is_null() || password != PASSWORD {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"})))
            .into_response();
    }

    Json(json!({
        "token": VALID_TOKEN,
        "type": "Bearer",
        "id": 1,
        "email": email,
        "firstName": "Test",
        "lastName": "User",
        "roles": roles,
    }))
    .into_response()
}

async fn list(
    State(state): State<Shared>,
    Path(collection): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let guard = state.0.lock().expect("lock");
    let items: Vec<Value> = guard
        .items
        .get(&collection)
        .map(|c| c.values().cloned().collect())
        .unwrap_or_default();
    Json(items).into_response()
}

async fn fetch(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let guard = state.0.lock().expect("lock");
    match guard.items.get(&collection).and_then(|c| c.get(&id)) {
        Some(item) => Json(item.clone()).into_response(),
        None => not_found(&collection, id),
    }
}

async fn create(
    State(state): State<Shared>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut guard = state.0.lock().expect("lock");
    guard.next_id += 1;
    let id = guard.next_id;
    if let Some(obj) = body.as_object_mut() {
        obj.insert("id".into(), json!(id));
        obj.insert("createdAt".into(), json!(CREATED_AT));
        obj.insert("updatedAt".into(), json!(CREATED_AT));
    }
    guard
        .items
        .entry(collection)
        .or_default()
        .insert(id, body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, i64)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut guard = state.0.lock().expect("lock");
    let Some(existing) = guard.items.get_mut(&collection).and_then(|c| c.get_mut(&id)) else {
        return not_found(&collection, id);
    };
    if let (Some(target), Some(changes)) = (existing.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            if key == "id" || key == "createdAt" || key == "updatedAt" {
                continue;
            }
            target.insert(key.clone(), value.clone());
        }
        target.insert("updatedAt".into(), json!(UPDATED_AT));
    }
    Json(existing.clone()).into_response()
}

async fn remove(
    State(state): State<Shared>,
    Path((collection, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut guard = state.0.lock().expect("lock");
    match guard.items.get_mut(&collection).and_then(|c| c.remove(&id)) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(&collection, id),
    }
}

async fn count(
    State(state): State<Shared>,
    Path(collection): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let guard = state.0.lock().expect("lock");
    let total = guard.items.get(&collection).map(|c| c.len()).unwrap_or(0);
    Json(json!(total)).into_response()
}
