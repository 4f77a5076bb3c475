//! In-process fake of the taskboard REST backend, served on 127.0.0.1:0.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

pub const PASSWORD: &str = "correct horse";
pub const MEMBER_ID: &str = "m-1";
pub const EMAIL: &str = "dev@team.io";

#[derive(Default)]
pub struct Backend {
    pub token: String,
    pub tasks: Vec<Value>,
    /// Status updates fail with 500 while set.
    pub fail_status_updates: bool,
    /// Every request is answered with 401 while set.
    pub reject_all: bool,
    pub status_calls: Vec<(String, String)>,
    pub board_fetches: usize,
}

pub type Shared = Arc<Mutex<Backend>>;

pub fn task(id: &str, name: &str, status: &str) -> Value {
    json!({
        "taskId": id,
        "taskName": name,
        "taskStatus": status,
        "taskDetail": "",
        "taskProjectId": "p-1",
        "taskParticipants": [],
        "taskComments": []
    })
}

pub fn seeded() -> Shared {
    Arc::new(Mutex::new(Backend {
        token: uuid::Uuid::new_v4().to_string(),
        tasks: vec![
            task("t1", "Wireframes", "TODO"),
            task("t2", "Copy deck", "TODO"),
            task("t3", "API review", "PROGRESS"),
            task("t4", "Launch", "DONE"),
        ],
        ..Default::default()
    }))
}

fn authorized(backend: &Backend, headers: &HeaderMap) -> bool {
    if backend.reject_all {
        return false;
    }
    let expected = format!("Bearer {}", backend.token);
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

async fn login(State(shared): State<Shared>, Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    let backend = shared.lock().unwrap();
    if body["email"] != EMAIL || body["password"] != PASSWORD {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({
        "token": backend.token,
        "memberId": MEMBER_ID,
        "detail": {
            "memberEmail": EMAIL,
            "memberName": "Dev",
            "memberLastname": "Eloper",
            "username": "dev"
        }
    })))
}

async fn board(
    State(shared): State<Shared>,
    Path(_project_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = shared.lock().unwrap();
    if !authorized(&backend, &headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    backend.board_fetches += 1;
    Ok(Json(Value::Array(backend.tasks.clone())))
}

async fn update_status(
    State(shared): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> StatusCode {
    let mut backend = shared.lock().unwrap();
    if !authorized(&backend, &headers) {
        return StatusCode::UNAUTHORIZED;
    }
    let (Some(id), Some(status)) = (params.get("t").cloned(), params.get("s").cloned()) else {
        return StatusCode::BAD_REQUEST;
    };
    backend.status_calls.push((id.clone(), status.clone()));
    if backend.fail_status_updates {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match backend.tasks.iter_mut().find(|t| t["taskId"] == id.as_str()) {
        Some(t) => {
            t["taskStatus"] = Value::String(status);
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn notifications(
    State(shared): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let backend = shared.lock().unwrap();
    if !authorized(&backend, &headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if params.get("m").map(String::as_str) != Some(MEMBER_ID) {
        return Ok(Json(json!([])));
    }
    Ok(Json(json!([
        {"notificationId": "n-1", "notificationDetail": "Added to Wireframes",
         "notificationStatus": "UN_READ", "type": "TASK"},
        {"notificationId": "n-2", "notificationDetail": "Project created",
         "notificationStatus": "READ", "type": "PROJECT"}
    ])))
}

pub fn router(shared: Shared) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/task/update-status", put(update_status))
        .route("/notification", get(notifications))
        .route("/{project_id}/task", get(board))
        .with_state(shared)
}

/// Serve the fake on an ephemeral port and return its base URL.
pub async fn spawn(shared: Shared) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(shared);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
