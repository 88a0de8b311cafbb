//! In-process stand-in for the StackSlice backend.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use slice_client::{ApiClient, Credentials};

pub const TOKEN: &str = "test-token";
pub const PASSWORD: &str = "correct-horse";

#[derive(Debug, Clone)]
pub struct ReceivedUpload {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

#[derive(Default)]
pub struct MockBackend {
    scripts: Mutex<HashMap<String, VecDeque<(StatusCode, Value)>>>,
    status_requests: Mutex<Vec<String>>,
    auth_headers: Mutex<Vec<Option<String>>>,
    uploads: Mutex<Vec<ReceivedUpload>>,
    upload_delay: Mutex<Duration>,
}

impl MockBackend {
    /// Queue responses for `GET /jobs/{job_id}`, served in order.
    pub fn script(&self, job_id: &str, responses: Vec<(StatusCode, Value)>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(job_id.to_string(), responses.into());
    }

    pub fn status_requests(&self, job_id: &str) -> usize {
        self.status_requests
            .lock()
            .unwrap()
            .iter()
            .filter(|id| id.as_str() == job_id)
            .count()
    }

    pub fn auth_headers(&self) -> Vec<Option<String>> {
        self.auth_headers.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    /// Stall each upload this long before reading its body.
    pub fn delay_uploads(&self, delay: Duration) {
        *self.upload_delay.lock().unwrap() = delay;
    }
}

pub fn snapshot(job_id: &str, status: &str, progress: u8, message: &str) -> Value {
    json!({
        "job_id": job_id,
        "status": status,
        "progress_percent": progress,
        "message": message,
        "results": null
    })
}

pub fn completed(job_id: &str, hooks: &[&str]) -> Value {
    json!({
        "job_id": job_id,
        "status": "completed",
        "progress_percent": 100,
        "message": "Job is completed",
        "results": {
            "transcript": "Today I'm sharing my top 3 productivity hacks",
            "viral_hooks": hooks,
            "captions": [
                {
                    "caption": "Hack #3 changed everything",
                    "hashtags": ["#fyp", "#productivity"],
                    "character_count": 44
                }
            ],
            "clips": [
                { "start_time": 3.0, "end_time": 18.5, "duration": 15.5, "description": "Opening hook" }
            ],
            "download_url": "https://cdn.example.com/results/job.zip"
        }
    })
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn detail(status: StatusCode, text: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": text })))
}

async fn job_status(
    State(backend): State<Arc<MockBackend>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    backend.status_requests.lock().unwrap().push(job_id.clone());
    backend.auth_headers.lock().unwrap().push(bearer(&headers));

    let next = backend
        .scripts
        .lock()
        .unwrap()
        .get_mut(&job_id)
        .and_then(|queue| queue.pop_front());

    match next {
        Some((status, body)) => (status, Json(body)),
        None => detail(StatusCode::NOT_FOUND, "Job not found"),
    }
}

async fn upload(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let expected = format!("Bearer {}", TOKEN);
    if bearer(&headers).as_deref() != Some(expected.as_str()) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }

    let delay = *backend.upload_delay.lock().unwrap();
    tokio::time::sleep(delay).await;

    while let Ok(Some(field)) = multipart.next_field().await {
        let received = ReceivedUpload {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            size: 0,
        };
        let size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        backend.uploads.lock().unwrap().push(ReceivedUpload { size, ..received });
    }

    let job_id = uuid::Uuid::new_v4().to_string();
    (
        StatusCode::OK,
        Json(json!({
            "video_id": uuid::Uuid::new_v4().to_string(),
            "job_id": job_id,
            "credits_used": 1,
            "credits_remaining": 9,
            "message": "Upload successful! Processing started. Used 1 credits."
        })),
    )
}

#[derive(Deserialize)]
struct Login {
    email: String,
    password: String,
}

fn token_for(email: &str) -> Value {
    json!({
        "access_token": TOKEN,
        "token_type": "bearer",
        "user": {
            "id": "user-1",
            "email": email,
            "subscription_tier": "creator",
            "credits_remaining": 1000
        }
    })
}

async fn login(Json(body): Json<Login>) -> (StatusCode, Json<Value>) {
    if body.password != PASSWORD {
        return detail(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    (StatusCode::OK, Json(token_for(&body.email)))
}

async fn signup(Json(body): Json<Login>) -> (StatusCode, Json<Value>) {
    if body.email == "taken@example.com" {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    (StatusCode::OK, Json(token_for(&body.email)))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "database": "connected", "version": "1.0.0" }))
}

async fn slow_health() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    health().await
}

async fn garbage() -> (StatusCode, &'static str) {
    (StatusCode::OK, "<html>not json</html>")
}

pub async fn start() -> (Arc<MockBackend>, SocketAddr) {
    let backend = Arc::new(MockBackend::default());

    let app = Router::new()
        .route("/jobs/{job_id}", get(job_status))
        .route("/upload", post(upload))
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/health", get(health))
        .route("/broken/health", get(garbage))
        .route("/slow/health", get(slow_health))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (backend, addr)
}

pub fn client(addr: SocketAddr) -> ApiClient {
    ApiClient::builder()
        .base_url(format!("http://{}", addr))
        .credentials(Credentials::bearer(TOKEN))
        .build()
        .unwrap()
}
