#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use recruitment_tracker::{
    app,
    config::Config,
    models::user::{Role, User, UserFile},
    services::offer_service::TEMPLATES,
    utils::token::issue_token,
    AppState,
};
use serde_json::Value as JsonValue;
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "test_secret_key";
pub const BOUNDARY: &str = "----tracker-test-boundary";

pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
    pub router: Router,
}

/// App rooted in a fresh temp dir with users `admin`, `hr`, `req1`, `req2`
/// and all five offer templates in place.
pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::for_data_dir(dir.path(), SECRET);

    write_users(&config.users_path);
    std::fs::create_dir_all(&config.templates_dir).expect("templates dir");
    for spec in TEMPLATES.iter() {
        write_template(&config.templates_dir.join(spec.file));
    }

    let state = AppState::new(config);
    let router = app(state.clone());
    TestApp { dir, state, router }
}

fn write_users(path: &Path) {
    let mut file = UserFile::default();
    for (username, role) in [
        ("admin", Role::Admin),
        ("hr", Role::Hr),
        ("req1", Role::Requestor),
        ("req2", Role::Requestor),
    ] {
        file.users.insert(
            username.to_string(),
            User {
                username: username.to_string(),
                name: username.to_uppercase(),
                email: format!("{}@example.com", username),
                role,
                password_hash: "not-a-real-hash".to_string(),
            },
        );
    }
    std::fs::write(path, serde_json::to_vec_pretty(&file).unwrap()).expect("users file");
}

pub fn write_template(path: &Path) {
    let mut book = umya_spreadsheet::new_file();
    let ws = book.get_sheet_by_name_mut("Sheet1").expect("Sheet1");
    ws.get_cell_mut("A4").set_value_string("Position");
    ws.get_cell_mut("A5").set_value_string("Name");
    umya_spreadsheet::writer::xlsx::write(&book, path).expect("write template");
}

pub fn token(username: &str, role: &str) -> String {
    issue_token(SECRET, username, role, 1).expect("token")
}

pub fn admin() -> String {
    token("admin", "admin")
}

pub fn hr() -> String {
    token("hr", "hr")
}

pub fn requestor(name: &str) -> String {
    token(name, "requestor")
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> JsonValue {
        if self.bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&self.bytes).expect("json body")
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).to_string()
    }

    pub fn header(&self, name: &str) -> String {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> Reply {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = to_bytes(resp.into_body(), 64 * 1024 * 1024).await.unwrap();
        Reply {
            status,
            headers,
            bytes: bytes.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> Reply {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Reply {
        let req = Request::builder()
            .method("DELETE")
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    pub async fn json(&self, method: &str, uri: &str, token: &str, body: JsonValue) -> Reply {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    pub async fn multipart(&self, uri: &str, token: &str, form: MultipartBody) -> Reply {
        let (content_type, body) = form.finish();
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(req).await
    }

    pub fn candidates_dir(&self) -> PathBuf {
        self.state.config.candidates_dir.clone()
    }

    /// Saves a screening through the API and returns the new candidate id.
    pub async fn screen(&self, name: &str, role: &str, requestor: &str, email: &str) -> String {
        let form = MultipartBody::new()
            .text("Candidate Name", name)
            .text("Role Interviewed For", role)
            .text("Candidate Email", email)
            .text("Requestor Username", requestor)
            .text("Recorded By", "hr")
            .text("Expected Compensation", "5000");
        let reply = self.multipart("/api/screening", &hr(), form).await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.text());
        reply.json()["candidate_id"].as_str().unwrap().to_string()
    }
}

pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        (
            format!("multipart/form-data; boundary={}", BOUNDARY),
            self.body,
        )
    }
}
