//! In-process stand-in for the evidence API.
//!
//! One fallback handler dispatches on method and path and keeps everything
//! in a shared [`MockState`] that tests can inspect and tweak.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use evidencias_client::{ClientConfig, EvidenciasClient, MemoryTokenStore};
use serde_json::{json, Value};
use uuid::Uuid;

pub const EMAIL: &str = "ana@escola.test";
pub const PASSWORD: &str = "senha-de-teste-123";

pub type Shared = Arc<Mutex<MockState>>;

#[derive(Debug)]
pub struct MockState {
    pub user: Value,
    pub access_token: String,
    pub refresh_token: String,
    pub rotations: u32,
    pub refresh_calls: usize,
    /// When false, every refresh is rejected.
    pub refresh_enabled: bool,
    /// When true, every authorized call is rejected, even with a fresh token.
    pub reject_all: bool,
    pub fail_file_delete: bool,
    /// Requests seen, keyed `"{METHOD} {path}"` with the `/api/v1` prefix removed.
    pub hits: HashMap<String, usize>,
    pub last_query: Option<String>,
    pub last_body: Value,
    pub events: Vec<Value>,
    pub files: Vec<Value>,
    pub attendance: Vec<Value>,
    pub notes: Vec<Value>,
    pub users: Vec<Value>,
}

impl Default for MockState {
    fn default() -> Self {
        let user = user_json(Uuid::new_v4(), "Ana Souza", "ADMIN", true);
        Self {
            users: vec![user.clone()],
            user,
            access_token: "access-0".into(),
            refresh_token: "refresh-0".into(),
            rotations: 0,
            refresh_calls: 0,
            refresh_enabled: true,
            reject_all: false,
            fail_file_delete: false,
            hits: HashMap::new(),
            last_query: None,
            last_body: Value::Null,
            events: Vec::new(),
            files: Vec::new(),
            attendance: Vec::new(),
            notes: Vec::new(),
        }
    }
}

pub struct MockServer {
    pub state: Shared,
    pub base_url: String,
}

impl MockServer {
    pub async fn start(state: MockState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new().fallback(dispatch).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            state,
            base_url: format!("http://{addr}/api/v1"),
        }
    }

    pub fn client(&self) -> EvidenciasClient {
        EvidenciasClient::new(
            ClientConfig::new(&self.base_url),
            Arc::new(MemoryTokenStore::new()),
        )
        .unwrap()
    }

    /// A client that has already signed in.
    pub async fn signed_in(&self) -> EvidenciasClient {
        let client = self.client();
        client.login(EMAIL, PASSWORD).await.unwrap();
        client
    }

    /// Invalidate the access token the client holds, as if it had expired.
    pub fn expire_access(&self) {
        self.state.lock().unwrap().access_token = "expired-on-server".into();
    }

    pub fn hits(&self, key: &str) -> usize {
        self.state.lock().unwrap().hits.get(key).copied().unwrap_or(0)
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.lock().unwrap().refresh_calls
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn timestamp(day: u32) -> String {
    Utc.with_ymd_and_hms(2024, 4, day, 9, 0, 0)
        .unwrap()
        .to_rfc3339()
}

pub fn user_json(id: Uuid, name: &str, role: &str, active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@escola.test", name.to_lowercase().replace(' ', ".")),
        "role": role,
        "is_active": active,
        "created_at": timestamp(1),
    })
}

pub fn event_json(id: Uuid, title: &str, event_type: &str, day: u32) -> Value {
    json!({
        "id": id,
        "title": title,
        "type": event_type,
        "status": "PLANEJADO",
        "start_at": timestamp(day),
        "end_at": null,
        "location": null,
        "audience": null,
        "description": null,
        "tags": [],
        "schools": [],
        "created_by": Uuid::new_v4(),
        "created_at": timestamp(1),
        "updated_at": timestamp(1),
    })
}

pub fn file_json(event_id: Uuid, kind: &str, filename: &str) -> Value {
    let id = Uuid::new_v4();
    let url = format!("http://storage.test/{event_id}/{id}");
    json!({
        "id": id,
        "event_id": event_id,
        "kind": kind,
        "filename": filename,
        "mime": if kind == "PHOTO" { "image/png" } else { "application/pdf" },
        "size": 3,
        "thumbnail_url": if kind == "PHOTO" { json!(format!("{url}?width=320&height=320")) } else { Value::Null },
        "url": url,
        "uploaded_by": Uuid::new_v4(),
        "created_at": timestamp(2),
    })
}

pub fn attendance_json(event_id: Uuid, name: &str, present: bool) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "event_id": event_id,
        "person_name": name,
        "person_role": null,
        "school": null,
        "present": present,
        "created_at": timestamp(2),
    })
}

pub fn note_json(event_id: Uuid, text: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "event_id": event_id,
        "text": text,
        "created_by": Uuid::new_v4(),
        "created_at": timestamp(3),
        "updated_at": timestamp(3),
    })
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "error": message, "code": code }))).into_response()
}

fn data(status: StatusCode, value: Value) -> Response {
    (status, Json(json!({ "data": value }))).into_response()
}

fn auth_response(st: &mut MockState) -> Response {
    Json(json!({
        "access_token": st.access_token,
        "refresh_token": st.refresh_token,
        "token_type": "bearer",
        "expires_in": 1800,
        "user": st.user,
    }))
    .into_response()
}

fn remove_by_id(rows: &mut Vec<Value>, id: &str) -> bool {
    let before = rows.len();
    rows.retain(|r| r["id"] != id);
    rows.len() != before
}

async fn dispatch(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().trim_start_matches("/api/v1").to_string();
    if path == "/auth/refresh" {
        // Long enough for concurrent callers to pile up behind one refresh.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let mut st = state.lock().unwrap();
    *st.hits.entry(format!("{method} {path}")).or_default() += 1;
    st.last_query = uri.query().map(str::to_string);
    st.last_body = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    let public = matches!(
        segments.as_slice(),
        ["auth", "login"] | ["auth", "register"] | ["auth", "refresh"]
    );
    if !public {
        let expected = format!("Bearer {}", st.access_token);
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if st.reject_all || presented != Some(expected.as_str()) {
            return error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Invalid or expired token");
        }
    }

    match (method.as_str(), segments.as_slice()) {
        // ---- auth ----
        ("POST", ["auth", "login"]) => {
            if st.last_body["password"] == PASSWORD {
                auth_response(&mut st)
            } else {
                error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Invalid email or password")
            }
        }
        ("POST", ["auth", "register"]) => {
            if st.last_body["email"] == "dup@escola.test" {
                return error(StatusCode::CONFLICT, "CONFLICT", "Email already registered");
            }
            let user = st.user.clone();
            data(StatusCode::CREATED, user)
        }
        ("POST", ["auth", "refresh"]) => {
            st.refresh_calls += 1;
            if st.refresh_enabled && st.last_body["refresh_token"] == st.refresh_token.as_str() {
                st.rotations += 1;
                st.access_token = format!("access-{}", st.rotations);
                st.refresh_token = format!("refresh-{}", st.rotations);
                auth_response(&mut st)
            } else {
                error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Invalid or expired refresh token")
            }
        }
        ("POST", ["auth", "logout"]) => StatusCode::NO_CONTENT.into_response(),
        ("GET", ["auth", "me"]) => data(StatusCode::OK, st.user.clone()),

        // ---- events ----
        ("GET", ["events"]) => data(StatusCode::OK, json!(st.events)),
        ("POST", ["events"]) => {
            let mut event = event_json(Uuid::new_v4(), "", "OUTRO", 1);
            if let (Some(target), Some(source)) = (event.as_object_mut(), st.last_body.as_object()) {
                for (k, v) in source {
                    target.insert(k.clone(), v.clone());
                }
            }
            st.events.push(event.clone());
            data(StatusCode::CREATED, event)
        }
        ("GET", ["events", id]) => match st.events.iter().find(|e| e["id"] == *id) {
            Some(event) => data(StatusCode::OK, event.clone()),
            None => error(StatusCode::NOT_FOUND, "NOT_FOUND", "Event not found"),
        },
        ("PUT", ["events", id]) => {
            let patch = st.last_body.clone();
            match st.events.iter_mut().find(|e| e["id"] == *id) {
                Some(event) => {
                    if let (Some(target), Some(source)) = (event.as_object_mut(), patch.as_object()) {
                        for (k, v) in source {
                            target.insert(k.clone(), v.clone());
                        }
                    }
                    data(StatusCode::OK, event.clone())
                }
                None => error(StatusCode::NOT_FOUND, "NOT_FOUND", "Event not found"),
            }
        }
        ("DELETE", ["events", id]) => {
            if remove_by_id(&mut st.events, id) {
                StatusCode::NO_CONTENT.into_response()
            } else {
                error(StatusCode::NOT_FOUND, "NOT_FOUND", "Event not found")
            }
        }

        // ---- files ----
        ("GET", ["events", _, "files"]) => {
            let kind = st
                .last_query
                .as_deref()
                .and_then(|q| q.strip_prefix("kind="))
                .map(str::to_string);
            let files: Vec<Value> = st
                .files
                .iter()
                .filter(|f| kind.as_deref().map_or(true, |k| f["kind"] == k))
                .cloned()
                .collect();
            data(StatusCode::OK, json!(files))
        }
        ("POST", ["events", event_id, "files"]) => {
            let is_multipart = headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("multipart/form-data"));
            if !is_multipart {
                return error(StatusCode::BAD_REQUEST, "BAD_REQUEST", "Expected multipart");
            }
            let kind = match st.last_query.as_deref() {
                Some("kind=PHOTO") => "PHOTO",
                _ => "DOC",
            };
            let text = String::from_utf8_lossy(&body).to_string();
            let event_id: Uuid = event_id.parse().unwrap();
            let created: Vec<Value> = text
                .split("filename=\"")
                .skip(1)
                .filter_map(|rest| rest.split('"').next())
                .map(|name| file_json(event_id, kind, name))
                .collect();
            st.files.extend(created.iter().cloned());
            data(StatusCode::CREATED, json!(created))
        }
        ("DELETE", ["events", _, "files", file_id]) => {
            if st.fail_file_delete {
                return error(StatusCode::BAD_GATEWAY, "STORAGE_ERROR", "Storage backend error: down");
            }
            remove_by_id(&mut st.files, file_id);
            StatusCode::NO_CONTENT.into_response()
        }

        // ---- attendance ----
        ("GET", ["events", _, "attendance"]) => data(StatusCode::OK, json!(st.attendance)),
        ("POST", ["events", event_id, "attendance"]) => {
            let row = attendance_json(
                event_id.parse().unwrap(),
                st.last_body["person_name"].as_str().unwrap_or_default(),
                st.last_body["present"].as_bool().unwrap_or(true),
            );
            st.attendance.push(row.clone());
            data(StatusCode::CREATED, row)
        }
        ("POST", ["events", event_id, "attendance", "bulk"]) => {
            let event_id: Uuid = event_id.parse().unwrap();
            let rows: Vec<Value> = st
                .last_body
                .as_array()
                .cloned()
                .unwrap_or_default()
                .iter()
                .map(|r| attendance_json(event_id, r["person_name"].as_str().unwrap_or_default(), true))
                .collect();
            st.attendance.extend(rows.iter().cloned());
            data(StatusCode::CREATED, json!(rows))
        }
        ("POST", ["events", _, "attendance", "import"]) => {
            let text = String::from_utf8_lossy(&body).to_string();
            if !text.contains("name=\"file\"") {
                return error(StatusCode::BAD_REQUEST, "BAD_REQUEST", "Missing 'file' field");
            }
            data(StatusCode::OK, json!({ "imported": 2 }))
        }
        ("GET", ["events", _, "attendance", "export", "csv"]) => (
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            "Nome,Função,Escola,Presente\nAna,Diretora,Escola A,Sim",
        )
            .into_response(),
        ("DELETE", ["events", _, "attendance", id]) => {
            remove_by_id(&mut st.attendance, id);
            StatusCode::NO_CONTENT.into_response()
        }

        // ---- notes ----
        ("GET", ["events", _, "notes"]) => data(StatusCode::OK, json!(st.notes)),
        ("POST", ["events", event_id, "notes"]) => {
            let note = note_json(
                event_id.parse().unwrap(),
                st.last_body["text"].as_str().unwrap_or_default(),
            );
            st.notes.insert(0, note.clone());
            data(StatusCode::CREATED, note)
        }
        ("PUT", ["events", _, "notes", id]) => {
            let text = st.last_body["text"].clone();
            match st.notes.iter_mut().find(|n| n["id"] == *id) {
                Some(note) => {
                    note["text"] = text;
                    data(StatusCode::OK, note.clone())
                }
                None => error(StatusCode::NOT_FOUND, "NOT_FOUND", "Note not found"),
            }
        }
        ("DELETE", ["events", _, "notes", id]) => {
            remove_by_id(&mut st.notes, id);
            StatusCode::NO_CONTENT.into_response()
        }

        // ---- users ----
        ("GET", ["users"]) => data(StatusCode::OK, json!(st.users)),
        ("POST", ["users"]) => {
            let user = user_json(
                Uuid::new_v4(),
                st.last_body["name"].as_str().unwrap_or_default(),
                st.last_body["role"].as_str().unwrap_or("TEC_ACOMPANHAMENTO"),
                true,
            );
            st.users.push(user.clone());
            data(StatusCode::CREATED, user)
        }
        ("PATCH", ["users", id, "role"]) => {
            let role = st.last_body["role"].clone();
            match st.users.iter_mut().find(|u| u["id"] == *id) {
                Some(user) => {
                    user["role"] = role;
                    data(StatusCode::OK, user.clone())
                }
                None => error(StatusCode::NOT_FOUND, "NOT_FOUND", "User not found"),
            }
        }
        ("PATCH", ["users", id, "deactivate"]) => match st.users.iter_mut().find(|u| u["id"] == *id) {
            Some(user) => {
                user["is_active"] = json!(false);
                data(StatusCode::OK, user.clone())
            }
            None => error(StatusCode::NOT_FOUND, "NOT_FOUND", "User not found"),
        },

        _ => error(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found"),
    }
}
