//! End-to-end tests of the HTTP surface over the in-memory store and the
//! local cache backend.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use quillbox_auth::{AuthService, JwtService};
use quillbox_cache::LocalCache;
use quillbox_notes::{NotesService, NullSink};
use quillbox_server::state::AppState;
use quillbox_server::build_router;
use quillbox_storage::{InMemoryStore, NoteStore, UserStore};

fn test_app() -> Router {
    let store = Arc::new(InMemoryStore::new());
    let notes = Arc::new(NotesService::new(
        store.clone() as Arc<dyn NoteStore>,
        Arc::new(LocalCache::new()),
        Arc::new(NullSink),
    ));
    let auth = Arc::new(AuthService::new(
        store as Arc<dyn UserStore>,
        JwtService::new("test-secret", 3600),
    ));
    build_router(
        AppState::new(notes, auth),
        &["http://localhost:5173".to_string()],
    )
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request build")
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request build")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register_and_login(app: &Router, email: &str) -> String {
    let credentials = json!({"email": email, "password": "hunter2"});
    let (status, _) = send(
        app,
        json_request("POST", "/api/auth/register", None, credentials.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        json_request("POST", "/api/auth/login", None, credentials),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    body["access_token"]
        .as_str()
        .expect("access_token")
        .to_string()
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let app = test_app();
    let (status, body) = send(&app, get_request("/healthz", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = test_app();
    let credentials = json!({"email": "a@example.com", "password": "hunter2"});

    let (status, _) = send(
        &app,
        json_request("POST", "/api/auth/register", None, credentials.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        json_request("POST", "/api/auth/register", None, credentials),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = test_app();
    register_and_login(&app, "a@example.com").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "a@example.com", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn notes_routes_require_a_token() {
    let app = test_app();

    let (status, _) = send(&app, get_request("/api/notes", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get_request("/api/notes", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn note_crud_round_trip() {
    let app = test_app();
    let token = register_and_login(&app, "a@example.com").await;

    // Create
    let (status, note) = send(
        &app,
        json_request(
            "POST",
            "/api/notes",
            Some(&token),
            json!({"title": "A", "content": "x", "tags": ["a"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["title"], "A");
    assert_eq!(note["tags"], json!(["a"]));
    let id = note["id"].as_i64().expect("id");

    // List
    let (status, listed) = send(&app, get_request("/api/notes", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().expect("array").len(), 1);

    // Update title only; content must survive
    let (status, updated) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/notes/{id}"),
            Some(&token),
            json!({"title": "B"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "B");
    assert_eq!(updated["content"], "x");

    // List reflects the update
    let (_, listed) = send(&app, get_request("/api/notes", Some(&token))).await;
    assert_eq!(listed[0]["title"], "B");

    // Delete
    let (status, body) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/api/notes/{id}"),
            Some(&token),
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, listed) = send(&app, get_request("/api/notes", Some(&token))).await;
    assert!(listed.as_array().expect("array").is_empty());
}

#[tokio::test]
async fn tag_filter_is_a_query_parameter() {
    let app = test_app();
    let token = register_and_login(&app, "a@example.com").await;

    send(
        &app,
        json_request(
            "POST",
            "/api/notes",
            Some(&token),
            json!({"title": "A", "content": "x", "tags": ["work", "urgent"]}),
        ),
    )
    .await;
    send(
        &app,
        json_request(
            "POST",
            "/api/notes",
            Some(&token),
            json!({"title": "B", "content": "y", "tags": ["personal"]}),
        ),
    )
    .await;

    let (status, listed) = send(&app, get_request("/api/notes?tags=work", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().expect("array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "A");

    let (_, listed) = send(
        &app,
        get_request("/api/notes?tags=work,personal", Some(&token)),
    )
    .await;
    assert!(listed.as_array().expect("array").is_empty());
}

#[tokio::test]
async fn foreign_notes_are_invisible_to_other_owners() {
    let app = test_app();
    let alice = register_and_login(&app, "alice@example.com").await;
    let bob = register_and_login(&app, "bob@example.com").await;

    let (_, note) = send(
        &app,
        json_request(
            "POST",
            "/api/notes",
            Some(&alice),
            json!({"title": "A", "content": "x"}),
        ),
    )
    .await;
    let id = note["id"].as_i64().expect("id");

    // Bob cannot see, update, or delete Alice's note.
    let (_, listed) = send(&app, get_request("/api/notes", Some(&bob))).await;
    assert!(listed.as_array().expect("array").is_empty());

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/notes/{id}"),
            Some(&bob),
            json!({"title": "stolen"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/api/notes/{id}"),
            Some(&bob),
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice still owns it, unchanged.
    let (_, listed) = send(&app, get_request("/api/notes", Some(&alice))).await;
    assert_eq!(listed[0]["title"], "A");
}

#[tokio::test]
async fn empty_title_is_a_bad_request() {
    let app = test_app();
    let token = register_and_login(&app, "a@example.com").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/notes",
            Some(&token),
            json!({"title": "  ", "content": "x"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}
