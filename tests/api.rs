use std::{path::PathBuf, sync::Arc};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use phonebook_notes::{create_router, store::MemoryStore, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    app_with_static(None)
}

fn app_with_static(static_dir: Option<PathBuf>) -> Router {
    create_router(Arc::new(AppState::new(
        Arc::new(MemoryStore::new()),
        static_dir,
    )))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create_person(app: &Router, name: &str, number: &str) -> Value {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/persons",
        Some(json!({ "name": name, "number": number })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

async fn create_note(app: &Router, body: Value) -> Value {
    let (status, body) = send_json(app, Method::POST, "/api/notes", Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn create_person_returns_generated_id_and_fields() {
    let app = app();
    let person = create_person(&app, "Arto Hellas", "040-123456").await;

    assert!(person["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(person["name"], "Arto Hellas");
    assert_eq!(person["number"], "040-123456");

    let (status, listed) = send_json(&app, Method::GET, "/api/persons", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([person]));
}

#[tokio::test]
async fn create_person_without_name_or_number_is_content_missing() {
    let app = app();
    for payload in [json!({ "number": "040-123456" }), json!({ "name": "Arto Hellas" }), json!({})] {
        let (status, body) = send_json(&app, Method::POST, "/api/persons", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "content missing" }));
    }

    let (_, listed) = send_json(&app, Method::GET, "/api/persons", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn create_person_with_invalid_number_is_a_validation_error() {
    let app = app();
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/persons",
        Some(json!({ "name": "Arto Hellas", "number": "1-2" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Person validation failed"), "{message}");
}

#[tokio::test]
async fn get_person_by_id() {
    let app = app();
    let person = create_person(&app, "Ada Lovelace", "39-445323523").await;
    let uri = format!("/api/persons/{}", person["id"].as_str().unwrap());

    let (status, body) = send_json(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, person);
}

#[tokio::test]
async fn get_missing_person_is_404_with_empty_body() {
    let app = app();
    let uri = format!("/api/persons/{}", uuid::Uuid::new_v4());

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn malformed_id_is_rejected_on_every_id_route() {
    let app = app();
    let cases = [
        (Method::GET, "/api/persons/not-an-id", None),
        (Method::PUT, "/api/persons/not-an-id", Some(json!({ "number": "040-123456" }))),
        (Method::DELETE, "/api/persons/not-an-id", None),
        (Method::GET, "/api/notes/not-an-id", None),
        (Method::PUT, "/api/notes/not-an-id", Some(json!({ "important": true }))),
        (Method::DELETE, "/api/notes/not-an-id", None),
    ];

    for (method, uri, payload) in cases {
        let (status, body) = send_json(&app, method.clone(), uri, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body, json!({ "error": "malformatted id" }), "{method} {uri}");
    }
}

#[tokio::test]
async fn delete_person_is_idempotent() {
    let app = app();
    let person = create_person(&app, "Dan Abramov", "12-43234345").await;
    let uri = format!("/api/persons/{}", person["id"].as_str().unwrap());

    for _ in 0..2 {
        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_person_number_keeps_name() {
    let app = app();
    let person = create_person(&app, "Mary Poppendieck", "39-236423122").await;
    let uri = format!("/api/persons/{}", person["id"].as_str().unwrap());

    let (status, body) = send_json(&app, Method::PUT, &uri, Some(json!({ "number": "040-7777777" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], person["id"]);
    assert_eq!(body["name"], "Mary Poppendieck");
    assert_eq!(body["number"], "040-7777777");
}

#[tokio::test]
async fn update_person_name_is_supported() {
    let app = app();
    let person = create_person(&app, "Mary Poppendick", "39-236423122").await;
    let uri = format!("/api/persons/{}", person["id"].as_str().unwrap());

    let (status, body) = send_json(&app, Method::PUT, &uri, Some(json!({ "name": "Mary Poppendieck" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Mary Poppendieck");
    assert_eq!(body["number"], "39-236423122");
}

#[tokio::test]
async fn update_person_revalidates() {
    let app = app();
    let person = create_person(&app, "Arto Hellas", "040-123456").await;
    let uri = format!("/api/persons/{}", person["id"].as_str().unwrap());

    let (status, body) = send_json(&app, Method::PUT, &uri, Some(json!({ "number": "123" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("number"));

    let (_, stored) = send_json(&app, Method::GET, &uri, None).await;
    assert_eq!(stored["number"], "040-123456");
}

#[tokio::test]
async fn update_missing_person_is_404() {
    let app = app();
    let uri = format!("/api/persons/{}", uuid::Uuid::new_v4());

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "number": "040-123456" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn create_note_defaults_important_and_sets_date() {
    let app = app();
    let before = Utc::now();
    let note = create_note(&app, json!({ "content": "HTML is easy" })).await;
    let after = Utc::now();

    assert_eq!(note["content"], "HTML is easy");
    assert_eq!(note["important"], false);
    let date: DateTime<Utc> = note["date"].as_str().unwrap().parse().unwrap();
    assert!(before <= date && date <= after);
}

#[tokio::test]
async fn create_note_keeps_explicit_important() {
    let app = app();
    let note = create_note(&app, json!({ "content": "Browser can execute only JavaScript", "important": true })).await;
    assert_eq!(note["important"], true);

    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());
    let (status, body) = send_json(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, note);
}

#[tokio::test]
async fn create_note_without_content_is_a_validation_error() {
    let app = app();
    let (status, body) = send_json(&app, Method::POST, "/api/notes", Some(json!({ "important": true }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Note validation failed: content: content is required" }));
}

#[tokio::test]
async fn update_note_leaves_absent_fields_unchanged() {
    let app = app();
    let note = create_note(&app, json!({ "content": "HTML is easy", "important": true })).await;
    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());

    let (status, body) = send_json(&app, Method::PUT, &uri, Some(json!({ "content": "HTML is hard" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "HTML is hard");
    assert_eq!(body["important"], true);
    assert_eq!(body["date"], note["date"]);

    let (status, body) = send_json(&app, Method::PUT, &uri, Some(json!({ "important": false }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "HTML is hard");
    assert_eq!(body["important"], false);
}

#[tokio::test]
async fn delete_note_is_idempotent() {
    let app = app();
    let note = create_note(&app, json!({ "content": "GET and POST" })).await;
    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());

    for _ in 0..2 {
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (_, listed) = send_json(&app, Method::GET, "/api/notes", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/notes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"content\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn wrong_field_type_is_a_bad_request() {
    let app = app();
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/notes",
        Some(json!({ "content": "typed", "important": "very" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_routes_are_404() {
    let app = app();
    let cases = [
        (Method::GET, "/api/unknown"),
        (Method::POST, "/api/unknown"),
        (Method::GET, "/"),
        (Method::PATCH, "/api/persons"),
        (Method::POST, "/api/notes/5c41c90e84d891c15dfa3431"),
    ];

    for (method, uri) in cases {
        let (status, body) = send_json(&app, method.clone(), uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body, json!({ "error": "unknown endpoint" }), "{method} {uri}");
    }
}

#[tokio::test]
async fn static_assets_are_served_before_unknown_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>phonebook</h1>").unwrap();
    let app = app_with_static(Some(dir.path().to_path_buf()));

    let (status, body) = send(&app, Method::GET, "/index.html", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>phonebook</h1>");

    let (status, body) = send_json(&app, Method::GET, "/missing.js", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "unknown endpoint" }));

    let (status, body) = send_json(&app, Method::DELETE, "/index.html", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "unknown endpoint" }));
}
