//! End-to-end tests of the template admin routes over in-memory storage

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use fhsk_core::MemoryTableGateway;
use fhsk_server::{AppState, config::ServerConfig, create_router};
use ndg_template::TemplateTable;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let config = ServerConfig {
        sites: vec![
            ("ngame".to_string(), "Ngame".to_string()),
            ("demo".to_string(), "FhskDemo".to_string()),
        ],
        ..ServerConfig::default()
    };
    let templates = TemplateTable::new(Arc::new(MemoryTableGateway::new("template")));
    create_router(AppState::new(config, Arc::new(templates))).unwrap()
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(b) => Body::from(b.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn add(app: &Router, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/ngame/admin/template/add",
        Some(json!({"name": name, "content": "1 2 3", "description": "N=3"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
}

#[tokio::test]
async fn test_default_action_lists_templates() {
    let app = app();
    add(&app, "first").await;

    for uri in ["/ngame/admin/template", "/ngame/admin/template/", "/ngame/admin/template/list"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["site"]["name"], json!("Ngame"));
    }
}

#[tokio::test]
async fn test_add_then_show() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/demo/admin/template/add",
        Some(json!({"name": "template name", "content": "1 2 3\n2 1 3"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["redirect"], json!("/demo/admin/template/list"));
    assert_eq!(body["data"]["is_archived"], json!(false));
    assert!(body["data"]["created_at"].is_string());

    let id = body["data"]["id"].as_i64().unwrap();
    let (status, body) = send(&app, Method::GET, &format!("/demo/admin/template/show/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("template name"));
    assert_eq!(body["site"]["key"], json!("demo"));
}

#[tokio::test]
async fn test_add_with_return_action_and_no_id() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/ngame/admin/template/add/archived",
        Some(json!({"name": "n", "content": "c"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["redirect"], json!("/ngame/admin/template/archived"));
    assert_eq!(body["data"]["name"], json!("n"));
}

#[tokio::test]
async fn test_edit_keeps_creation_time_and_honours_return_action() {
    let app = app();
    let id = add(&app, "draft").await;
    let (_, before) = send(&app, Method::GET, &format!("/ngame/admin/template/show/{id}"), None).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/ngame/admin/template/edit/{id}/active"),
        Some(json!({"name": "final", "content": "3 2 1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect"], json!("/ngame/admin/template/active"));
    assert_eq!(body["data"]["name"], json!("final"));
    assert_eq!(body["data"]["description"], Value::Null);
    assert_eq!(body["data"]["created_at"], before["data"]["created_at"]);
}

#[tokio::test]
async fn test_archive_moves_template_between_lists() {
    let app = app();
    let id = add(&app, "old").await;
    add(&app, "new").await;

    let (status, body) = send(&app, Method::POST, &format!("/ngame/admin/template/archive/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_archived"], json!(true));

    let (_, active) = send(&app, Method::GET, "/ngame/admin/template/active", None).await;
    let (_, archived) = send(&app, Method::GET, "/ngame/admin/template/archived", None).await;
    assert_eq!(active["data"].as_array().unwrap().len(), 1);
    assert_eq!(archived["data"][0]["id"], json!(id));

    send(&app, Method::POST, &format!("/ngame/admin/template/unarchive/{id}"), None).await;
    let (_, archived) = send(&app, Method::GET, "/ngame/admin/template/archived", None).await;
    assert!(archived["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = app();
    let id = add(&app, "doomed").await;
    let uri = format!("/ngame/admin/template/delete/{id}");

    let (status, body) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], json!(1));

    let (status, body) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], json!(0));
}

#[tokio::test]
async fn test_missing_template_is_not_found() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/ngame/admin/template/show/420", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Could not find row 420"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/ngame/admin/template/edit/420",
        Some(json!({"name": "x", "content": "y"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_route_constraints() {
    let app = app();

    let (status, _) = send(&app, Method::GET, "/ngame/admin/template/show/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/ngame/admin/template/show/1-x", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/ngame/admin/template/1list", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/unknown/admin/template", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/ngame/admin/template/delete/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_invalid_forms_are_rejected() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/ngame/admin/template/add",
        Some(json!({"name": "  ", "content": "body"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], json!(400));

    let (status, body) = send(&app, Method::POST, "/ngame/admin/template/add", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid JSON format"));
}
