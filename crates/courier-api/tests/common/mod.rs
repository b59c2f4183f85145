//! Common test utilities for API integration tests
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use courier_api::token::TokenKeys;
use courier_api::{AppState, AppStateInner, create_router};
use courier_db::Database;

pub const SECRET: &[u8] = b"integration-test-secret";

pub const FIRST_EMAIL: &str = "first@customer.io";
pub const FIRST_USER_ID: &str = "4f1c2d3e-0001-4a5b-9c8d-000000000001";
pub const SECOND_EMAIL: &str = "second@customer.io";

/// The CSV fixtures shipped at the repository root.
pub fn seed_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../seed")
}

pub fn seeded_state() -> AppState {
    let db = Database::open_in_memory().expect("open in-memory db");
    courier_db::seed::seed_from_dir(&db, &seed_dir()).expect("seed fixtures");
    Arc::new(AppStateInner {
        db,
        keys: TokenKeys::from_secret(SECRET),
    })
}

/// Router over a freshly seeded store, plus the state for direct inspection.
pub fn create_test_app() -> (Router, AppState) {
    let state = seeded_state();
    (create_router(state.clone()), state)
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn get_with_authorization(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, token: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send a request; an empty body comes back as `Value::Null`.
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Log in through the API and return the bearer token.
pub async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(app, post_form("/login", &format!("email={}", email))).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().expect("token in body").to_string()
}
