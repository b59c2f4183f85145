//! Token parsing (every route) and access enforcement (protected routes).

mod common;

use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};

use common::{FIRST_EMAIL, FIRST_USER_ID, SECRET, create_test_app, get, get_with_authorization, login, send};
use courier_api::token::{TOKEN_LIFETIME_HOURS, TokenKeys};

fn sign(claims: &Value, secret: &[u8]) -> String {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret)).unwrap()
}

fn unauthorized() -> Value {
    json!({ "error": "Unauthorized" })
}

#[tokio::test]
async fn test_protected_routes_require_authorization_header() {
    let (app, _) = create_test_app();

    let (status, body) = send(&app, get("/notifications", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized());

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/preferences")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"email\":false}"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized());
}

#[tokio::test]
async fn test_public_route_passes_anonymously() {
    let (app, _) = create_test_app();

    let (status, body) = send(&app, get("/healthz", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, _) = send(&app, get_with_authorization("/healthz", "")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_empty_header_is_anonymous_and_rejected_when_protected() {
    let (app, _) = create_test_app();

    let (status, _) = send(&app, get_with_authorization("/notifications", "")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_rejected_everywhere() {
    let (app, _) = create_test_app();
    let token = login(&app, FIRST_EMAIL).await;

    for uri in ["/healthz", "/notifications"] {
        let (status, body) = send(&app, get_with_authorization(uri, &format!("Basic {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body, unauthorized());
    }

    let (status, _) = send(&app, get_with_authorization("/healthz", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_prefix_any_case() {
    let (app, _) = create_test_app();
    let token = login(&app, FIRST_EMAIL).await;

    for scheme in ["Bearer", "bearer", "BEARER"] {
        let (status, _) =
            send(&app, get_with_authorization("/notifications", &format!("{} {}", scheme, token))).await;
        assert_eq!(status, StatusCode::OK, "{}", scheme);
    }
}

#[tokio::test]
async fn test_invalid_token_is_rejected_on_public_route() {
    let (app, _) = create_test_app();

    let (status, body) = send(&app, get("/healthz", Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized());
}

#[tokio::test]
async fn test_token_signed_with_other_key_is_rejected() {
    let (app, _) = create_test_app();
    let token = TokenKeys::from_secret(b"not-the-server-secret")
        .issue(FIRST_USER_ID, FIRST_EMAIL)
        .unwrap();

    let (status, _) = send(&app, get("/notifications", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expiry_leeway() {
    let (app, _) = create_test_app();
    let keys = TokenKeys::from_secret(SECRET);
    let lifetime = Duration::hours(TOKEN_LIFETIME_HOURS);

    let within = keys
        .issue_at(FIRST_USER_ID, FIRST_EMAIL, Utc::now() - lifetime - Duration::seconds(30))
        .unwrap();
    let (status, _) = send(&app, get("/notifications", Some(&within))).await;
    assert_eq!(status, StatusCode::OK);

    let beyond = keys
        .issue_at(FIRST_USER_ID, FIRST_EMAIL, Utc::now() - lifetime - Duration::seconds(90))
        .unwrap();
    let (status, _) = send(&app, get("/notifications", Some(&beyond))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_hmac_algorithm_is_rejected() {
    let (app, _) = create_test_app();
    let token = TokenKeys::from_secret(SECRET).issue(FIRST_USER_ID, FIRST_EMAIL).unwrap();
    let (_, rest) = token.split_once('.').unwrap();

    for header in [r#"{"alg":"RS256","typ":"JWT"}"#, r#"{"alg":"none","typ":"JWT"}"#] {
        let forged = format!("{}.{}", B64.encode(header), rest);
        let (status, _) = send(&app, get("/notifications", Some(&forged))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", header);
    }
}

#[tokio::test]
async fn test_token_without_subject_passes_parser_but_not_enforcer() {
    let (app, _) = create_test_app();
    let exp = (Utc::now() + Duration::minutes(5)).timestamp();

    let no_subject = sign(&json!({ "email": FIRST_EMAIL, "exp": exp }), SECRET);
    let (status, _) = send(&app, get("/healthz", Some(&no_subject))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, get("/notifications", Some(&no_subject))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized());

    let empty_subject = sign(&json!({ "user_id": "", "exp": exp }), SECRET);
    let (status, _) = send(&app, get("/notifications", Some(&empty_subject))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let null_subject = sign(&json!({ "user_id": null, "exp": exp }), SECRET);
    let (status, _) = send(&app, get("/notifications", Some(&null_subject))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_hand_signed_token_with_subject_is_accepted() {
    let (app, _) = create_test_app();
    let exp = (Utc::now() + Duration::minutes(5)).timestamp();

    let token = sign(&json!({ "user_id": FIRST_USER_ID, "exp": exp }), SECRET);
    let (status, body) = send(&app, get("/notifications", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["notifications"].is_array());
}

#[tokio::test]
async fn test_token_without_expiry_is_accepted() {
    let (app, _) = create_test_app();

    let token = sign(&json!({ "user_id": FIRST_USER_ID, "email": FIRST_EMAIL }), SECRET);
    let (status, body) = send(&app, get("/notifications", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["notifications"].is_array());
}

#[tokio::test]
async fn test_mistyped_side_claims_do_not_block_access() {
    let (app, _) = create_test_app();
    let exp = (Utc::now() + Duration::minutes(5)).timestamp();

    let token = sign(&json!({ "user_id": FIRST_USER_ID, "email": 42, "iat": 1.5, "exp": exp }), SECRET);
    let (status, _) = send(&app, get("/notifications", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let numeric_subject = sign(&json!({ "user_id": 42, "exp": exp }), SECRET);
    let (status, body) = send(&app, get("/notifications", Some(&numeric_subject))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized());
}
