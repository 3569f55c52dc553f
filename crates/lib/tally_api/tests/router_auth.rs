//! Router-level tests for request denial paths.
//!
//! Every case here is rejected before any database access, so the state
//! carries a lazily-connected pool pointing nowhere.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use sqlx::postgres::PgPoolOptions;
use tally_api::{AppState, config::ApiConfig};
use tower::ServiceExt;

const SECRET: &str = "router-test-secret";

fn test_app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost:1/unreachable")
        .expect("lazy pool");
    let state = AppState {
        pool,
        config: ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            pg_connection_url: "postgres://localhost:1/unreachable".into(),
            jwt_secret: SECRET.into(),
            token_validity_secs: 86400,
        },
    };
    tally_api::router(state)
}

fn get_todos(auth_header: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/todos");
    if let Some(value) = auth_header {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn status_and_body(req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = test_app().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).expect("parse JSON");
    (status, json)
}

#[tokio::test]
async fn missing_header_is_401() {
    let (status, body) = status_and_body(get_todos(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn lowercase_scheme_is_401() {
    let (status, _) = status_and_body(get_todos(Some("bearer sometoken"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn scheme_without_space_is_401() {
    let (status, _) = status_and_body(get_todos(Some("Bearersometoken"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_401() {
    let (status, _) = status_and_body(get_todos(Some("Bearer not.a.jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tampered_token_is_401() {
    let token = tally_core::auth::jwt::issue_token(1, false, SECRET.as_bytes(), 86400)
        .expect("issue token");
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let stamp = if parts[2].starts_with('A') { "B" } else { "A" };
    parts[2] = format!("{stamp}{}", &parts[2][1..]);
    let header_value = format!("Bearer {}", parts.join("."));
    let (status, _) = status_and_body(get_todos(Some(&header_value))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_401() {
    let token =
        tally_core::auth::jwt::issue_token(1, false, SECRET.as_bytes(), 0).expect("issue token");
    let header_value = format!("Bearer {token}");
    let (status, _) = status_and_body(get_todos(Some(&header_value))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn denial_responses_are_indistinguishable() {
    let expired =
        tally_core::auth::jwt::issue_token(1, false, SECRET.as_bytes(), 0).expect("issue token");
    let expired_header = format!("Bearer {expired}");
    let cases = [
        None,
        Some("bearer x"),
        Some("Bearerx"),
        Some("Bearer garbage"),
        Some(expired_header.as_str()),
    ];
    let mut bodies = Vec::new();
    for case in cases {
        let (status, body) = status_and_body(get_todos(case)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        bodies.push(body);
    }
    for body in &bodies[1..] {
        assert_eq!(body, &bodies[0], "denial bodies must not differ");
    }
}

#[tokio::test]
async fn login_with_missing_password_is_400() {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"username": "alice"}"#))
        .unwrap();
    let (status, body) = status_and_body(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn wrong_typed_field_is_400() {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"username": 5, "password": "whatever here"}"#))
        .unwrap();
    let (status, body) = status_and_body(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn unparseable_body_is_400() {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = status_and_body(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn register_with_short_password_is_400() {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"username": "alice", "email": "alice@example.com", "password": "short"}"#,
        ))
        .unwrap();
    let (status, _) = status_and_body(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_todo_without_auth_is_401() {
    let req = Request::builder()
        .method("POST")
        .uri("/todos")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"content": "sneak one in"}"#))
        .unwrap();
    let (status, _) = status_and_body(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
