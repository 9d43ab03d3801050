//! End-to-end tests driving the router through the gate.
//!
//! Requests go through `tower::ServiceExt::oneshot`, so the full middleware
//! stack runs without binding a socket.

#![cfg(test)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::COOKIE},
    response::Response,
    routing::get,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::{create_router, protect};
use crate::auth::test_support::{SECRET, gate, now, sign, sign_with, valid_payload};
use crate::auth::AuthContext;

fn app() -> Router {
    create_router(Arc::new(gate()))
}

/// Router whose protected handler counts how often it ran.
fn counting_app() -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = protect(
        Router::new().route(
            "/protected",
            get(move |ctx: AuthContext| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    ctx.subject().unwrap_or_default().to_string()
                }
            }),
        ),
        Arc::new(gate()),
    );
    (router, hits)
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_me() -> axum::http::request::Builder {
    Request::builder().uri("/me")
}

#[tokio::test]
async fn test_health_is_public() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_missing_credential_returns_401() {
    let response = app()
        .oneshot(get_me().body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "error": "Access denied" }));
}

#[tokio::test]
async fn test_bad_signature_returns_400() {
    let token = sign_with(
        &valid_payload("user"),
        jsonwebtoken::Algorithm::HS256,
        "not-the-secret",
    );
    let response = app()
        .oneshot(get_me().header("x-auth-token", token).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid token" }));
}

#[tokio::test]
async fn test_expired_token_returns_400() {
    let token = sign(&json!({ "sub": "user", "exp": now() - 60 }));
    let response = app()
        .oneshot(get_me().header("x-auth-token", token).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid token" }));
}

#[tokio::test]
async fn test_valid_header_token_forwards_claims() {
    let payload = valid_payload("user-7");
    let response = app()
        .oneshot(
            get_me()
                .header("x-auth-token", sign(&payload))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["source"], "header");
    assert_eq!(body["claims"], payload);
}

#[tokio::test]
async fn test_token_without_exp_forwards_claims() {
    let payload = json!({ "sub": "no-expiry", "iat": now(), "role": "citizen" });
    let response = app()
        .oneshot(
            get_me()
                .header("x-auth-token", sign(&payload))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["claims"], payload);
}

#[tokio::test]
async fn test_valid_cookie_token_forwards_claims() {
    let payload = valid_payload("cookie-user");
    let response = app()
        .oneshot(
            get_me()
                .header(COOKIE, format!("token={}", sign(&payload)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["source"], "cookie");
    assert_eq!(body["claims"], payload);
}

#[tokio::test]
async fn test_header_precedence_end_to_end() {
    let response = app()
        .oneshot(
            get_me()
                .header("x-auth-token", sign(&valid_payload("header-user")))
                .header(COOKIE, format!("token={}", sign(&valid_payload("cookie-user"))))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["claims"]["sub"], "header-user");
}

#[tokio::test]
async fn test_rejected_requests_never_reach_handler() {
    let (router, hits) = counting_app();

    let cases = vec![
        Request::builder().uri("/protected").body(Body::empty()).unwrap(),
        Request::builder()
            .uri("/protected")
            .header("x-auth-token", "garbage")
            .body(Body::empty())
            .unwrap(),
        Request::builder()
            .uri("/protected")
            .header("x-auth-token", sign(&json!({ "sub": "u", "exp": now() - 10 })))
            .body(Body::empty())
            .unwrap(),
        Request::builder()
            .uri("/protected")
            .header(COOKIE, "token=also.not.valid")
            .body(Body::empty())
            .unwrap(),
    ];

    for request in cases {
        let response = router.clone().oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/protected")
                .header("x-auth-token", sign(&valid_payload("ok-user")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = app()
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_body_never_leaks_detail() {
    let token = sign_with(
        &valid_payload("user"),
        jsonwebtoken::Algorithm::HS384,
        SECRET,
    );
    let response = app()
        .oneshot(get_me().header("x-auth-token", token).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "Invalid token" }));
}
