// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP surface tests, driven through the router without a socket.

mod harness;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use contact_submission::{
    config::Config,
    handlers::{router, AppState},
    Submission,
};
use harness::{
    configured,
    generators::{form_body, valid_submission},
    transport::RecordingTransport,
    Fixture,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app(fx: Fixture) -> (Router, Arc<RecordingTransport>) {
    let Fixture {
        service,
        transport,
        metrics,
        ..
    } = fx;
    let state = Arc::new(AppState {
        service,
        metrics: Some(metrics),
        config: Config::default(),
    });
    (router(state), transport)
}

fn post_form(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .body(Body::from(body))
        .unwrap()
}

async fn json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_contact_success() {
    let (app, transport) = app(configured());

    let response = app
        .oneshot(post_form("/contact", form_body(&valid_submission())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "SAMEORIGIN");
    assert!(response.headers().contains_key("permissions-policy"));

    let body = json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["kind"], "success");
    assert!(body.get("field_errors").is_none());

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text_body.ends_with("Client IP: 203.0.113.9"));
}

#[tokio::test]
async fn test_contact_validation_errors() {
    let (app, transport) = app(configured());
    let submission = Submission {
        name: "J".into(),
        email: "not-an-email".into(),
        ..valid_submission()
    };

    let response = app
        .oneshot(post_form("/contact", form_body(&submission)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Please fix the highlighted fields and try again.");
    let fields = body["field_errors"].as_object().unwrap();
    assert_eq!(fields.len(), 2);
    assert!(fields.contains_key("name"));
    assert!(fields.contains_key("email"));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_contact_rate_limited_sets_retry_after() {
    let (app, _transport) = app(configured());

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(post_form("/contact", form_body(&valid_submission())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(post_form("/contact", form_body(&valid_submission())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()[header::RETRY_AFTER], "600");

    let body = json(response).await;
    assert_eq!(body["kind"], "rate_limited");
    assert_eq!(body["retry_after_secs"], 600);
}

#[tokio::test]
async fn test_wrong_content_type_gets_generic_fallback() {
    let (app, transport) = app(configured());

    let request = Request::builder()
        .method("POST")
        .uri("/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Jo"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json(response).await;
    assert_eq!(body["kind"], "malformed_request");
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_undecodable_form_is_bad_request_not_validation_error() {
    let (app, transport) = app(configured());

    let response = app
        .clone()
        .oneshot(post_form("/contact", "name=Jo&name=Joanna".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["kind"], "malformed_request");

    let response = app
        .oneshot(post_form("/contact/validate", "email=a&email=b".to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_validate_endpoint_never_dispatches() {
    let (app, transport) = app(configured());
    let submission = Submission {
        message: "too short".into(),
        ..valid_submission()
    };

    let response = app
        .oneshot(post_form("/contact/validate", form_body(&submission)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["valid"], false);
    assert!(body["field_errors"]["message"].is_string());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_health_reports_mail_configuration() {
    let (app, _) = app(configured());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["mail_configured"], true);
}

#[tokio::test]
async fn test_metrics_count_outcomes() {
    let (app, _) = app(configured());

    let spam = Submission {
        honeypot: "Spam Corp".into(),
        ..valid_submission()
    };
    app.clone()
        .oneshot(post_form("/contact", form_body(&spam)))
        .await
        .unwrap();

    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("contact_submissions_total{outcome=\"spam\"} 1"));
}

#[tokio::test]
async fn test_plain_http_redirected_to_https() {
    let (app, transport) = app(configured());

    let mut request = post_form("/contact", form_body(&valid_submission()));
    request
        .headers_mut()
        .insert(header::HOST, "maxbarati.dev".parse().unwrap());
    request
        .headers_mut()
        .insert("x-forwarded-proto", "http".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://maxbarati.dev/contact"
    );
    assert!(response
        .headers()
        .contains_key(header::STRICT_TRANSPORT_SECURITY));
    assert_eq!(transport.calls(), 0);
}
