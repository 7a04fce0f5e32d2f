// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact submission service.
//!
//! The site's contact form posts `application/x-www-form-urlencoded` data
//! here and renders the JSON answer: a status, a message for the person,
//! and the fields to highlight.

use crate::client_id::client_identifier;
use crate::config::Config;
use crate::metrics::Metrics;
use crate::security::{redirect_to_https, with_security_headers};
use crate::service::ContactService;
use crate::submission::{Submission, SubmissionOutcome};
use crate::validator::{self, ValidationResult};
use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Shared application state.
pub struct AppState {
    pub service: ContactService,
    pub metrics: Option<Metrics>,
    pub config: Config,
}

/// Answer to a form post.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    /// `success` or `error`
    pub status: &'static str,
    pub kind: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<ValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// Answer to a pre-submission field check.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub field_errors: ValidationResult,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub mail_configured: bool,
}

const MALFORMED_MESSAGE: &str = "Something went wrong. Please try again.";

/// Build the service router with its middleware stack.
pub fn router(state: Arc<AppState>) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .http
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/contact", post(submit_contact))
        .route("/contact/validate", post(validate_contact));

    if state.config.metrics.enabled {
        routes = routes.route(&state.config.metrics.path, get(metrics));
    }

    let enforce_https = state.config.http.enforce_https;
    let mut app = routes.layer(cors).with_state(state);
    if enforce_https {
        app = app.layer(middleware::from_fn(redirect_to_https));
    }

    with_security_headers(app).layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-submission",
        version: env!("CARGO_PKG_VERSION"),
        mail_configured: state.service.dispatcher().is_available(),
    })
}

/// Run a contact form submission through the pipeline.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<Submission>, FormRejection>,
) -> Response {
    let Form(submission) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!(error = %rejection, "Malformed contact submission");
            return malformed();
        }
    };

    let client_id = client_identifier(&headers);
    debug!(client_id = %client_id, "Processing contact submission");

    let outcome = state.service.submit(&submission, &client_id).await;
    outcome_response(outcome)
}

/// Check fields with the same rules as `/contact`, without submitting.
pub async fn validate_contact(form: Result<Form<Submission>, FormRejection>) -> Response {
    match form {
        Ok(Form(submission)) => {
            let field_errors = validator::validate(&submission.normalized());
            Json(ValidateResponse {
                valid: field_errors.is_valid(),
                field_errors,
            })
            .into_response()
        }
        Err(rejection) => malformed(),
    }
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(metrics) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            metrics.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Translate an outcome into status code, headers and body.
pub fn outcome_response(outcome: SubmissionOutcome) -> Response {
    let status = match &outcome {
        SubmissionOutcome::Success => StatusCode::OK,
        SubmissionOutcome::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionOutcome::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        SubmissionOutcome::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        SubmissionOutcome::DispatchFailed => StatusCode::BAD_GATEWAY,
    };

    let retry_after_secs = match &outcome {
        SubmissionOutcome::RateLimited { retry_after } => Some(ceil_secs(*retry_after)),
        _ => None,
    };

    let body = ContactResponse {
        status: if outcome.is_success() { "success" } else { "error" },
        kind: outcome.kind(),
        message: outcome.user_message(),
        retry_after_secs,
        field_errors: match outcome {
            SubmissionOutcome::ValidationError(errors) => Some(errors),
            _ => None,
        },
    };

    match retry_after_secs {
        Some(secs) => (
            status,
            [(header::RETRY_AFTER, secs.to_string())],
            Json(body),
        )
            .into_response(),
        None => (status, Json(body)).into_response(),
    }
}

/// Undecodable bodies are always 400, whatever status the rejection carries.
fn malformed() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ContactResponse {
            status: "error",
            kind: "malformed_request",
            message: MALFORMED_MESSAGE,
            field_errors: None,
            retry_after_secs: None,
        }),
    )
        .into_response()
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
