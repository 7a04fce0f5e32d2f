// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Response hardening: security headers and HTTPS enforcement.

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::debug;

/// Headers added to every response that does not already set them.
pub const SECURITY_HEADERS: [(HeaderName, &str); 5] = [
    (
        header::STRICT_TRANSPORT_SECURITY,
        "max-age=63072000; includeSubDomains; preload",
    ),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (
        HeaderName::from_static("permissions-policy"),
        "camera=(), microphone=(), geolocation=(), interest-cohort=()",
    ),
];

/// Paths that load balancers probe over plain HTTP.
const REDIRECT_EXEMPT: &[&str] = &["/health", "/healthz"];

/// Wrap `router` so every response carries [`SECURITY_HEADERS`].
pub fn with_security_headers(router: Router) -> Router {
    SECURITY_HEADERS
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(
                name,
                HeaderValue::from_static(value),
            ))
        })
}

/// Redirect requests a proxy received over plain HTTP to `https`.
///
/// Only acts when `X-Forwarded-Proto` is present and not `https`, and the
/// host is not a local development address.
pub async fn redirect_to_https(request: Request, next: Next) -> Response {
    if let Some(location) = https_location(&request) {
        debug!(%location, "Redirecting to HTTPS");
        return Redirect::permanent(&location).into_response();
    }
    next.run(request).await
}

fn https_location(request: &Request) -> Option<String> {
    let path = request.uri().path();
    if REDIRECT_EXEMPT.contains(&path) {
        return None;
    }

    let headers = request.headers();
    let proto = headers.get("x-forwarded-proto")?.to_str().ok()?;
    if proto.eq_ignore_ascii_case("https") {
        return None;
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if host.is_empty() || is_local_host(host) {
        return None;
    }

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Some(format!("https://{host}{path_and_query}"))
}

fn is_local_host(host: &str) -> bool {
    host.starts_with("localhost") || host.starts_with("127.0.0.1") || host.ends_with(".local")
}
