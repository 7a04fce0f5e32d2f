// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Submission Service
//!
//! Receives the portfolio site's contact form and relays it to the owner's
//! inbox, after the honeypot check, field validation and per-client rate
//! limiting.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (and `.env`):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `SMTP_HOST`, `SMTP_PORT` (default: 587), `SMTP_USER`, `SMTP_PASS`
//! - `SMTP_FROM`, `SMTP_TO`: Sender and recipient (default: `SMTP_USER`)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length (default: 600)
//! - `RATE_LIMIT_MAX`: Submissions per client per window (default: 5)
//! - `METRICS_ENABLED`: Serve `/metrics` (default: true)
//! - `ALLOWED_ORIGINS`: Comma separated CORS origins
//! - `ENFORCE_HTTPS`: Redirect proxied plain-HTTP requests (default: true)
//!
//! Missing mail settings do not stop the server; submissions are answered
//! with a "use email instead" message until the relay is configured.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_submission::{
    config::Config,
    handlers::{router, AppState},
    limiter::FixedWindowLimiter,
    mailer::MailDispatcher,
    metrics::Metrics,
    service::ContactService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        window_secs = config.rate_limit.window_secs,
        max_submissions = config.rate_limit.max_submissions,
        metrics = config.metrics.enabled,
        enforce_https = config.http.enforce_https,
        "Starting contact submission service"
    );

    let limiter = Arc::new(FixedWindowLimiter::new(config.rate_limit.clone()));
    let dispatcher = MailDispatcher::smtp(&config.mail);

    let metrics = if config.metrics.enabled {
        Some(Metrics::new()?)
    } else {
        None
    };

    let mut service = ContactService::new(limiter, dispatcher);
    if let Some(metrics) = &metrics {
        service = service.with_metrics(metrics.clone());
    }

    let addr: SocketAddr = config.bind_addr.parse()?;
    let state = Arc::new(AppState {
        service,
        metrics,
        config,
    });
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
