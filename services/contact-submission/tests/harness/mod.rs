// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Shared fixtures for contact submission tests.
//!
//! Builds services wired to a recording mail transport and a manual clock,
//! so tests can count dispatch calls and step through rate limit windows.

#![allow(dead_code)]

pub mod generators;
pub mod transport;

use contact_submission::{
    clock::ManualClock,
    config::{MailConfig, RateLimitConfig},
    limiter::FixedWindowLimiter,
    mailer::MailDispatcher,
    metrics::Metrics,
    service::ContactService,
};
use std::sync::Arc;
use transport::RecordingTransport;

/// Everything a test needs to drive and observe the pipeline.
pub struct Fixture {
    pub service: ContactService,
    pub transport: Arc<RecordingTransport>,
    pub limiter: Arc<FixedWindowLimiter<ManualClock>>,
    pub clock: ManualClock,
    pub metrics: Metrics,
}

/// Relay settings with every required option present.
pub fn full_mail_config() -> MailConfig {
    MailConfig {
        host: Some("smtp.example.com".into()),
        port: 587,
        user: Some("owner@example.com".into()),
        password: Some("app-password".into()),
        from_address: Some("owner@example.com".into()),
        to_address: Some("owner@example.com".into()),
    }
}

pub fn fixture(mail: MailConfig, transport: RecordingTransport) -> Fixture {
    let clock = ManualClock::default();
    let limiter = Arc::new(FixedWindowLimiter::with_clock(
        RateLimitConfig::default(),
        clock.clone(),
    ));
    let transport = Arc::new(transport);
    let metrics = Metrics::new().expect("metrics registry");
    let service = ContactService::new(
        limiter.clone(),
        MailDispatcher::with_transport(&mail, transport.clone()),
    )
    .with_metrics(metrics.clone());

    Fixture {
        service,
        transport,
        limiter,
        clock,
        metrics,
    }
}

/// Fully configured relay that accepts everything.
pub fn configured() -> Fixture {
    fixture(full_mail_config(), RecordingTransport::accepting())
}
