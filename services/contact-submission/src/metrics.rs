// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for submission outcomes.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Label used for honeypot hits, which callers see as success.
pub const SPAM_LABEL: &str = "spam";

/// Submission counters on a private registry.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let submissions = IntCounterVec::new(
            Opts::new(
                "contact_submissions_total",
                "Contact form submissions by terminal outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(submissions.clone()))?;

        Ok(Self {
            registry,
            submissions,
        })
    }

    pub fn record(&self, outcome: &str) {
        self.submissions.with_label_values(&[outcome]).inc();
    }

    pub fn count(&self, outcome: &str) -> u64 {
        self.submissions.with_label_values(&[outcome]).get()
    }

    /// Text exposition format.
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!(error = %e, "Failed to encode metrics");
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
