// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission pipeline.
//!
//! Received -> honeypot -> validation -> rate limit -> dispatch. Each stage
//! either hands the submission on or ends it with a [`SubmissionOutcome`].
//! A stage that ends the pipeline leaves no trace in later stages: failed
//! validation is never counted against the rate limit, and nothing is
//! mailed unless every earlier stage passed.

use crate::error::DispatchError;
use crate::honeypot;
use crate::limiter::{RateLimitResult, RateLimitStore};
use crate::mailer::MailDispatcher;
use crate::metrics::{Metrics, SPAM_LABEL};
use crate::submission::{Submission, SubmissionOutcome};
use crate::validator;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Runs submissions through the pipeline.
pub struct ContactService {
    limiter: Arc<dyn RateLimitStore>,
    dispatcher: MailDispatcher,
    metrics: Option<Metrics>,
}

impl ContactService {
    pub fn new(limiter: Arc<dyn RateLimitStore>, dispatcher: MailDispatcher) -> Self {
        Self {
            limiter,
            dispatcher,
            metrics: None,
        }
    }

    /// Count outcomes into `metrics`.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn dispatcher(&self) -> &MailDispatcher {
        &self.dispatcher
    }

    /// Handle one submission from `client_id`.
    pub async fn submit(&self, submission: &Submission, client_id: &str) -> SubmissionOutcome {
        if honeypot::is_spam(submission) {
            info!(client_id, "Honeypot filled, dropping submission");
            self.record(SPAM_LABEL);
            return SubmissionOutcome::Success;
        }

        let submission = submission.normalized();
        let outcome = self.process(&submission, client_id).await;
        self.record(outcome.kind());
        outcome
    }

    async fn process(&self, submission: &Submission, client_id: &str) -> SubmissionOutcome {
        let errors = validator::validate(submission);
        if !errors.is_valid() {
            debug!(client_id, fields = ?errors.fields(), "Submission failed validation");
            return SubmissionOutcome::ValidationError(errors);
        }

        // The limiter lock is released before dispatch awaits the relay.
        match self.limiter.check_and_increment(client_id).await {
            RateLimitResult::Allowed { remaining, .. } => {
                debug!(client_id, remaining, "Submission within rate limit");
            }
            RateLimitResult::Limited { retry_after } => {
                info!(
                    client_id,
                    retry_after_secs = retry_after.as_secs(),
                    "Submission rate limited"
                );
                return SubmissionOutcome::RateLimited { retry_after };
            }
        }

        match self.dispatcher.dispatch(submission, client_id).await {
            Ok(()) => {
                info!(
                    client_id,
                    message_chars = submission.message.chars().count(),
                    has_budget = submission.budget.is_some(),
                    "Contact submission delivered"
                );
                SubmissionOutcome::Success
            }
            Err(DispatchError::Unavailable(reason)) => {
                error!(client_id, error = %reason, "Mail relay not configured");
                SubmissionOutcome::ServiceUnavailable
            }
            Err(err) => {
                warn!(client_id, error = %err, "Contact email failed");
                SubmissionOutcome::DispatchFailed
            }
        }
    }

    fn record(&self, label: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record(label);
        }
    }
}
