// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Submission Service
//!
//! Server-side handler for the portfolio contact form. A submission passes
//! through a strictly linear pipeline:
//!
//! - Honeypot check (bots get a silent success, nothing is sent)
//! - Field validation (every field evaluated, all errors reported at once)
//! - Per-client fixed window rate limiting (5 submissions per 10 minutes)
//! - Mail relay dispatch to the site owner's inbox
//!
//! Every stage ends in exactly one [`SubmissionOutcome`].

pub mod client_id;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod honeypot;
pub mod limiter;
pub mod mailer;
pub mod metrics;
pub mod security;
pub mod service;
pub mod submission;
pub mod validator;

pub use config::Config;
pub use limiter::{FixedWindowLimiter, RateLimitResult, RateLimitStore};
pub use mailer::{MailDispatcher, MailTransport};
pub use service::ContactService;
pub use submission::{Submission, SubmissionOutcome};
pub use validator::{Field, ValidationResult};
