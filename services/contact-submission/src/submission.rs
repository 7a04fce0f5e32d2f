// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission input and the outcomes it can end in.

use crate::validator::ValidationResult;
use serde::Deserialize;
use std::time::Duration;

/// A contact form submission, exactly as posted.
///
/// Missing form fields deserialize as empty strings. `company` is the
/// honeypot: the form hides it from people and assistive tech, so only
/// bots fill it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default, rename = "company")]
    pub honeypot: String,
}

impl Submission {
    /// Copy with every field trimmed and a blank budget dropped.
    pub fn normalized(&self) -> Submission {
        Submission {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
            budget: self
                .budget
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string),
            honeypot: self.honeypot.trim().to_string(),
        }
    }
}

/// Terminal result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Delivered, or silently dropped as spam
    Success,
    /// One or more fields need correcting
    ValidationError(ValidationResult),
    /// Too many submissions from this client in the current window
    RateLimited { retry_after: Duration },
    /// Mail relay is not configured
    ServiceUnavailable,
    /// Mail relay rejected or could not be reached
    DispatchFailed,
}

impl SubmissionOutcome {
    /// Stable machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ValidationError(_) => "validation_error",
            Self::RateLimited { .. } => "rate_limited",
            Self::ServiceUnavailable => "service_unavailable",
            Self::DispatchFailed => "dispatch_failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Text shown to the person who submitted the form.
    ///
    /// Never carries transport or configuration detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Success => "Message delivered, I'll reply as soon as I can.",
            Self::ValidationError(_) => "Please fix the highlighted fields and try again.",
            Self::RateLimited { .. } => "You reached the message limit. Please try again later.",
            Self::ServiceUnavailable => {
                "Messaging is unavailable right now. Please try email instead."
            }
            Self::DispatchFailed => "I couldn't send that right now. Please try again shortly.",
        }
    }
}
