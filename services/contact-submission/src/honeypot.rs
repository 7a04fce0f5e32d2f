// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Honeypot spam trap.
//!
//! The `company` input is rendered hidden, `aria-hidden` and out of the tab
//! order. People never fill it; form-filling bots do.

use crate::submission::Submission;

/// Form field name of the honeypot input.
pub const HONEYPOT_FIELD: &str = "company";

/// Whether the submission tripped the honeypot.
pub fn is_spam(submission: &Submission) -> bool {
    !submission.honeypot.trim().is_empty()
}
