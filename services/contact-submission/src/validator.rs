// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form field validation.
//!
//! These rules are the single source of truth for both the pre-submission
//! check (`POST /contact/validate`) and the authoritative server check run
//! by [`crate::ContactService`]. Every rule is evaluated; nothing short
//! circuits, so the form can highlight every problem at once.

use crate::submission::Submission;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 80;
pub const MESSAGE_MIN_CHARS: usize = 20;
pub const MESSAGE_MAX_CHARS: usize = 1000;
pub const BUDGET_MAX_CHARS: usize = 120;

/// `local@domain.tld`, ASCII only, case-insensitive.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email regex is valid")
});

/// A validated form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
    Budget,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
            Self::Budget => "budget",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to human-readable error. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: BTreeMap<Field, String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Fields with an error, in form order.
    pub fn fields(&self) -> Vec<Field> {
        self.errors.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

/// Validate a submission. Fields are trimmed before any length is measured.
pub fn validate(submission: &Submission) -> ValidationResult {
    let mut result = ValidationResult::default();

    if let Some(message) = check_name(&submission.name) {
        result.insert(Field::Name, message);
    }
    if let Some(message) = check_email(&submission.email) {
        result.insert(Field::Email, message);
    }
    if let Some(message) = check_message(&submission.message) {
        result.insert(Field::Message, message);
    }
    if let Some(message) = submission.budget.as_deref().and_then(check_budget) {
        result.insert(Field::Budget, message);
    }

    result
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

fn check_name(name: &str) -> Option<&'static str> {
    match char_len(name) {
        n if n < NAME_MIN_CHARS => Some("Name should be at least 2 characters long."),
        n if n > NAME_MAX_CHARS => Some("Please keep the name under 80 characters."),
        _ => None,
    }
}

fn check_email(email: &str) -> Option<&'static str> {
    if is_valid_email(email) {
        None
    } else {
        Some("Share a valid email address so I can reply.")
    }
}

fn check_message(message: &str) -> Option<&'static str> {
    match char_len(message) {
        n if n < MESSAGE_MIN_CHARS => {
            Some("A bit more context helps, use at least 20 characters.")
        }
        n if n > MESSAGE_MAX_CHARS => Some("Please keep the message under 1000 characters."),
        _ => None,
    }
}

fn check_budget(budget: &str) -> Option<&'static str> {
    (char_len(budget) > BUDGET_MAX_CHARS)
        .then_some("Budget notes should be 120 characters or fewer.")
}

/// Whether `email` has the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}
