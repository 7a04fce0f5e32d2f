// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators.

use contact_submission::Submission;
use std::net::{IpAddr, Ipv4Addr};

/// The reference valid submission: shortest name and message accepted.
pub fn valid_submission() -> Submission {
    Submission {
        name: "Jo".into(),
        email: "jo@example.com".into(),
        message: "x".repeat(20),
        budget: None,
        honeypot: String::new(),
    }
}

/// What a form-filling bot sends: every field populated.
pub fn bot_submission(i: usize) -> Submission {
    Submission {
        name: format!("Bot {i}"),
        email: format!("bot{i}@spam.example.com"),
        message: "Buy cheap followers now, limited offer inside!".into(),
        budget: Some("$$$".into()),
        honeypot: format!("Spam Corp {i}"),
    }
}

/// Generate a pool of client addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// Form-encode a submission the way the site's form posts it.
pub fn form_body(submission: &Submission) -> String {
    let mut pairs = vec![
        ("name", submission.name.as_str()),
        ("email", submission.email.as_str()),
        ("message", submission.message.as_str()),
        ("company", submission.honeypot.as_str()),
    ];
    if let Some(budget) = &submission.budget {
        pairs.push(("budget", budget.as_str()));
    }
    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
