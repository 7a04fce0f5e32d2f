// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the contact submission service.
//!
//! None of these reach the person filling in the form. Handlers translate
//! them into a [`crate::SubmissionOutcome`] and log the detail for operators.

use thiserror::Error;

/// A required mail relay option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MailSetting {
    Host,
    User,
    Password,
    FromAddress,
    ToAddress,
}

impl MailSetting {
    /// All settings a relay needs before dispatch can be attempted.
    pub const REQUIRED: [MailSetting; 5] = [
        MailSetting::Host,
        MailSetting::User,
        MailSetting::Password,
        MailSetting::FromAddress,
        MailSetting::ToAddress,
    ];

    /// Environment variable the setting is read from.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Host => "SMTP_HOST",
            Self::User => "SMTP_USER",
            Self::Password => "SMTP_PASS",
            Self::FromAddress => "SMTP_FROM",
            Self::ToAddress => "SMTP_TO",
        }
    }
}

impl std::fmt::Display for MailSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Host => write!(f, "host"),
            Self::User => write!(f, "user"),
            Self::Password => write!(f, "password"),
            Self::FromAddress => write!(f, "from_address"),
            Self::ToAddress => write!(f, "to_address"),
        }
    }
}

/// Mail relay configuration that cannot be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailConfigError {
    #[error("Missing mail settings: {}", join_settings(.0))]
    Missing(Vec<MailSetting>),

    #[error("Invalid mailbox for {setting}: {reason}")]
    InvalidMailbox { setting: MailSetting, reason: String },

    #[error("Invalid TLS parameters: {0}")]
    Tls(String),
}

fn join_settings(settings: &[MailSetting]) -> String {
    settings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Invalid bind address {0:?}")]
    InvalidBindAddr(String),
}

/// Failure to hand a message to the mail relay.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Mail relay is not configured: {0}")]
    Unavailable(#[from] MailConfigError),

    #[error("Could not build message: {0}")]
    Message(String),

    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ConfigError>;
