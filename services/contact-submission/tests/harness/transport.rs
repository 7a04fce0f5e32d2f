// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Mail transport that records instead of sending.

use async_trait::async_trait;
use contact_submission::error::DispatchError;
use contact_submission::mailer::{ContactEmail, MailTransport};
use std::sync::Mutex;

/// Records every email handed to it.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<ContactEmail>>,
    failure: Option<String>,
}

impl RecordingTransport {
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Transport that records the attempt and then fails with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(reason.to_string()),
        }
    }

    /// Number of send attempts.
    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent(&self) -> Vec<ContactEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: &ContactEmail) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(email.clone());
        match &self.failure {
            Some(reason) => Err(DispatchError::Transport(reason.clone())),
            None => Ok(()),
        }
    }
}
