// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Mail dispatch to the site owner's inbox.
//!
//! [`MailDispatcher`] is built once at startup from [`MailConfig`]. If the
//! relay settings are incomplete it stays in an unavailable state and every
//! dispatch fails fast without touching the network.

use crate::config::{MailConfig, MailSettings};
use crate::error::{DispatchError, MailConfigError};
use crate::submission::Submission;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{debug, error, info};

/// A composed notification, ready for a transport.
#[derive(Debug, Clone)]
pub struct ContactEmail {
    pub from: Mailbox,
    pub to: Mailbox,
    pub reply_to: Mailbox,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Delivers a composed email. One attempt, no retries.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &ContactEmail) -> Result<(), DispatchError>;
}

/// SMTP relay transport.
///
/// Port 465 speaks TLS from the first byte; any other port starts in the
/// clear and upgrades with STARTTLS when the server offers it.
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpRelay {
    pub fn new(settings: &MailSettings) -> Result<Self, MailConfigError> {
        let parameters = TlsParameters::new(settings.host.clone())
            .map_err(|e| MailConfigError::Tls(e.to_string()))?;
        let tls = if settings.implicit_tls() {
            Tls::Wrapper(parameters)
        } else {
            Tls::Opportunistic(parameters)
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.host.as_str())
            .port(settings.port)
            .tls(tls)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpRelay {
    async fn send(&self, email: &ContactEmail) -> Result<(), DispatchError> {
        let message = Message::builder()
            .from(email.from.clone())
            .to(email.to.clone())
            .reply_to(email.reply_to.clone())
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))
            .map_err(|e| DispatchError::Message(e.to_string()))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        debug!(code = %response.code(), "Relay accepted message");
        Ok(())
    }
}

struct Relay {
    settings: MailSettings,
    transport: Arc<dyn MailTransport>,
}

/// Sends validated submissions through the configured relay.
pub struct MailDispatcher {
    relay: Result<Relay, MailConfigError>,
}

impl MailDispatcher {
    /// Dispatcher backed by the SMTP relay described in `config`.
    pub fn smtp(config: &MailConfig) -> Self {
        let relay = config.settings().and_then(|settings| {
            let transport: Arc<dyn MailTransport> = Arc::new(SmtpRelay::new(&settings)?);
            Ok(Relay {
                settings,
                transport,
            })
        });
        Self::from_relay(relay)
    }

    /// Dispatcher backed by an arbitrary transport. The relay settings are
    /// still validated, so a misconfigured relay never reaches `transport`.
    pub fn with_transport(config: &MailConfig, transport: Arc<dyn MailTransport>) -> Self {
        let relay = config.settings().map(|settings| Relay {
            settings,
            transport,
        });
        Self::from_relay(relay)
    }

    fn from_relay(relay: Result<Relay, MailConfigError>) -> Self {
        match &relay {
            Ok(relay) => info!(
                host = %relay.settings.host,
                port = relay.settings.port,
                implicit_tls = relay.settings.implicit_tls(),
                "Mail relay configured"
            ),
            Err(err) => error!(error = %err, "Mail relay unavailable; submissions will be refused"),
        }
        Self { relay }
    }

    pub fn is_available(&self) -> bool {
        self.relay.is_ok()
    }

    /// Why dispatch is impossible, if it is.
    pub fn unavailable_reason(&self) -> Option<&MailConfigError> {
        self.relay.as_ref().err()
    }

    /// Compose and send the notification for `submission`.
    ///
    /// `submission` is expected to be normalized and validated already.
    pub async fn dispatch(
        &self,
        submission: &Submission,
        client_id: &str,
    ) -> Result<(), DispatchError> {
        let relay = match &self.relay {
            Ok(relay) => relay,
            Err(err) => return Err(DispatchError::Unavailable(err.clone())),
        };

        let email = compose(&relay.settings, submission, client_id)?;
        relay.transport.send(&email).await
    }
}

/// Build the notification email for a submission.
pub fn compose(
    settings: &MailSettings,
    submission: &Submission,
    client_id: &str,
) -> Result<ContactEmail, DispatchError> {
    let reply_to = Mailbox::new(
        Some(submission.name.clone()),
        submission
            .email
            .parse()
            .map_err(|e| DispatchError::Message(format!("sender address: {e}")))?,
    );

    let mut lines = vec![
        format!("New contact from {}", submission.name),
        format!("Email: {}", submission.email),
    ];
    if let Some(budget) = &submission.budget {
        lines.push(format!("Budget: {budget}"));
    }
    lines.push(submission.message.clone());
    lines.push(format!("Client IP: {client_id}"));

    let text_body = lines.join("\n");
    let html_body = text_body
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                "<p>&nbsp;</p>".to_string()
            } else {
                format!("<p>{}</p>", escape_html(line))
            }
        })
        .collect();

    Ok(ContactEmail {
        from: settings.from.clone(),
        to: settings.to.clone(),
        reply_to,
        subject: format!("Portfolio contact from {}", submission.name),
        text_body,
        html_body,
    })
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
