// src/services/mailer.rs

//! Outreach mail delivery.
//!
//! One SMTP session per message; a failed send surfaces as an error to
//! the caller, which treats it as a per-address degradation.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::{MailConfig, MailCredentials};

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message to one recipient.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// SMTPS (implicit TLS) submission transport.
pub struct SmtpMailer {
    config: MailConfig,
    credentials: MailCredentials,
}

impl SmtpMailer {
    pub fn new(config: MailConfig, credentials: MailCredentials) -> Self {
        Self {
            config,
            credentials,
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let from = self
            .credentials
            .address
            .parse::<Mailbox>()
            .map_err(AppError::mail)?;
        let to = to.parse::<Mailbox>().map_err(AppError::mail)?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(AppError::mail)?;

        // Session per message; no pooling across sends or runs.
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(AppError::mail)?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.credentials.address.clone(),
                self.credentials.password.clone(),
            ))
            .build();

        transport.send(message).await.map_err(AppError::mail)?;
        Ok(())
    }
}
