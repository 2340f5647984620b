//! Outbound notifications.
//!
//! Activation and password reset tokens reach the user by email. Delivery
//! itself is an external concern; [`TracingMailer`] records each message in
//! the log instead of sending it.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::info;

use crate::domain::tokens::records::{Token, TokenScope};

/// Templated message carrying a token plaintext.
#[derive(Debug, Clone)]
pub enum Message {
    Welcome { name: String, activation: Token },
    Activation { activation: Token },
    PasswordReset { reset: Token },
}

impl Message {
    #[must_use]
    pub const fn template(&self) -> &'static str {
        match self {
            Self::Welcome { .. } => "user_welcome",
            Self::Activation { .. } => "token_activation",
            Self::PasswordReset { .. } => "token_password_reset",
        }
    }

    #[must_use]
    pub const fn scope(&self) -> TokenScope {
        match self {
            Self::Welcome { .. } | Self::Activation { .. } => TokenScope::Activation,
            Self::PasswordReset { .. } => TokenScope::PasswordReset,
        }
    }
}

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `message` to `recipient`.
    async fn send(&self, recipient: &str, message: Message) -> Result<(), MailerError>;
}

/// Mailer that logs deliveries. The token plaintext is never logged.
#[derive(Debug, Clone, Default)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, recipient: &str, message: Message) -> Result<(), MailerError> {
        info!(
            recipient,
            template = message.template(),
            scope = %message.scope(),
            "mail delivered"
        );

        Ok(())
    }
}
