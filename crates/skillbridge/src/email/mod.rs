//! Outbound email. Delivery is best-effort from the job service's point of view: callers get an
//! [`EmailError`] back and decide whether it matters.

mod smtp;
pub mod template;

use tracing::info;

use crate::config::EmailConfig;

pub use smtp::SmtpEmailDispatcher;
pub use template::EmailContent;

/// Sends a single HTML message to one recipient.
pub trait EmailDispatcher: Send + Sync {
    fn send_html(&self, to: &str, subject: &str, html_body: &str) -> Result<(), EmailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("invalid email address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("unable to build email message: {0}")]
    Message(String),
    #[error("email transport failed: {0}")]
    Transport(String),
}

/// Records outgoing mail in the log instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmailDispatcher;

impl EmailDispatcher for LogEmailDispatcher {
    fn send_html(&self, to: &str, subject: &str, html_body: &str) -> Result<(), EmailError> {
        if !to.contains('@') {
            return Err(EmailError::InvalidAddress {
                address: to.to_string(),
                reason: "missing '@'".to_string(),
            });
        }
        info!(recipient = to, subject, bytes = html_body.len(), "email not delivered (log transport)");
        Ok(())
    }
}

/// Dispatcher selected from [`EmailConfig`] at startup.
#[derive(Debug, Clone)]
pub enum ConfiguredEmailDispatcher {
    Smtp(SmtpEmailDispatcher),
    Log(LogEmailDispatcher),
}

impl ConfiguredEmailDispatcher {
    pub fn from_config(config: &EmailConfig) -> Result<Self, EmailError> {
        match &config.smtp_url {
            Some(url) => Ok(Self::Smtp(SmtpEmailDispatcher::new(
                url,
                &config.from_address,
            )?)),
            None => Ok(Self::Log(LogEmailDispatcher)),
        }
    }

    pub fn transport_label(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::Log(_) => "log",
        }
    }
}

impl EmailDispatcher for ConfiguredEmailDispatcher {
    fn send_html(&self, to: &str, subject: &str, html_body: &str) -> Result<(), EmailError> {
        match self {
            Self::Smtp(dispatcher) => dispatcher.send_html(to, subject, html_body),
            Self::Log(dispatcher) => dispatcher.send_html(to, subject, html_body),
        }
    }
}
