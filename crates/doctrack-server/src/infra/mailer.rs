use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::{SmtpConfig, SmtpSecurity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail not configured: {0}")]
    NotConfigured(&'static str),
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("message build failed: {0}")]
    Build(String),
    #[error("smtp transport failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;

    /// Short label for logs.
    fn kind(&self) -> &'static str;
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|err| MailError::InvalidAddress {
            address: address.to_string(),
            reason: err.to_string(),
        })
}

/// Sender address: explicit `smtp.from`, then the SMTP login, then the admin address.
pub fn sender_address(config: &SmtpConfig, admin_email: Option<&str>) -> Option<String> {
    config
        .from
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| Some(config.username.trim()).filter(|value| !value.is_empty()))
        .or_else(|| admin_email.map(str::trim).filter(|value| !value.is_empty()))
        .map(str::to_string)
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig, admin_email: Option<&str>) -> Result<Self, MailError> {
        let from = sender_address(config, admin_email)
            .ok_or(MailError::NotConfigured("no sender address"))?;
        let from = parse_mailbox(&from)?;

        let builder = match config.security {
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
                    .map_err(|err| MailError::Transport(err.to_string()))?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)
                .map_err(|err| MailError::Transport(err.to_string()))?,
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
            }
        };
        let mut builder = builder
            .port(config.effective_port())
            .timeout(Some(Duration::from_secs(config.timeout_seconds.max(1))));
        if !config.username.trim().is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.trim().to_string(),
                config.password.clone().unwrap_or_default(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, MailError> {
        Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&email.to)?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|err| MailError::Build(err.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = self.build_message(email)?;
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|err| MailError::Transport(err.to_string()))
    }

    fn kind(&self) -> &'static str {
        "smtp"
    }
}

/// Stand-in used when SMTP cannot be configured; every send fails.
pub struct DisabledMailer {
    reason: &'static str,
}

impl DisabledMailer {
    pub fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), MailError> {
        Err(MailError::NotConfigured(self.reason))
    }

    fn kind(&self) -> &'static str {
        "disabled"
    }
}

/// Keeps messages in memory instead of delivering them.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    reject: HashSet<String>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends to any address in `addresses` fail with a transport error.
    pub fn rejecting<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sent: Mutex::new(Vec::new()),
            reject: addresses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        match self.sent.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        if self.reject.contains(&email.to) {
            return Err(MailError::Transport(format!("rejected {}", email.to)));
        }
        match self.sent.lock() {
            Ok(mut guard) => guard.push(email.clone()),
            Err(poisoned) => poisoned.into_inner().push(email.clone()),
        }
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
