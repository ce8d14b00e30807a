//! Outbound email.
//!
//! Messages are composed here and handed to a `Mailer`. Sending is
//! fire-and-forget: a successful SMTP handoff is the only confirmation.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// A composed plain-text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

pub fn verification_email(to: &str, code: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "Verify your account".to_string(),
        body: format!(
            "Your verification code is: {}\n\nThis code expires in 10 minutes.",
            code
        ),
    }
}

/// Build the reset link `<app_url>/auth/reset-password?token=<token>`
pub fn reset_link(app_url: &str, token: &str) -> String {
    format!("{}/auth/reset-password?token={}", app_url.trim_end_matches('/'), token)
}

pub fn password_reset_email(to: &str, link: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "Reset your password".to_string(),
        body: format!(
            "Use the link below to choose a new password:\n\n{}\n\nThe link expires in 10 minutes. \
             If you did not ask for a reset, ignore this email.",
            link
        ),
    }
}

/// SMTP sender over STARTTLS with username/password credentials
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, address: &str, password: &str) -> Result<Self, MailError> {
        let from: Mailbox = address.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(port)
            .credentials(Credentials::new(address.to_string(), password.to_string()))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)?;

        self.transport.send(message).await?;
        tracing::info!("Email sent to {}", email.to);
        Ok(())
    }
}
