#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Delivery of the digest over SMTP.
//!
//! One message per run, HTML only, sent through an authenticated relay
//! with STARTTLS.

use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Mailboxes};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport as _, Message, Tokio1Executor};
use secrecy::{ExposeSecret as _, Secret};

/// Default SMTP relay.
pub const DEFAULT_SMTP_SERVER: &str = "smtp.mailgun.org";

/// Default SMTP submission port.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Errors that can occur while building or sending the digest.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// A sender or recipient address could not be parsed.
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("Invalid message: {0}")]
    Message(#[from] lettre::error::Error),

    /// Connecting, authenticating, or sending failed.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Connection and credentials for the SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    /// Relay hostname.
    pub server: String,
    /// Relay port.
    pub port: u16,
    /// Username for SMTP AUTH.
    pub user: String,
    /// Password for SMTP AUTH.
    pub password: Secret<String>,
}

/// Returns the subject line for the digest sent on `date`,
/// e.g. `"Summary of Local CDP Updates - June 5, 2024"`.
#[must_use]
pub fn subject_for(date: NaiveDate) -> String {
    format!("Summary of Local CDP Updates - {}", date.format("%B %-d, %Y"))
}

/// Assembles the digest message.
///
/// `to_addresses` is a comma-separated list; every address becomes a `To`
/// recipient. `html_body` is the only content part.
///
/// # Errors
///
/// Returns [`MailError::Address`] if an address is malformed, or
/// [`MailError::Message`] if the message cannot be built (e.g., there are
/// no recipients).
pub fn build_message(
    from_address: &str,
    to_addresses: &str,
    subject: &str,
    html_body: String,
) -> Result<Message, MailError> {
    let from: Mailbox = from_address.trim().parse()?;
    let to: Mailboxes = to_addresses.parse()?;

    let mut builder = Message::builder().from(from).subject(subject);
    for mailbox in to {
        builder = builder.to(mailbox);
    }

    Ok(builder.header(ContentType::TEXT_HTML).body(html_body)?)
}

/// Sends `message` through the relay described by `settings`.
///
/// A new connection is opened for the call and closed afterwards.
///
/// # Errors
///
/// Returns [`MailError::Smtp`] if the connection, STARTTLS handshake,
/// authentication, or delivery fails.
pub async fn send(settings: &SmtpSettings, message: Message) -> Result<(), MailError> {
    let credentials = Credentials::new(
        settings.user.clone(),
        settings.password.expose_secret().clone(),
    );
    let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)?
        .port(settings.port)
        .credentials(credentials)
        .build();

    log::info!(
        "Sending digest to {} recipient(s) via {}:{}",
        message.envelope().to().len(),
        settings.server,
        settings.port
    );
    let response = transport.send(message).await?;
    log::debug!("SMTP response: {:?}", response.code());

    Ok(())
}
