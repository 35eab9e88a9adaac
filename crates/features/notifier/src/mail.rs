//! Composing and sending the confirmation.

use crate::error::{NotifierError, NotifierErrorExt};
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use slotbook_booking::{Registration, SmtpSettings};
use std::future::Future;
use tracing::debug;

/// A plain-text confirmation addressed to the participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Confirmation {
    #[must_use]
    pub fn for_registration(record: &Registration) -> Self {
        let body = format!(
            "Hello {name},\n\n\
             Your registration is confirmed.\n\n\
             Date: {date}\n\
             Cohort: {cohort}\n\
             College: {college}\n\
             Food preference: {food}\n\n\
             Please keep this email for your records.\n",
            name = record.name,
            date = record.date,
            cohort = record.cohort,
            college = record.college,
            food = record.food,
        );
        Self { to: record.email.clone(), subject: format!("Registration confirmed: {}", record.date), body }
    }
}

/// Delivers confirmations. The listener only ever calls this; tests swap it out.
pub trait Mailer: Send + Sync + 'static {
    fn send(
        &self,
        smtp: &SmtpSettings,
        mail: Confirmation,
    ) -> impl Future<Output = Result<(), NotifierError>> + Send;
}

/// Sends through the configured SMTP account. A transport is built per message since
/// the account may change between admissions.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpMailer;

impl SmtpMailer {
    fn compose(smtp: &SmtpSettings, mail: Confirmation) -> Result<Message, NotifierError> {
        let from = smtp.from.parse::<Mailbox>().context("Sender")?;
        let to = mail.to.parse::<Mailbox>().context("Recipient")?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)
            .context("Confirmation")
    }

    fn transport(smtp: &SmtpSettings) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifierError> {
        let builder = if smtp.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
        }
        .context(format!("Relay {}", smtp.host))?
        .port(smtp.port);

        let builder = if smtp.user.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(smtp.user.clone(), smtp.pass.clone()))
        };
        Ok(builder.build())
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, smtp: &SmtpSettings, mail: Confirmation) -> Result<(), NotifierError> {
        let message = Self::compose(smtp, mail)?;
        let transport = Self::transport(smtp)?;
        let response = transport.send(message).await.context(format!("Delivery via {}", smtp.host))?;
        debug!(code = %response.code(), "Confirmation accepted by relay");
        Ok(())
    }
}
