use std::borrow::Cow;

#[slotbook_derive::slotbook_error]
pub enum NotifierError {
    #[error("Invalid mail address{}: {source}", format_context(.context))]
    Address { source: lettre::address::AddressError, context: Option<Cow<'static, str>> },
    #[error("Mail composition failed{}: {source}", format_context(.context))]
    Message { source: lettre::error::Error, context: Option<Cow<'static, str>> },
    #[error("SMTP failure{}: {source}", format_context(.context))]
    Smtp { source: lettre::transport::smtp::Error, context: Option<Cow<'static, str>> },
    #[error("Notifier event bus error{}: {source}", format_context(.context))]
    Events { source: slotbook_event_bus::EventBusError, context: Option<Cow<'static, str>> },
}
