use slotbook_derive::slotbook_error;
use std::borrow::Cow;

#[slotbook_error]
#[derive(Debug)]
pub enum MailError {
    #[error("Address error{}: {message}", format_context(.context))]
    Address { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[cfg(unix)]
    #[error("Transport error{}: {source}", format_context(.context))]
    Transport { source: std::io::Error, context: Option<Cow<'static, str>> },
}

fn main() {
    let err = MailError::Address { message: "bad".into(), context: None };
    let _ = format!("{err:?}");
}
