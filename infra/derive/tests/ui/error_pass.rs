use slotbook_derive::slotbook_error;
use std::borrow::Cow;

#[slotbook_error]
pub enum StoreError {
    #[error("I/O error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn load() -> Result<(), StoreError> {
    std::fs::metadata(".").context("stat")?;
    Err("unreachable".into())
}

fn main() {
    let _ = load();
}
