use std::borrow::Cow;

/// Errors that can occur during event bus operations.
#[slotbook_derive::slotbook_error]
pub enum EventBusError {
    /// The registry holds a channel for this type id whose sender has another type.
    /// This indicates an invariant violation in the registry.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Capacity must be greater than zero.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
