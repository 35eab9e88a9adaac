#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the workspace.
//!
//! * [`macro@slotbook_error`] turns an enum into a `thiserror` error with `.context(...)` support.
//! * [`macro@slotbook_slice`] wraps a feature state struct into a cloneable, registrable slice.
//! * [`macro@api_model`] and [`macro@api_handler`] keep the HTTP DTOs and handlers consistent
//!   with the generated `OpenAPI` document.
//!
//! Examples are `ignore`d here because a proc-macro crate cannot use its own macros.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to define a standard API data model.
///
/// Adds `Debug`, `Serialize`, `Deserialize` and `utoipa::ToSchema` when they are not
/// already derived, and applies `#[serde(rename_all = "camelCase")]` unless told otherwise.
///
/// # Arguments
///
/// * `rename_all = "..."` - Overrides the default Serde rename policy.
/// * `deny_unknown_fields = true` - Rejects payloads carrying unknown keys.
///
/// # Example
///
/// ```rust,ignore
/// #[slotbook_derive::api_model]
/// pub struct SlotsResponse {
///     pub total_remaining: u32,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro to bridge Axum handlers with `OpenAPI` documentation.
///
/// Accepts the regular `utoipa::path` arguments and silences `clippy::unused_async`,
/// which many extractor-only handlers would otherwise trigger.
///
/// # Example
///
/// ```rust,ignore
/// #[slotbook_derive::api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = "System"
/// )]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for crate-level error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already present.
/// * `<ErrorName>Ext` trait adding `.context(...)` to `Result<T, ErrorName>` and to
///   `Result<T, Source>` for every variant holding a `source` field.
/// * `From<Source>` for those variants, so `?` works on upstream errors.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper usable from `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. A variant with a source must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[slotbook_derive::slotbook_error]
/// pub enum LedgerError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read() -> Result<Vec<u8>, LedgerError> {
///     std::fs::read("ledger.json").context("Reading ledger")
/// }
/// ```
#[proc_macro_attribute]
pub fn slotbook_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a feature slice handle.
///
/// Generates `<Name>Inner` holding the declared fields, an `Arc` wrapper named `<Name>`
/// with `new`/`Deref`, and the `FeatureSlice` impl used by the kernel registry.
///
/// # Example
/// ```rust,ignore
/// #[slotbook_derive::slotbook_slice]
/// pub struct Reporting {
///     pub ledger: Ledger,
/// }
///
/// let slice = Reporting::new(ReportingInner { ledger });
/// ```
#[proc_macro_attribute]
pub fn slotbook_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
