//! Derive macros for the quorumchain crate.
//!
//! Provides:
//! - `#[derive(Canonical)]` - canonical byte encoding for content hashing
//! - `#[derive(Error)]` - error type boilerplate (thiserror replacement)

mod canonical;
mod error;

use proc_macro::TokenStream;

/// Implements the `Canonical` trait, emitting fields in declaration order.
///
/// Fields annotated with `#[canonical(skip)]` are excluded from the encoding;
/// this is how signature slots stay outside a record's identity.
#[proc_macro_derive(Canonical, attributes(canonical))]
pub fn derive_canonical(input: TokenStream) -> TokenStream {
    canonical::derive_canonical(input)
}

/// Implements `Display` and `Error` for an enum from `#[error("...")]` attributes.
#[proc_macro_derive(Error, attributes(error))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    error::derive_error(input)
}
