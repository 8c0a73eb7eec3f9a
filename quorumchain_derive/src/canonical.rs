//! Derive macro for canonical encoding.
//!
//! Generates a `Canonical` implementation that writes each named field into the
//! sink in declaration order. The declaration order therefore *is* the fixed
//! field order the encoding contract requires; reordering fields changes every
//! hash derived from the type.
//!
//! ```ignore
//! use quorumchain_derive::Canonical;
//!
//! #[derive(Canonical)]
//! pub struct Transaction {
//!     pub sender: AccountId,
//!     pub script: String,
//!     pub premium: u64,
//!     pub nonce: u64,
//!     #[canonical(skip)]
//!     pub signature: String,
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DataStruct, DeriveInput, Field, Fields};

/// Derives `Canonical` for a named-field struct.
pub fn derive_canonical(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return syn::Error::new_spanned(
                &input,
                "Canonical derive supports structs with named fields only",
            )
            .to_compile_error()
            .into();
        }
    };

    let writes = fields.iter().filter(|f| !is_skipped(f)).map(|f| {
        let ident = &f.ident;
        quote! {
            crate::types::canonical::Canonical::encode(&self.#ident, out);
        }
    });

    let expanded = quote! {
        impl #impl_generics crate::types::canonical::Canonical for #name #ty_generics #where_clause {
            fn encode<S: crate::types::canonical::CanonicalSink>(&self, out: &mut S) {
                #(#writes)*
            }
        }
    };

    TokenStream::from(expanded)
}

/// Returns `true` if the field carries `#[canonical(skip)]`.
fn is_skipped(field: &Field) -> bool {
    field.attrs.iter().any(|attr| {
        if !attr.path().is_ident("canonical") {
            return false;
        }
        let mut skip = false;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
            }
            Ok(())
        });
        skip
    })
}
