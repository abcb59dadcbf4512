//! Derive module for `flagtag`.
//! See [documentation root](https://docs.rs/flagtag/latest/flagtag/derive/index.html) for full details.
extern crate proc_macro;

mod generate;
mod load;
mod model;

use crate::model::DeriveFlags;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;

/// Implement `Flags` (and the matching `Reflect`) for a struct, describing its fields in declaration order.
///
/// Fields accept `#[flag(key = "value", .., embed)]`.
#[proc_macro_derive(Flags, attributes(flag))]
pub fn flags(input: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveFlags::try_from(derive_input).and_then(TokenStream2::try_from) {
        Ok(token_stream) => token_stream.into(),
        Err(error) => error.to_compile_error().into(),
    }
}
