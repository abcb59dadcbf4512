mod attribute;
mod field;
mod flags;

fn unsupported_error(span: proc_macro2::Span, message: impl std::fmt::Display) -> syn::Error {
    syn::Error::new(span, format!("Invalid - {message}."))
}
