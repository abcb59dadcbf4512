use crate::load::unsupported_error;
use crate::model::{DeriveField, IntermediateAttributes};
use quote::ToTokens;
use syn::ext::IdentExt;
use syn::spanned::Spanned;

const EMBED: &str = "embed";

impl TryFrom<&syn::Field> for DeriveField {
    type Error = syn::Error;

    fn try_from(value: &syn::Field) -> Result<Self, Self::Error> {
        let field_name = match &value.ident {
            Some(ident) => ident.clone(),
            None => {
                return Err(unsupported_error(
                    value.span(),
                    "#[derive(Flags)] requires named fields",
                ))
            }
        };
        let mut tags = Vec::default();
        let mut embedded = false;

        for attribute in &value.attrs {
            if attribute.path().is_ident("flag") {
                let IntermediateAttributes { singletons, pairs } =
                    IntermediateAttributes::try_from(attribute)?;

                for singleton in singletons {
                    if singleton == EMBED {
                        embedded = true;
                    } else {
                        return Err(unsupported_error(
                            singleton.span(),
                            format!("unknown marker `{singleton}`, expected `{EMBED}`"),
                        ));
                    }
                }

                tags.extend(pairs);
            }
        }

        Ok(DeriveField {
            type_name: type_name(&value.ty),
            field_name,
            tags,
            exported: is_exported(&value.vis),
            embedded,
        })
    }
}

impl DeriveField {
    /// The identifier as written, without any raw prefix (ex: `r#type` is `type`).
    pub fn name(&self) -> String {
        self.field_name.unraw().to_string()
    }
}

// Visible outside the struct's own module; `pub(self)` is private.
fn is_exported(visibility: &syn::Visibility) -> bool {
    match visibility {
        syn::Visibility::Public(_) => true,
        syn::Visibility::Restricted(restricted) => !restricted.path.is_ident("self"),
        syn::Visibility::Inherited => false,
    }
}

// Render the type compactly (ex: `Option < Box < Inner > >` as `Option<Box<Inner>>`).
fn type_name(ty: &syn::Type) -> String {
    let spaced = ty.to_token_stream().to_string();
    let mut out = String::with_capacity(spaced.len());
    let mut chars = spaced.chars().peekable();
    let mut previous: Option<char> = None;
    let mut in_lifetime = false;

    while let Some(c) = chars.next() {
        if c == ' ' {
            let keeps_space = match (previous, chars.peek()) {
                (Some(left), Some(right)) => {
                    (is_word(left) && is_word(*right))
                        || (in_lifetime && !matches!(right, ',' | '>' | ')' | ']' | ';'))
                }
                _ => false,
            };

            if !keeps_space {
                continue;
            }
        }

        if c == '\'' {
            in_lifetime = true;
        } else if !is_word(c) {
            in_lifetime = false;
        }

        out.push(c);
        previous = Some(c);
    }

    out
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use syn::parse_quote;

    #[test]
    fn construct_field() {
        // Setup
        let fields: syn::FieldsNamed = parse_quote! {
            {
                #[flag(default = "25")]
                #[flag(desc = "the width", embed)]
                pub width: isize
            }
        };

        // Execute
        let field = DeriveField::try_from(fields.named.first().unwrap()).unwrap();

        // Verify
        assert_eq!(field.name(), "width");
        assert_eq!(field.type_name, "isize");
        assert_eq!(
            field.tags,
            vec![
                ("default".to_string(), "25".to_string()),
                ("desc".to_string(), "the width".to_string()),
            ]
        );
        assert!(field.exported);
        assert!(field.embedded);
    }

    #[test]
    fn construct_field_private() {
        // Setup
        let fields: syn::FieldsNamed = parse_quote! {
            {
                #[serde(skip)]
                r#type: String
            }
        };

        // Execute
        let field = DeriveField::try_from(fields.named.first().unwrap()).unwrap();

        // Verify
        assert_eq!(field.name(), "type");
        assert!(field.tags.is_empty());
        assert!(!field.exported);
        assert!(!field.embedded);
    }

    #[rstest]
    #[case(parse_quote! { { pub(crate) inner: Inner } }, true)]
    #[case(parse_quote! { { pub(super) inner: Inner } }, true)]
    #[case(parse_quote! { { pub(in crate::config) inner: Inner } }, true)]
    #[case(parse_quote! { { pub(self) inner: Inner } }, false)]
    #[case(parse_quote! { { pub(in self) inner: Inner } }, false)]
    fn construct_field_restricted(#[case] fields: syn::FieldsNamed, #[case] expected: bool) {
        let field = DeriveField::try_from(fields.named.first().unwrap()).unwrap();
        assert_eq!(field.exported, expected);
    }

    #[test]
    fn construct_field_unknown_marker() {
        // Setup
        let fields: syn::FieldsNamed = parse_quote! {
            { #[flag(flatten)] pub inner: Inner }
        };

        // Execute
        let error = DeriveField::try_from(fields.named.first().unwrap()).unwrap_err();

        // Verify
        assert_eq!(
            error.to_string(),
            "Invalid - unknown marker `flatten`, expected `embed`."
        );
    }

    #[rstest]
    #[case(parse_quote! { Option<Box<Inner>> }, "Option<Box<Inner>>")]
    #[case(parse_quote! { std::time::Duration }, "std::time::Duration")]
    #[case(parse_quote! { LateBound<'a> }, "LateBound<'a>")]
    #[case(parse_quote! { Box<dyn Trait> }, "Box<dyn Trait>")]
    #[case(parse_quote! { [u8; 4] }, "[u8;4]")]
    #[case(parse_quote! { Option<&'a ()> }, "Option<&'a ()>")]
    #[case(parse_quote! { &'a mut Vec<u8> }, "&'a mut Vec<u8>")]
    #[case(parse_quote! { Cow<'a, str> }, "Cow<'a,str>")]
    #[case(parse_quote! { &'static str }, "&'static str")]
    fn render_type_name(#[case] ty: syn::Type, #[case] expected: &str) {
        assert_eq!(type_name(&ty), expected);
    }
}
