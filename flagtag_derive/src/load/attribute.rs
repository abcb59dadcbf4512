use crate::load::unsupported_error;
use crate::model::IntermediateAttributes;
use quote::ToTokens;
use syn::spanned::Spanned;

impl TryFrom<&syn::Attribute> for IntermediateAttributes {
    type Error = syn::Error;

    fn try_from(value: &syn::Attribute) -> Result<Self, Self::Error> {
        let attributes_parser =
            syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated;
        let expressions = value.parse_args_with(attributes_parser)?;
        let mut attributes = IntermediateAttributes::default();

        for expression in expressions {
            match expression {
                syn::Expr::Assign(assignment) => {
                    let key = match assignment.left.as_ref() {
                        syn::Expr::Path(path) => match path.path.get_ident() {
                            Some(ident) => ident.to_string(),
                            None => {
                                return Err(unsupported_error(
                                    path.span(),
                                    "tag key must be an identifier",
                                ))
                            }
                        },
                        left => {
                            return Err(unsupported_error(
                                left.span(),
                                "tag key must be an identifier",
                            ))
                        }
                    };
                    let value = match assignment.right.as_ref() {
                        syn::Expr::Lit(syn::ExprLit {
                            lit: syn::Lit::Str(literal),
                            ..
                        }) => literal.value(),
                        right => {
                            return Err(unsupported_error(
                                right.span(),
                                format!("tag `{key}` must be a string literal"),
                            ))
                        }
                    };
                    attributes.pairs.push((key, value));
                }
                syn::Expr::Path(path) => match path.path.get_ident() {
                    Some(ident) => attributes.singletons.push(ident.clone()),
                    None => {
                        return Err(unsupported_error(
                            path.span(),
                            "marker must be an identifier",
                        ))
                    }
                },
                _ => {
                    let tokens = expression.to_token_stream();
                    return Err(unsupported_error(
                        expression.span(),
                        format!("unparseable attribute `{tokens}`"),
                    ));
                }
            };
        }

        Ok(attributes)
    }
}
