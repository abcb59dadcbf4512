use crate::load::unsupported_error;
use crate::model::{DeriveField, DeriveFlags};

impl TryFrom<syn::DeriveInput> for DeriveFlags {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let fields = match &value.data {
            syn::Data::Struct(ds) => match &ds.fields {
                syn::Fields::Named(fields) => fields
                    .named
                    .iter()
                    .map(DeriveField::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
                syn::Fields::Unit => Vec::default(),
                syn::Fields::Unnamed(_) => {
                    return Err(unsupported_error(
                        value.ident.span(),
                        "#[derive(Flags)] cannot be applied to a tuple struct",
                    ))
                }
            },
            syn::Data::Enum(_) => {
                return Err(unsupported_error(
                    value.ident.span(),
                    "#[derive(Flags)] cannot be applied to an enum",
                ))
            }
            syn::Data::Union(_) => {
                return Err(unsupported_error(
                    value.ident.span(),
                    "#[derive(Flags)] cannot be applied to a union",
                ))
            }
        };

        Ok(DeriveFlags {
            struct_name: value.ident,
            generics: value.generics,
            fields,
        })
    }
}
