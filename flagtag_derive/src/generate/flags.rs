use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::model::{DeriveField, DeriveFlags};

impl TryFrom<DeriveFlags> for TokenStream2 {
    type Error = syn::Error;

    fn try_from(value: DeriveFlags) -> Result<Self, Self::Error> {
        let DeriveFlags {
            struct_name,
            generics,
            fields,
        } = value;
        let (impl_generics, type_generics, where_clause) = generics.split_for_impl();
        let fields = fields.iter().map(TokenStream2::from).collect::<Vec<_>>();

        Ok(quote! {
            #[automatically_derived]
            impl #impl_generics ::flagtag::prelude::Flags for #struct_name #type_generics #where_clause {
                fn fields(&mut self) -> ::std::vec::Vec<::flagtag::Field<'_>> {
                    #[allow(unused_imports)]
                    use ::flagtag::__private::{OpaqueProbe as _, ReflectProbe as _};
                    ::std::vec![ #( #fields ),* ]
                }
            }

            #[automatically_derived]
            impl #impl_generics ::flagtag::prelude::Reflect for #struct_name #type_generics #where_clause {
                fn as_flags(&mut self) -> ::core::option::Option<&mut dyn ::flagtag::prelude::Flags> {
                    ::core::option::Option::Some(self)
                }
            }
        })
    }
}

impl From<&DeriveField> for TokenStream2 {
    fn from(value: &DeriveField) -> Self {
        let field_name = &value.field_name;
        let name = value.name();
        let type_name = &value.type_name;
        let keys = value.tags.iter().map(|(key, _)| key);
        let values = value.tags.iter().map(|(_, value)| value);
        let embedded = if value.embedded {
            quote! { .embedded() }
        } else {
            quote! {}
        };
        let descriptor = quote! {
            ::flagtag::FieldDescriptor::new(#name, #type_name)
                .tags(&[ #( (#keys, #values) ),* ])
                #embedded
        };

        if value.exported {
            quote! {
                ::flagtag::Field::new(
                    #descriptor,
                    (&::flagtag::__private::Probe::new(&mut self.#field_name)).probe(),
                )
            }
        } else {
            quote! {
                ::flagtag::Field::opaque(#descriptor.private())
            }
        }
    }
}
