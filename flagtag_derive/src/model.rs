#[derive(Debug, Default, PartialEq, Eq)]
pub struct IntermediateAttributes {
    pub singletons: Vec<syn::Ident>,
    pub pairs: Vec<(String, String)>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveField {
    pub field_name: syn::Ident,
    pub type_name: String,
    pub tags: Vec<(String, String)>,
    pub exported: bool,
    pub embedded: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveFlags {
    pub struct_name: syn::Ident,
    pub generics: syn::Generics,
    pub fields: Vec<DeriveField>,
}
