use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, WherePredicate};

pub fn derive_document_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return syn::Error::new_spanned(name, "Document can only be derived for structs with named fields").to_compile_error().into(),
        },
        _ => return syn::Error::new_spanned(name, "Document can only be derived for structs").to_compile_error().into(),
    };

    // The identifier is stored at `$.id` in the body, so the field must be called `id`
    if !fields.iter().any(|f| f.ident.as_ref().is_some_and(|ident| ident == "id")) {
        return syn::Error::new_spanned(name, "Document requires an `id` field").to_compile_error().into();
    }

    // Generic documents only satisfy the trait's serde/Send/Sync supertraits for some parameters
    let (_, ty_generics, _) = input.generics.split_for_impl();
    let mut generics = input.generics.clone();
    if !generics.params.is_empty() {
        let bound: WherePredicate = parse_quote! {
            #name #ty_generics: ::skelestore::derive_deps::serde::Serialize
                + ::skelestore::derive_deps::serde::de::DeserializeOwned
                + ::std::marker::Send
                + ::std::marker::Sync
                + 'static
        };
        generics.make_where_clause().predicates.push(bound);
    }
    let (impl_generics, _, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::skelestore::Document for #name #ty_generics #where_clause {
            fn id(&self) -> ::std::string::String {
                ::std::string::ToString::to_string(&self.id)
            }
        }
    };

    expanded.into()
}
