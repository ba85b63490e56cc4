mod document;

use proc_macro::TokenStream;

/// Implement `skelestore::Document` using the struct's `id` field
#[proc_macro_derive(Document)]
pub fn derive_document(input: TokenStream) -> TokenStream { document::derive_document_impl(input) }
