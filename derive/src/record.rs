use super::utils;

use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::quote;

#[derive(FromDeriveInput)]
#[darling(attributes(flowfield), supports(struct_named))]
struct RecordInput {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<(), RecordField>,
}

#[derive(FromField)]
#[darling(attributes(flowfield))]
struct RecordField {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    #[darling(default)]
    label: Option<String>,
}

/// generate the `FieldRecord` impl, or the tokens of a compile error
pub fn derive(input: syn::DeriveInput) -> Result<TokenStream, TokenStream> {
    let record = RecordInput::from_derive_input(&input).map_err(|err| err.write_errors())?;

    let fields = record
        .data
        .take_struct()
        .map(|fields| fields.fields)
        .unwrap_or_default();

    let mut idents = Vec::with_capacity(fields.len());
    let mut labels = Vec::with_capacity(fields.len());

    for field in fields {
        utils::check_vec_field(&field.ty).map_err(syn::Error::into_compile_error)?;

        // `supports(struct_named)` guarantees every field has a name
        let ident = match field.ident {
            Some(ident) => ident,
            None => continue,
        };

        let label = field.label.unwrap_or_else(|| ident.to_string());

        labels.push(syn::LitStr::new(&label, ident.span()));
        idents.push(ident);
    }

    let struct_type = record.ident;
    let (impl_generics, ty_generics, where_clause) = record.generics.split_for_impl();

    // declare the whole trait
    let expanded = quote! {
        impl #impl_generics flowfield::FieldRecord for #struct_type #ty_generics #where_clause {
            fn labels() -> Vec<&'static str> {
                vec![#(#labels),*]
            }

            fn into_grid(self, info: flowfield::GridInfo) -> std::result::Result<flowfield::Grid, flowfield::Error> {
                flowfield::GridBuilder::new()
                    #(.field(#labels, self.#idents))*
                    .info(info)
                    .build()
            }

            fn from_grid(grid: &flowfield::Grid) -> std::result::Result<Self, flowfield::Error> {
                Ok(Self {
                    #(#idents: grid.field(#labels)?.to_vec(),)*
                })
            }
        }
    };

    Ok(expanded)
}
