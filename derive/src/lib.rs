mod record;
mod utils;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive `flowfield::FieldRecord` for a struct of per-bin vectors
///
/// Every field must be a `Vec<T>` of a numeric element type. The grid label
/// of a field is its name unless set with `#[flowfield(label = "...")]`.
#[proc_macro_derive(FieldRecord, attributes(flowfield))]
pub fn derive_field_record(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let input = parse_macro_input!(input as DeriveInput);

    record::derive(input)
        .unwrap_or_else(|err| err)
        .into()
}
