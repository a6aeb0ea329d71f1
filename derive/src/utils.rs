use syn::spanned::Spanned;
use syn::Error;
use syn::Result;

/// check that a field type is `Vec<T>` for a single element type `T`
pub(crate) fn check_vec_field(field_type: &syn::Type) -> Result<()> {
    let path = match field_type {
        syn::Type::Path(path) if path.qself.is_none() => &path.path,
        _ => {
            return Err(Error::new(
                field_type.span(),
                "unhandled datatype. Only accepts Vec<T> of a numeric type",
            ))
        }
    };

    let last = path
        .segments
        .last()
        .ok_or_else(|| Error::new(path.span(), "empty type path"))?;

    if last.ident != "Vec" {
        return Err(Error::new(
            last.ident.span(),
            "expected a Vec<T> of per-bin values",
        ));
    }

    match &last.arguments {
        syn::PathArguments::AngleBracketed(args) if args.args.len() == 1 => Ok(()),
        _ => Err(Error::new(
            last.arguments.span(),
            "expected exactly one element type in Vec<T>",
        )),
    }
}
