use {
    darling::{Error, Result},
    syn::{parse_quote, Attribute, Ident, Path},
};

/// The path the generated code uses to reach `rawbytes`.
///
/// Defaults to `::rawbytes`; `#[binary(crate = "...")]` overrides it for
/// re-exporting crates.
pub(crate) fn get_crate_name(crate_path: &Option<Path>) -> Path {
    crate_path
        .clone()
        .unwrap_or_else(|| parse_quote!(::rawbytes))
}

const INTEGER_REPRS: &[&str] = &["u8", "i8", "u16", "i16", "u32", "i32", "u64", "i64"];

/// Extract the integer type from `#[repr(..)]`, ignoring `C` and other hints.
pub(crate) fn extract_repr(attrs: &[Attribute], ident: &Ident) -> Result<Ident> {
    let mut repr = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("repr")) {
        attr.parse_nested_meta(|meta| {
            if let Some(found) = meta.path.get_ident() {
                if INTEGER_REPRS.iter().any(|name| found == name) {
                    repr = Some(found.clone());
                }
            }
            Ok(())
        })?;
    }
    repr.ok_or_else(|| {
        Error::custom(format!(
            "`{ident}` needs an integer representation, e.g. `#[repr(u8)]`; \
             supported: {}",
            INTEGER_REPRS.join(", ")
        ))
        .with_span(ident)
    })
}

#[cfg(test)]
mod tests {
    use {super::*, syn::DeriveInput};

    fn repr_of(input: DeriveInput) -> Result<Ident> {
        extract_repr(&input.attrs, &input.ident)
    }

    #[test]
    fn fixed_width_reprs_are_accepted() {
        let input: DeriveInput = parse_quote! {
            #[repr(C, u16)]
            enum Kind { A = 1 }
        };
        assert_eq!(repr_of(input).unwrap(), "u16");
    }

    #[test]
    fn wide_and_missing_reprs_are_rejected() {
        let wide: DeriveInput = parse_quote! {
            #[repr(u128)]
            enum Kind { A = 1 }
        };
        assert!(repr_of(wide).is_err());

        let bare: DeriveInput = parse_quote! {
            enum Kind { A }
        };
        assert!(repr_of(bare).is_err());
    }
}
