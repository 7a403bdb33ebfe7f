use {
    crate::common::{extract_repr, get_crate_name},
    darling::{
        ast::{Data, Fields},
        util::Ignored,
        Error, FromDeriveInput, FromVariant, Result,
    },
    proc_macro2::TokenStream,
    quote::quote,
    syn::{Attribute, DeriveInput, Ident, Path},
};

#[derive(FromVariant)]
struct Variant {
    ident: Ident,
    fields: Fields<Ignored>,
}

#[derive(FromDeriveInput)]
#[darling(attributes(binary), supports(enum_unit), forward_attrs(repr))]
struct EnumArgs {
    ident: Ident,
    attrs: Vec<Attribute>,
    data: Data<Variant, Ignored>,
    #[darling(rename = "crate")]
    crate_path: Option<Path>,
}

pub(crate) fn generate(input: DeriveInput) -> Result<TokenStream> {
    let args = EnumArgs::from_derive_input(&input)?;
    let ident = &args.ident;
    let crate_name = get_crate_name(&args.crate_path);
    let repr = extract_repr(&args.attrs, ident)?;

    let Data::Enum(variants) = &args.data else {
        return Err(Error::custom("`BinaryEnum` can only be derived for enums"));
    };
    if let Some(variant) = variants.iter().find(|variant| !variant.fields.is_empty()) {
        return Err(Error::custom("`BinaryEnum` variants cannot carry fields")
            .with_span(&variant.ident));
    }
    let variants: Vec<_> = variants.iter().map(|variant| &variant.ident).collect();

    Ok(quote! {
        const _: () = {
            use #crate_name::{Binary, BinaryEnum, Handler};

            impl BinaryEnum for #ident {
                type Repr = #repr;

                fn from_repr(repr: #repr) -> Option<Self> {
                    #(
                        if repr == Self::#variants as #repr {
                            return Some(Self::#variants);
                        }
                    )*
                    None
                }

                fn to_repr(&self) -> #repr {
                    match *self {
                        #(Self::#variants => Self::#variants as #repr,)*
                    }
                }
            }

            impl Binary for #ident {
                #[inline]
                fn enumeration() -> Option<Handler<Self>> {
                    Some(Handler::enumeration())
                }
            }
        };
    })
}
