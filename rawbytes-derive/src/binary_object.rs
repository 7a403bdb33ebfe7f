use {
    crate::common::get_crate_name,
    darling::{
        ast::Data,
        util::Ignored,
        Error, FromDeriveInput, Result,
    },
    proc_macro2::TokenStream,
    quote::quote,
    syn::{
        meta::ParseNestedMeta, DeriveInput, Expr, Field, Generics, Ident, LitBool, LitInt, LitStr,
        Path, Token,
    },
};

#[derive(FromDeriveInput)]
#[darling(attributes(binary), supports(struct_named))]
struct ObjectArgs {
    ident: Ident,
    generics: Generics,
    data: Data<Ignored, Field>,
    endianness: Option<LitStr>,
    #[darling(rename = "crate")]
    crate_path: Option<Path>,
}

/// `"little" | "big"` to an `Endianness` variant; `"default"` inherits.
fn endianness(crate_name: &Path, lit: &LitStr) -> syn::Result<Option<TokenStream>> {
    match lit.value().to_ascii_lowercase().as_str() {
        "little" => Ok(Some(quote!(#crate_name::Endianness::Little))),
        "big" => Ok(Some(quote!(#crate_name::Endianness::Big))),
        "default" | "inherit" => Ok(None),
        "system" | "system_default" | "native" => {
            Ok(Some(quote!(#crate_name::Endianness::SystemDefault)))
        }
        _ => Err(syn::Error::new(
            lit.span(),
            "expected \"little\", \"big\", \"system\" or \"default\"",
        )),
    }
}

fn sign(crate_name: &Path, lit: &LitStr) -> syn::Result<Option<TokenStream>> {
    match lit.value().to_ascii_lowercase().as_str() {
        "signed" => Ok(Some(quote!(#crate_name::Sign::Signed))),
        "unsigned" => Ok(Some(quote!(#crate_name::Sign::Unsigned))),
        "default" => Ok(None),
        _ => Err(syn::Error::new(
            lit.span(),
            "expected \"signed\", \"unsigned\" or \"default\"",
        )),
    }
}

/// `name` or `name = true|false`.
fn flag(meta: &ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.peek(Token![=]) {
        Ok(meta.value()?.parse::<LitBool>()?.value)
    } else {
        Ok(true)
    }
}

fn size(meta: &ParseNestedMeta) -> syn::Result<usize> {
    let value = meta.value()?;
    if value.peek(Token![-]) {
        return Err(meta.error("size cannot be negative"));
    }
    value.parse::<LitInt>()?.base10_parse()
}

/// One binary layout entry declared on a field.
enum Item {
    Member {
        options: Vec<TokenStream>,
    },
    Padding {
        size: usize,
    },
    Exact {
        data: LitStr,
        encoding: LitStr,
    },
    Custom {
        size: usize,
        id: Option<LitStr>,
    },
}

struct Entry {
    item: Item,
    order: Option<Expr>,
}

fn parse_member(
    meta: &ParseNestedMeta,
    crate_name: &Path,
    order: &mut Option<Expr>,
) -> syn::Result<Item> {
    let mut options = Vec::new();
    if !meta.input.peek(syn::token::Paren) {
        return Ok(Item::Member { options });
    }
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("size") {
            let size = size(&inner)?;
            options.push(quote!(.size(#size)));
        } else if inner.path.is_ident("endianness") {
            if let Some(value) = endianness(crate_name, &inner.value()?.parse()?)? {
                options.push(quote!(.endianness(#value)));
            }
        } else if inner.path.is_ident("sign") {
            if let Some(value) = sign(crate_name, &inner.value()?.parse()?)? {
                options.push(quote!(.sign(#value)));
            }
        } else if inner.path.is_ident("encoding") {
            let encoding: LitStr = inner.value()?.parse()?;
            options.push(quote!(.encoding(#encoding)));
        } else if inner.path.is_ident("null_terminated") {
            let value = flag(&inner)?;
            options.push(quote!(.null_terminated(#value)));
        } else if inner.path.is_ident("trim_large_data") {
            let value = flag(&inner)?;
            options.push(quote!(.trim_large_data(#value)));
        } else if inner.path.is_ident("trim_chars") {
            let chars: LitStr = inner.value()?.parse()?;
            options.push(quote!(.trim_chars(#chars)));
        } else if inner.path.is_ident("order") {
            *order = Some(inner.value()?.parse()?);
        } else {
            return Err(inner.error("unknown member option"));
        }
        Ok(())
    })?;
    Ok(Item::Member { options })
}

fn parse_padding(meta: &ParseNestedMeta, order: &mut Option<Expr>) -> syn::Result<Item> {
    let mut padding = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("size") {
            padding = Some(size(&inner)?);
        } else if inner.path.is_ident("order") {
            *order = Some(inner.value()?.parse()?);
        } else {
            return Err(inner.error("unknown padding option"));
        }
        Ok(())
    })?;
    let size = padding.ok_or_else(|| meta.error("padding needs a `size`"))?;
    Ok(Item::Padding { size })
}

fn parse_exact(meta: &ParseNestedMeta, order: &mut Option<Expr>) -> syn::Result<Item> {
    let mut data = None;
    let mut encoding = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("data") {
            data = Some(inner.value()?.parse::<LitStr>()?);
        } else if inner.path.is_ident("encoding") {
            encoding = Some(inner.value()?.parse::<LitStr>()?);
        } else if inner.path.is_ident("order") {
            *order = Some(inner.value()?.parse()?);
        } else {
            return Err(inner.error("unknown exact option"));
        }
        Ok(())
    })?;
    let data = data.ok_or_else(|| meta.error("exact needs `data`"))?;
    let encoding = encoding.unwrap_or_else(|| LitStr::new("utf-8", data.span()));
    Ok(Item::Exact { data, encoding })
}

fn parse_custom(meta: &ParseNestedMeta, order: &mut Option<Expr>) -> syn::Result<Item> {
    let mut custom = None;
    let mut id = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("size") {
            custom = Some(size(&inner)?);
        } else if inner.path.is_ident("id") {
            id = Some(inner.value()?.parse::<LitStr>()?);
        } else if inner.path.is_ident("order") {
            *order = Some(inner.value()?.parse()?);
        } else {
            return Err(inner.error("unknown custom option"));
        }
        Ok(())
    })?;
    let size = custom.ok_or_else(|| meta.error("custom needs a `size`"))?;
    Ok(Item::Custom { size, id })
}

/// Every `#[binary(..)]` entry on `field`, in declaration order.
fn field_entries(field: &Field, crate_name: &Path) -> syn::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("binary")) {
        attr.parse_nested_meta(|meta| {
            let mut order = None;
            let item = if meta.path.is_ident("member") {
                if entries
                    .iter()
                    .any(|entry: &Entry| matches!(entry.item, Item::Member { .. }))
                {
                    return Err(meta.error("a field can only be one member"));
                }
                parse_member(&meta, crate_name, &mut order)?
            } else if meta.path.is_ident("padding") {
                parse_padding(&meta, &mut order)?
            } else if meta.path.is_ident("exact") {
                parse_exact(&meta, &mut order)?
            } else if meta.path.is_ident("custom") {
                parse_custom(&meta, &mut order)?
            } else {
                return Err(meta.error("expected `member`, `padding`, `exact` or `custom`"));
            };
            entries.push(Entry { item, order });
            Ok(())
        })?;
    }
    Ok(entries)
}

fn builder_call(entry: &Entry, field: &Ident, crate_name: &Path) -> TokenStream {
    let name = field.to_string();
    let call = match &entry.item {
        Item::Member { options } => quote! {
            .member(
                #name,
                #crate_name::MemberOptions::new() #(#options)*,
                |object: &Self| &object.#field,
                |object: &mut Self, value| object.#field = value,
            )
        },
        Item::Padding { size } => quote!(.padding(#size)),
        Item::Exact { data, encoding } => quote!(.exact(#data, #encoding)),
        Item::Custom { size, id } => {
            let id = match id {
                Some(id) => quote!(Some(#id)),
                None => quote!(None),
            };
            quote!(.custom(#name, #size, #id))
        }
    };
    match &entry.order {
        Some(order) => quote!(#call .order(#order)),
        None => call,
    }
}

pub(crate) fn generate(input: DeriveInput) -> Result<TokenStream> {
    let args = ObjectArgs::from_derive_input(&input)?;
    let ident = &args.ident;
    if !args.generics.params.is_empty() {
        return Err(Error::custom("`BinaryObject` cannot be derived for generic types")
            .with_span(&args.generics));
    }
    let crate_name = get_crate_name(&args.crate_path);

    let Data::Struct(fields) = &args.data else {
        return Err(Error::custom("`BinaryObject` can only be derived for structs"));
    };

    let mut errors = Error::accumulator();
    let mut calls = Vec::new();
    for field in fields.iter() {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        if let Some(entries) = errors.handle(field_entries(field, &crate_name).map_err(Error::from)) {
            calls.extend(
                entries
                    .iter()
                    .map(|entry| builder_call(entry, field_ident, &crate_name)),
            );
        }
    }
    let endianness = match &args.endianness {
        Some(lit) => errors
            .handle(endianness(&crate_name, lit).map_err(Error::from))
            .flatten()
            .map(|value| quote!(.endianness(#value))),
        None => None,
    };
    errors.finish()?;

    Ok(quote! {
        const _: () = {
            use #crate_name::{Binary, BinaryObject, Handler, ObjectDescriptor};

            impl BinaryObject for #ident {
                fn descriptor() -> ObjectDescriptor<Self> {
                    ObjectDescriptor::<Self>::builder()
                        #endianness
                        #(#calls)*
                        .build()
                }

                #[inline]
                fn instantiate() -> Option<Self> {
                    Some(<Self as ::core::default::Default>::default())
                }
            }

            impl Binary for #ident {
                #[inline]
                fn composite() -> Option<Handler<Self>> {
                    Some(Handler::composite())
                }
            }
        };
    })
}
