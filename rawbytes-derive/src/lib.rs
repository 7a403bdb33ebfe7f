//! Derive macros for `BinaryObject` and `BinaryEnum`.
//!
//! Refer to the [`rawbytes`](https://docs.rs/rawbytes) crate for examples.
use {
    proc_macro::TokenStream,
    syn::{parse_macro_input, DeriveInput},
};

mod binary_enum;
mod binary_object;
mod common;

/// Implement `BinaryObject` and `Binary` for a struct with named fields.
///
/// Only fields carrying `#[binary(..)]` entries take part in the binary form,
/// and the struct must implement `Default`. Container options:
///
/// - `endianness = "little" | "big" | "system" | "default"`
/// - `crate = "path::to::rawbytes"`
///
/// Field entries, converted in declaration order unless `order` says
/// otherwise:
///
/// - `member(size, endianness, sign, encoding, null_terminated,
///   trim_large_data, trim_chars, order)`: the field itself.
/// - `padding(size, order)`: zero bytes.
/// - `exact(data, encoding, order)`: a literal that must match on read.
/// - `custom(size, id, order)`: a region handed to the struct's
///   `BinaryCustom` impl.
#[proc_macro_derive(BinaryObject, attributes(binary))]
pub fn derive_binary_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match binary_object::generate(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.write_errors().into(),
    }
}

/// Implement `BinaryEnum` and `Binary` for a field-less enum with an integer
/// `#[repr]`.
#[proc_macro_derive(BinaryEnum, attributes(binary))]
pub fn derive_binary_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match binary_enum::generate(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.write_errors().into(),
    }
}
