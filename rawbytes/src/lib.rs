//! rawbytes converts Rust values to and from raw binary layouts described
//! declaratively, one member at a time.
//!
//! A layout is a list of members: typed fields, zero padding, literal magic
//! bytes, and regions handed to your own code. Each member can override the
//! byte order, the text encoding, null termination or a fixed byte width, and
//! everything it does not override is inherited from the enclosing [`Params`].
//!
//! # Quickstart
//!
//! ```
//! use rawbytes::{convert_from, convert_to_vec, BinaryEnum, BinaryObject, Params};
//!
//! #[derive(BinaryEnum, Clone, Copy, Debug, Default, PartialEq)]
//! #[repr(u8)]
//! enum Genre {
//!     #[default]
//!     Rock = 1,
//!     Jazz = 2,
//! }
//!
//! #[derive(BinaryObject, Debug, Default, PartialEq)]
//! #[binary(endianness = "big")]
//! struct Tag {
//!     #[binary(exact(data = "TAG", encoding = "us-ascii"))]
//!     #[binary(member(size = 8, encoding = "us-ascii", trim_chars = "\0"))]
//!     title: String,
//!     #[binary(member)]
//!     year: u16,
//!     #[binary(padding(size = 1), member)]
//!     genre: Genre,
//! }
//!
//! let tag = Tag { title: "Blue".into(), year: 1959, genre: Genre::Jazz };
//! let bytes = convert_to_vec(&tag, &Params::default()).unwrap();
//! assert_eq!(bytes, b"TAGBlue\0\0\0\0\x07\xA7\0\x02");
//! assert_eq!(convert_from::<Tag>(&bytes, &Params::default()).unwrap(), tag);
//! ```
//!
//! # Strategies
//!
//! Every value is converted by the first strategy its type supports: text,
//! enumeration, composite object, self-describing, arbitrary-width integer,
//! then fixed-width integer. See [`schema`].
//!
//! # Sources and sinks
//!
//! Byte slices and [`std::io`] streams are both supported in each direction.
//! Stream writes are not rolled back when a conversion fails part way through.
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod convert;
pub use convert::*;
pub mod encoding;
pub use encoding::Encoding;
pub mod error;
pub use error::{Error, ErrorKind, Result};
pub mod io;
mod object;
pub use object::*;
mod params;
pub use params::{Endianness, MemberOptions, Params, Sign};
pub mod schema;
pub use schema::{Binary, BinaryEnum, Handler, SelfDescribing, Strategy};
#[cfg(test)]
mod proptest_config;

#[cfg(feature = "derive")]
pub use rawbytes_derive::*;
