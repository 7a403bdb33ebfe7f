//! Conversion strategies and the value dispatcher.
//!
//! Every convertible type implements [`Binary`] by answering one or more of six
//! strategy probes. [`read`] and [`write`] ask the probes in a fixed order (text,
//! enumeration, composite, self-describing, arbitrary-width integer, fixed-width
//! primitive) and hand the value to the first [`Handler`] offered. The chosen
//! handler's result is final: a failing composite does not fall back to a later
//! strategy.
//!
//! # Example
//!
//! A type that owns its binary form:
//!
//! ```
//! # use rawbytes::{schema::SelfDescribing, Binary, Endianness, Handler, Params};
//! #[derive(Debug, PartialEq)]
//! struct Rgb(u8, u8, u8);
//!
//! impl SelfDescribing for Rgb {
//!     const READ_SIZE: usize = 3;
//!
//!     fn read_binary(data: &[u8], _: Endianness) -> Option<(Self, usize)> {
//!         match *data {
//!             [r, g, b, ..] => Some((Rgb(r, g, b), 3)),
//!             _ => None,
//!         }
//!     }
//!
//!     fn write_size(&self) -> usize {
//!         3
//!     }
//!
//!     fn write_binary(&self, dst: &mut [u8], _: Endianness) -> Option<usize> {
//!         dst.get_mut(..3)?.copy_from_slice(&[self.0, self.1, self.2]);
//!         Some(3)
//!     }
//! }
//!
//! impl Binary for Rgb {
//!     fn self_describing() -> Option<Handler<Self>> {
//!         Some(Handler::self_describing())
//!     }
//! }
//!
//! let (color, consumed) = rawbytes::try_convert_from::<Rgb>(&[1, 2, 3, 4], &Params::default()).unwrap();
//! assert_eq!((color, consumed), (Rgb(1, 2, 3), 3));
//! ```
use {
    crate::{
        error::{null_value, unsupported_type, Result},
        io::{Reader, Writer},
        params::Params,
    },
    tracing::trace,
};

mod bigint;
mod describe;
mod enumeration;
mod primitive;
mod text;

pub use {
    bigint::{byte_count, read_arbitrary, write_arbitrary, ArbitraryInt},
    describe::SelfDescribing,
    enumeration::BinaryEnum,
    primitive::{read_integer, write_integer, Primitive},
    text::{read_string, write_string},
};

/// The conversion strategy a [`Handler`] implements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Text,
    Enumeration,
    Composite,
    SelfDescribing,
    ArbitraryInt,
    Primitive,
}

pub type ReadFn<T> = fn(&mut dyn Reader, &Params) -> Result<T>;
pub type WriteFn<T> = fn(&T, &mut dyn Writer, &Params) -> Result<()>;

/// A read/write pair for one strategy.
pub struct Handler<T> {
    strategy: Strategy,
    read: ReadFn<T>,
    write: WriteFn<T>,
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handler<T> {}

impl<T> Handler<T> {
    pub const fn new(strategy: Strategy, read: ReadFn<T>, write: WriteFn<T>) -> Self {
        Self {
            strategy,
            read,
            write,
        }
    }

    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }
}

/// Types the dispatcher can convert.
///
/// Each probe returns the handler for its strategy, or `None` when the type does
/// not support it. Implementations normally answer exactly one probe; the derive
/// macros and the impls in this crate do so.
pub trait Binary: Sized {
    fn text() -> Option<Handler<Self>> {
        None
    }

    fn enumeration() -> Option<Handler<Self>> {
        None
    }

    fn composite() -> Option<Handler<Self>> {
        None
    }

    fn self_describing() -> Option<Handler<Self>> {
        None
    }

    fn arbitrary_int() -> Option<Handler<Self>> {
        None
    }

    fn primitive() -> Option<Handler<Self>> {
        None
    }
}

/// The first handler `T` offers, in dispatch order.
pub fn handler<T: Binary>() -> Option<Handler<T>> {
    T::text()
        .or_else(T::enumeration)
        .or_else(T::composite)
        .or_else(T::self_describing)
        .or_else(T::arbitrary_int)
        .or_else(T::primitive)
}

/// Read a `T` from `reader`.
pub fn read<T: Binary>(reader: &mut dyn Reader, params: &Params) -> Result<T> {
    let params = params.retarget::<T>();
    let Some(handler) = handler::<T>() else {
        return Err(unsupported_type(params.target_type()));
    };
    trace!(
        type_name = params.target_type(),
        strategy = ?handler.strategy,
        position = reader.position(),
        "read"
    );
    (handler.read)(reader, &params)
}

/// Write `value` to `writer`.
pub fn write<T: Binary>(value: &T, writer: &mut dyn Writer, params: &Params) -> Result<()> {
    let params = params.retarget::<T>();
    let Some(handler) = handler::<T>() else {
        return Err(unsupported_type(params.target_type()));
    };
    trace!(
        type_name = params.target_type(),
        strategy = ?handler.strategy,
        written = writer.written(),
        "write"
    );
    (handler.write)(value, writer, &params)
}

fn read_nullable<T: Binary>(reader: &mut dyn Reader, params: &Params) -> Result<Option<T>> {
    read::<T>(reader, params).map(Some)
}

fn write_nullable<T: Binary>(value: &Option<T>, writer: &mut dyn Writer, params: &Params) -> Result<()> {
    match value {
        Some(value) => write(value, writer, params),
        None => Err(null_value(params.target_type())),
    }
}

impl<T: Binary> Handler<Option<T>> {
    fn nullable(inner: Handler<T>) -> Self {
        Handler::new(inner.strategy, read_nullable::<T>, write_nullable::<T>)
    }
}

/// `None` has no binary form: writing it fails. Reads always produce `Some`.
impl<T: Binary> Binary for Option<T> {
    fn text() -> Option<Handler<Self>> {
        T::text().map(Handler::nullable)
    }

    fn enumeration() -> Option<Handler<Self>> {
        T::enumeration().map(Handler::nullable)
    }

    fn composite() -> Option<Handler<Self>> {
        T::composite().map(Handler::nullable)
    }

    fn self_describing() -> Option<Handler<Self>> {
        T::self_describing().map(Handler::nullable)
    }

    fn arbitrary_int() -> Option<Handler<Self>> {
        T::arbitrary_int().map(Handler::nullable)
    }

    fn primitive() -> Option<Handler<Self>> {
        T::primitive().map(Handler::nullable)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            error::ErrorKind,
            io::{SliceReader, SliceWriter},
            params::Endianness,
        },
        malachite::Integer,
    };

    #[derive(Debug)]
    struct Opaque;

    impl Binary for Opaque {}

    #[test]
    fn dispatch_order() {
        assert_eq!(handler::<String>().map(|h| h.strategy()), Some(Strategy::Text));
        assert_eq!(handler::<u16>().map(|h| h.strategy()), Some(Strategy::Primitive));
        assert_eq!(
            handler::<Integer>().map(|h| h.strategy()),
            Some(Strategy::ArbitraryInt)
        );
        assert_eq!(
            handler::<Option<i64>>().map(|h| h.strategy()),
            Some(Strategy::Primitive)
        );
        assert!(handler::<Opaque>().is_none());
    }

    #[test]
    fn unsupported_type_names_target() {
        let mut reader = SliceReader::new(&[0; 4]);
        let err = read::<Opaque>(&mut reader, &Params::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert!(err.to_string().contains("Opaque"));
    }

    #[test]
    fn none_is_never_written() {
        let mut buf = [0u8; 4];
        let mut writer = SliceWriter::new(&mut buf);
        let err = write(&None::<u32>, &mut writer, &Params::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(writer.written(), 0);

        write(&Some(0x0102_0304u32), &mut writer, &Params::default().with_endianness(Endianness::Big))
            .unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn option_reads_some() {
        let mut reader = SliceReader::new(&[5, 0]);
        let params = Params::default().with_endianness(Endianness::Little);
        assert_eq!(read::<Option<i16>>(&mut reader, &params).unwrap(), Some(5));
        assert_eq!(reader.position(), 2);
    }
}
