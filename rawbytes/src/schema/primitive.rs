//! Fixed-width integers.
use {
    super::{Binary, Handler, Strategy},
    crate::{
        error::Result,
        io::{read_size_limit, write_size_limit, Reader, Writer},
        params::{Endianness, Params},
    },
};

/// Integers with a fixed byte width.
pub trait Primitive: Copy + Sized {
    const WIDTH: usize;
    type Bytes: AsRef<[u8]>;

    /// Decode from exactly [`Self::WIDTH`] bytes; `None` for any other length.
    fn decode(raw: &[u8], endianness: Endianness) -> Option<Self>;

    fn encode(self, endianness: Endianness) -> Self::Bytes;
}

macro_rules! impl_primitive {
    ($($type:ty),* $(,)?) => {$(
        impl Primitive for $type {
            const WIDTH: usize = size_of::<$type>();
            type Bytes = [u8; size_of::<$type>()];

            #[inline]
            fn decode(raw: &[u8], endianness: Endianness) -> Option<Self> {
                let raw: Self::Bytes = raw.try_into().ok()?;
                Some(if endianness.is_little() {
                    <$type>::from_le_bytes(raw)
                } else {
                    <$type>::from_be_bytes(raw)
                })
            }

            #[inline]
            fn encode(self, endianness: Endianness) -> Self::Bytes {
                if endianness.is_little() {
                    self.to_le_bytes()
                } else {
                    self.to_be_bytes()
                }
            }
        }

        impl Binary for $type {
            fn primitive() -> Option<Handler<Self>> {
                Some(Handler::primitive())
            }
        }
    )*};
}

impl_primitive!(i8, u8, i16, u16, i32, u32, i64, u64);

/// Read a `T` from the start of `bytes`.
///
/// ```
/// # use rawbytes::{schema::read_integer, Endianness};
/// assert_eq!(read_integer::<u16>(&[1, 2], Endianness::Big).unwrap(), 0x0102);
/// assert!(read_integer::<u32>(&[1, 2, 3], Endianness::Big).is_err());
/// ```
pub fn read_integer<T: Primitive>(bytes: &[u8], endianness: Endianness) -> Result<T> {
    bytes
        .get(..T::WIDTH)
        .and_then(|raw| T::decode(raw, endianness))
        .ok_or_else(|| read_size_limit(T::WIDTH).into())
}

/// Write `value` to the start of `dst`, returning the number of bytes written.
///
/// Nothing is written when `dst` is too small.
pub fn write_integer<T: Primitive>(value: T, dst: &mut [u8], endianness: Endianness) -> Result<usize> {
    let Some(dst) = dst.get_mut(..T::WIDTH) else {
        return Err(write_size_limit(T::WIDTH).into());
    };
    dst.copy_from_slice(value.encode(endianness).as_ref());
    Ok(T::WIDTH)
}

fn read_primitive<T: Primitive>(reader: &mut dyn Reader, params: &Params) -> Result<T> {
    let raw = reader.take(T::WIDTH)?;
    read_integer(&raw, params.byte_order())
}

fn write_primitive<T: Primitive>(value: &T, writer: &mut dyn Writer, params: &Params) -> Result<()> {
    writer.write(value.encode(params.byte_order()).as_ref())?;
    Ok(())
}

impl<T: Primitive> Handler<T> {
    /// Fixed-width integer strategy.
    pub fn primitive() -> Self {
        Handler::new(Strategy::Primitive, read_primitive::<T>, write_primitive::<T>)
    }
}
