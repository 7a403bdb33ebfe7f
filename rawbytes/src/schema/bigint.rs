//! Arbitrary-width two's-complement integers.
//!
//! Reads consume the whole input available to them, so an arbitrary-width value
//! is normally the last member of an object or confined by a sized member. Writes
//! use the fewest bytes that represent the value, or exactly the width of the
//! enclosing sized member, sign-extending as needed.
use {
    super::{Binary, Handler, Strategy},
    crate::{
        error::{integer_overflow, Result},
        io::{read_size_limit, Reader, Writer},
        params::{Endianness, Params},
    },
    malachite::{Integer, Natural},
};

/// Types convertible through [`Integer`].
pub trait ArbitraryInt: Sized {
    /// The type's own signedness, if it has one.
    const SIGNED: Option<bool>;

    fn to_integer(&self) -> Integer;

    /// `None` if `value` is out of range for the type.
    fn from_integer(value: Integer) -> Option<Self>;
}

impl ArbitraryInt for Integer {
    const SIGNED: Option<bool> = Some(true);

    fn to_integer(&self) -> Integer {
        self.clone()
    }

    fn from_integer(value: Integer) -> Option<Self> {
        Some(value)
    }
}

impl ArbitraryInt for Natural {
    const SIGNED: Option<bool> = Some(false);

    fn to_integer(&self) -> Integer {
        Integer::from(self.clone())
    }

    fn from_integer(value: Integer) -> Option<Self> {
        Natural::try_from(value).ok()
    }
}

macro_rules! impl_wide {
    ($($type:ty => $signed:expr),* $(,)?) => {$(
        impl ArbitraryInt for $type {
            const SIGNED: Option<bool> = Some($signed);

            fn to_integer(&self) -> Integer {
                Integer::from(*self)
            }

            fn from_integer(value: Integer) -> Option<Self> {
                <$type>::try_from(&value).ok()
            }
        }
    )*};
}

impl_wide!(i128 => true, u128 => false);

macro_rules! impl_binary {
    ($($type:ty),*) => {$(
        impl Binary for $type {
            fn arbitrary_int() -> Option<Handler<Self>> {
                Some(Handler::arbitrary_int())
            }
        }
    )*};
}

impl_binary!(Integer, Natural, i128, u128);

/// `256^len`.
fn radix_power(len: usize) -> Integer {
    let base = Integer::from(256u32);
    let mut power = Integer::from(1u32);
    for _ in 0..len {
        power *= &base;
    }
    power
}

/// Interpret `bytes` as a two's-complement (`signed`) or plain unsigned integer.
///
/// ```
/// # use rawbytes::{schema::read_arbitrary, Endianness};
/// # use malachite::Integer;
/// let bytes = [0, 0, 2, 0, 0, 0];
/// assert_eq!(read_arbitrary(&bytes, Endianness::Little, true).unwrap(), Integer::from(0x20000));
/// assert_eq!(read_arbitrary(&bytes, Endianness::Big, true).unwrap(), Integer::from(0x2000000));
/// assert_eq!(read_arbitrary(&[0xFF; 4], Endianness::Big, true).unwrap(), Integer::from(-1));
/// assert_eq!(read_arbitrary(&[0xFF; 4], Endianness::Big, false).unwrap(), Integer::from(u32::MAX));
/// ```
pub fn read_arbitrary(bytes: &[u8], endianness: Endianness, signed: bool) -> Result<Integer> {
    if bytes.is_empty() {
        return Err(read_size_limit(1).into());
    }

    let base = Integer::from(256u32);
    let mut value = Integer::from(0u32);
    let mut multiplier = Integer::from(1u32);
    let mut push = |byte: u8| {
        value += Integer::from(byte) * &multiplier;
        multiplier *= &base;
    };
    if endianness.is_little() {
        bytes.iter().copied().for_each(&mut push);
    } else {
        bytes.iter().rev().copied().for_each(&mut push);
    }

    let most_significant = if endianness.is_little() {
        bytes[bytes.len() - 1]
    } else {
        bytes[0]
    };
    if signed && most_significant & 0x80 != 0 {
        value -= multiplier;
    }
    Ok(value)
}

/// Fewest bytes that represent `value`; at least one.
///
/// Fails for a negative `value` when `signed` is false.
pub fn byte_count(value: &Integer, signed: bool) -> Result<usize> {
    let zero = Integer::from(0u32);
    if !signed && value < &zero {
        return Err(integer_overflow(0));
    }

    let mut width = 1;
    loop {
        let fits = if signed {
            let half = Integer::from(128u32) * radix_power(width - 1);
            value < &half && value >= &-half
        } else {
            value < &radix_power(width)
        };
        if fits {
            return Ok(width);
        }
        width += 1;
    }
}

/// Encode `value`, using exactly `width` bytes when given.
///
/// ```
/// # use rawbytes::{schema::write_arbitrary, Endianness};
/// # use malachite::Integer;
/// let value = Integer::from(256);
/// assert_eq!(write_arbitrary(&value, Endianness::Big, false, None).unwrap(), [1, 0]);
/// assert_eq!(write_arbitrary(&value, Endianness::Big, false, Some(3)).unwrap(), [0, 1, 0]);
/// assert_eq!(write_arbitrary(&Integer::from(-2), Endianness::Little, true, Some(3)).unwrap(), [0xFE, 0xFF, 0xFF]);
/// assert!(write_arbitrary(&value, Endianness::Big, false, Some(1)).is_err());
/// ```
pub fn write_arbitrary(
    value: &Integer,
    endianness: Endianness,
    signed: bool,
    width: Option<usize>,
) -> Result<Vec<u8>> {
    let minimal = byte_count(value, signed)?;
    let width = match width {
        Some(width) if width < minimal => return Err(integer_overflow(width)),
        Some(width) => width,
        None => minimal,
    };

    let zero = Integer::from(0u32);
    let base = Integer::from(256u32);
    let mut remaining = if value < &zero {
        value + radix_power(width)
    } else {
        value.clone()
    };
    let mut bytes = Vec::with_capacity(width);
    for _ in 0..width {
        let digit = &remaining % &base;
        bytes.push(u8::try_from(&digit).map_err(|_| integer_overflow(width))?);
        remaining /= &base;
    }
    if !endianness.is_little() {
        bytes.reverse();
    }
    Ok(bytes)
}

fn read_wide<T: ArbitraryInt>(reader: &mut dyn Reader, params: &Params) -> Result<T> {
    let signed = params.sign().is_signed(T::SIGNED);
    let bytes = reader.read_to_end()?;
    let value = read_arbitrary(&bytes, params.byte_order(), signed)?;
    T::from_integer(value).ok_or_else(|| integer_overflow(bytes.len()))
}

fn write_wide<T: ArbitraryInt>(value: &T, writer: &mut dyn Writer, params: &Params) -> Result<()> {
    let signed = params.sign().is_signed(T::SIGNED);
    let bytes = write_arbitrary(
        &value.to_integer(),
        params.byte_order(),
        signed,
        params.fixed_width(),
    )?;
    writer.write(&bytes)?;
    Ok(())
}

impl<T: ArbitraryInt> Handler<T> {
    /// Arbitrary-width integer strategy.
    pub fn arbitrary_int() -> Self {
        Handler::new(Strategy::ArbitraryInt, read_wide::<T>, write_wide::<T>)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::proptest_config::proptest_cfg, proptest::prelude::*};

    #[test]
    fn minimal_widths() {
        assert_eq!(byte_count(&Integer::from(0), true).unwrap(), 1);
        assert_eq!(byte_count(&Integer::from(127), true).unwrap(), 1);
        assert_eq!(byte_count(&Integer::from(128), true).unwrap(), 2);
        assert_eq!(byte_count(&Integer::from(128), false).unwrap(), 1);
        assert_eq!(byte_count(&Integer::from(-128), true).unwrap(), 1);
        assert_eq!(byte_count(&Integer::from(-129), true).unwrap(), 2);
        assert_eq!(byte_count(&Integer::from(0x100), false).unwrap(), 2);
        assert!(byte_count(&Integer::from(-1), false).is_err());
    }

    #[test]
    fn empty_input_is_truncated() {
        assert!(read_arbitrary(&[], Endianness::Little, true).is_err());
    }

    #[test]
    fn natural_rejects_negative_reads() {
        assert_eq!(Natural::from_integer(Integer::from(-1)), None);
        assert_eq!(u128::from_integer(Integer::from(-1)), None);
        assert_eq!(i128::from_integer(Integer::from(-1)), Some(-1));
    }

    proptest! {
        #![proptest_config(proptest_cfg())]

        #[test]
        fn signed_round_trip(value in any::<i128>(), little in any::<bool>(), pad in 0usize..4) {
            let endianness = if little { Endianness::Little } else { Endianness::Big };
            let value = Integer::from(value);
            let width = byte_count(&value, true).unwrap() + pad;
            let bytes = write_arbitrary(&value, endianness, true, Some(width)).unwrap();
            prop_assert_eq!(bytes.len(), width);
            prop_assert_eq!(read_arbitrary(&bytes, endianness, true).unwrap(), value);
        }

        #[test]
        fn unsigned_round_trip(value in any::<u128>(), little in any::<bool>()) {
            let endianness = if little { Endianness::Little } else { Endianness::Big };
            let value = Integer::from(value);
            let bytes = write_arbitrary(&value, endianness, false, None).unwrap();
            prop_assert!(bytes.len() <= 16);
            prop_assert_eq!(read_arbitrary(&bytes, endianness, false).unwrap(), value);
        }

        #[test]
        fn matches_fixed_width_encoding(value in any::<i64>()) {
            let bytes = write_arbitrary(&Integer::from(value), Endianness::Little, true, Some(8)).unwrap();
            prop_assert_eq!(bytes, value.to_le_bytes().to_vec());
        }
    }
}
