//! Enumerations stored as their underlying integer.
use {
    super::{read, write, Binary, Handler, Primitive, Strategy},
    crate::{
        error::{invalid_enum_value, Result},
        io::{Reader, Writer},
        params::Params,
    },
    core::fmt::Debug,
};

/// A fieldless enum with an integer representation.
///
/// Usually derived with `#[derive(BinaryEnum)]`, which also implements
/// [`Binary`]. The representation is a fixed-width integer, at most 64 bits.
pub trait BinaryEnum: Sized {
    type Repr: Primitive + Binary + Debug;

    /// The variant whose value is `repr`, if any.
    fn from_repr(repr: Self::Repr) -> Option<Self>;

    fn to_repr(&self) -> Self::Repr;
}

fn read_enum<T: BinaryEnum>(reader: &mut dyn Reader, params: &Params) -> Result<T> {
    let repr = read::<T::Repr>(reader, params)?;
    T::from_repr(repr).ok_or_else(|| invalid_enum_value(params.target_type(), format!("{repr:?}")))
}

fn write_enum<T: BinaryEnum>(value: &T, writer: &mut dyn Writer, params: &Params) -> Result<()> {
    write(&value.to_repr(), writer, params)
}

impl<T: BinaryEnum> Handler<T> {
    /// Enumeration strategy: the underlying value is converted with its own
    /// strategy under the same parameters.
    pub fn enumeration() -> Self {
        Handler::new(Strategy::Enumeration, read_enum::<T>, write_enum::<T>)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{error::ErrorKind, io::SliceReader, params::Endianness},
    };

    #[derive(Debug, PartialEq)]
    enum Shape {
        Circle,
        Square,
    }

    impl BinaryEnum for Shape {
        type Repr = i16;

        fn from_repr(repr: i16) -> Option<Self> {
            match repr {
                1 => Some(Shape::Circle),
                5 => Some(Shape::Square),
                _ => None,
            }
        }

        fn to_repr(&self) -> i16 {
            match self {
                Shape::Circle => 1,
                Shape::Square => 5,
            }
        }
    }

    impl Binary for Shape {
        fn enumeration() -> Option<Handler<Self>> {
            Some(Handler::enumeration())
        }
    }

    #[test]
    fn reads_underlying_value() {
        let params = Params::default().with_endianness(Endianness::Little);
        let mut reader = SliceReader::new(&[5, 0]);
        assert_eq!(read::<Shape>(&mut reader, &params).unwrap(), Shape::Square);

        let mut out = Vec::<u8>::new();
        write(&Shape::Circle, &mut out, &params.with_endianness(Endianness::Big)).unwrap();
        assert_eq!(out, [0, 1]);
    }

    #[test]
    fn unknown_value_fails() {
        let mut reader = SliceReader::new(&[9, 0]);
        let err = read::<Shape>(&mut reader, &Params::default().with_endianness(Endianness::Little))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert!(err.to_string().contains('9'));
    }
}
