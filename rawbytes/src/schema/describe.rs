//! Types that encode and decode themselves.
use {
    super::{Handler, Strategy},
    crate::{
        error::{self_describing, Result},
        io::{Reader, Writer},
        params::{Endianness, Params},
    },
    tracing::trace,
};

/// A type that owns its binary form.
///
/// `read_binary` is shown at most [`Self::READ_SIZE`] upcoming bytes, fewer when
/// the input ends first. Only the bytes it reports as used are consumed; a
/// stream still pulls the bytes shown from its source, see
/// [`crate::convert_from_reader`].
pub trait SelfDescribing: Sized {
    /// Upper bound on the bytes shown to [`SelfDescribing::read_binary`].
    const READ_SIZE: usize;

    /// Decode from the front of `data`, returning the value and the bytes used.
    fn read_binary(data: &[u8], endianness: Endianness) -> Option<(Self, usize)>;

    /// Bytes needed by [`SelfDescribing::write_binary`].
    fn write_size(&self) -> usize;

    /// Encode into `dst`, returning the bytes written.
    fn write_binary(&self, dst: &mut [u8], endianness: Endianness) -> Option<usize>;
}

fn read_described<T: SelfDescribing>(reader: &mut dyn Reader, params: &Params) -> Result<T> {
    let data = reader.peek(T::READ_SIZE)?;
    let Some((value, used)) = T::read_binary(data, params.byte_order()) else {
        return Err(self_describing(params.target_type()));
    };
    if used > data.len() {
        return Err(self_describing(params.target_type()));
    }
    trace!(used, "self-describing read");
    reader.skip(used)?;
    Ok(value)
}

fn write_described<T: SelfDescribing>(
    value: &T,
    writer: &mut dyn Writer,
    params: &Params,
) -> Result<()> {
    let mut scratch = vec![0; value.write_size()];
    let written = value
        .write_binary(&mut scratch, params.byte_order())
        .filter(|&written| written <= scratch.len())
        .ok_or_else(|| self_describing(params.target_type()))?;
    writer.write(&scratch[..written])?;
    Ok(())
}

impl<T: SelfDescribing> Handler<T> {
    /// Self-describing strategy.
    pub fn self_describing() -> Self {
        Handler::new(Strategy::SelfDescribing, read_described::<T>, write_described::<T>)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            error::ErrorKind,
            io::{SliceReader, StreamReader},
            schema::{read, write, Binary},
        },
    };

    /// Length-prefixed byte string.
    #[derive(Debug, PartialEq)]
    struct Blob(Vec<u8>);

    impl SelfDescribing for Blob {
        const READ_SIZE: usize = 16;

        fn read_binary(data: &[u8], _: Endianness) -> Option<(Self, usize)> {
            let (&len, rest) = data.split_first()?;
            let body = rest.get(..len as usize)?;
            Some((Blob(body.to_vec()), len as usize + 1))
        }

        fn write_size(&self) -> usize {
            self.0.len() + 1
        }

        fn write_binary(&self, dst: &mut [u8], _: Endianness) -> Option<usize> {
            let len = u8::try_from(self.0.len()).ok()?;
            let (head, rest) = dst.split_first_mut()?;
            *head = len;
            rest.get_mut(..self.0.len())?.copy_from_slice(&self.0);
            Some(self.0.len() + 1)
        }
    }

    impl Binary for Blob {
        fn self_describing() -> Option<Handler<Self>> {
            Some(Handler::self_describing())
        }
    }

    #[test]
    fn consumes_only_what_it_reports() {
        let bytes = [3, b'a', b'b', b'c', 0xEE, 0xEE];
        let mut reader = SliceReader::new(&bytes);
        assert_eq!(read::<Blob>(&mut reader, &Params::default()).unwrap(), Blob(b"abc".to_vec()));
        assert_eq!(reader.position(), 4);

        let mut stream = StreamReader::new(&bytes[..]);
        assert_eq!(read::<Blob>(&mut stream, &Params::default()).unwrap(), Blob(b"abc".to_vec()));
        assert_eq!(stream.position(), 4);
        assert_eq!(stream.read_to_end().unwrap(), [0xEE, 0xEE]);
    }

    #[test]
    fn rejection_is_reported() {
        let mut reader = SliceReader::new(&[9, 1, 2]);
        let err = read::<Blob>(&mut reader, &Params::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(reader.position(), 0);

        let mut out = Vec::<u8>::new();
        let err = write(&Blob(vec![0; 300]), &mut out, &Params::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert!(out.is_empty());
    }
}
