//! Public entry points.
//!
//! Every conversion has a strict form that returns [`Result`] and a `try_` form
//! that returns `None` on failure. The `try_` forms log the swallowed error at
//! `debug` level.
use {
    crate::{
        error::Result,
        io::{Reader, SizeCounter, SliceReader, SliceWriter, StreamReader, StreamWriter, Writer},
        params::Params,
        schema::{self, Binary},
    },
    std::io::{Read, Write},
    tracing::debug,
};

fn read_counted<T: Binary>(reader: &mut dyn Reader, params: &Params) -> Result<(T, usize)> {
    let value = schema::read(reader, params)?;
    Ok((value, reader.position()))
}

fn swallow<T>(result: Result<T>, operation: &'static str) -> Option<T> {
    result
        .map_err(|err| debug!(operation, %err, kind = ?err.kind(), "conversion failed"))
        .ok()
}

/// Read a `T` from the front of `bytes`.
///
/// ```
/// # use rawbytes::{convert_from, Endianness, Params};
/// let params = Params::default().with_endianness(Endianness::Big);
/// assert_eq!(convert_from::<u16>(&[1, 2, 3], &params).unwrap(), 0x0102);
/// ```
pub fn convert_from<T: Binary>(bytes: &[u8], params: &Params) -> Result<T> {
    schema::read(&mut SliceReader::new(bytes), params)
}

/// Read a `T` from the front of `bytes`, returning it with the number of bytes
/// consumed.
pub fn try_convert_from<T: Binary>(bytes: &[u8], params: &Params) -> Option<(T, usize)> {
    swallow(
        read_counted(&mut SliceReader::new(bytes), params),
        "convert_from",
    )
}

fn read_drawn<T: Binary, R: Read>(source: R, params: &Params) -> Result<(T, usize)> {
    let mut reader = StreamReader::new(source);
    let value = schema::read(&mut reader, params)?;
    Ok((value, reader.drawn()))
}

/// Read a `T` from `source`.
///
/// Only the bytes the conversion needs are consumed from `source`, except that
/// a self-describing value is shown up to its `READ_SIZE` bytes. When such a
/// value ends the conversion, the bytes it was shown past its own end are
/// consumed too. Wrap the source in a [`StreamReader`] and call
/// [`schema::read`] directly to keep them for a following read.
pub fn convert_from_reader<T: Binary, R: Read>(source: R, params: &Params) -> Result<T> {
    schema::read(&mut StreamReader::new(source), params)
}

/// Read a `T` from `source`, returning it with the number of bytes consumed.
///
/// The count is how far `source` advanced, see [`convert_from_reader`].
pub fn try_convert_from_reader<T: Binary, R: Read>(source: R, params: &Params) -> Option<(T, usize)> {
    swallow(read_drawn(source, params), "convert_from_reader")
}

/// Write `value` into the front of `dst`, returning the number of bytes written.
///
/// Output that does not fit fails. Bytes already written before the failure are
/// left in `dst`.
pub fn convert_to<T: Binary>(value: &T, dst: &mut [u8], params: &Params) -> Result<usize> {
    let mut writer = SliceWriter::new(dst);
    schema::write(value, &mut writer, params)?;
    Ok(writer.written())
}

pub fn try_convert_to<T: Binary>(value: &T, dst: &mut [u8], params: &Params) -> Option<usize> {
    swallow(convert_to(value, dst, params), "convert_to")
}

/// Write `value` to `sink` and flush it, returning the number of bytes written.
///
/// A failure part way through leaves the bytes already written in `sink`.
pub fn convert_to_writer<T: Binary, W: Write>(value: &T, sink: W, params: &Params) -> Result<usize> {
    let mut writer = StreamWriter::new(sink);
    schema::write(value, &mut writer, params)?;
    writer.finish()?;
    Ok(writer.written())
}

pub fn try_convert_to_writer<T: Binary, W: Write>(value: &T, sink: W, params: &Params) -> Option<usize> {
    swallow(convert_to_writer(value, sink, params), "convert_to_writer")
}

/// Write `value` into a new vector.
///
/// ```
/// # use rawbytes::{convert_to_vec, Params};
/// let params = Params::default().with_null_terminated(true);
/// assert_eq!(convert_to_vec(&"hi".to_owned(), &params).unwrap(), b"hi\0");
/// ```
pub fn convert_to_vec<T: Binary>(value: &T, params: &Params) -> Result<Vec<u8>> {
    let mut vec = Vec::<u8>::new();
    schema::write(value, &mut vec, params)?;
    Ok(vec)
}

/// Number of bytes `value` converts to, without producing them.
pub fn binary_size<T: Binary>(value: &T, params: &Params) -> Result<usize> {
    let mut counter = SizeCounter::new();
    schema::write(value, &mut counter, params)?;
    Ok(counter.written())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            error::ErrorKind,
            params::Endianness,
            proptest_config::proptest_cfg,
            schema::{Handler, SelfDescribing},
        },
        malachite::Integer,
        proptest::prelude::*,
        std::io::Cursor,
    };

    #[test]
    fn strict_and_lenient_agree() {
        let params = Params::default().with_endianness(Endianness::Little);
        assert_eq!(try_convert_from::<u32>(&[1, 0, 0, 0, 9], &params), Some((1, 4)));
        assert_eq!(try_convert_from::<u32>(&[1, 0, 0], &params), None);
        assert_eq!(
            convert_from::<u32>(&[1, 0, 0], &params).unwrap_err().kind(),
            ErrorKind::Truncated
        );

        let mut dst = [0u8; 3];
        assert_eq!(try_convert_to(&7u16, &mut dst, &params), Some(2));
        assert_eq!(dst, [7, 0, 0]);
        assert_eq!(try_convert_to(&7u32, &mut dst, &params), None);
        assert_eq!(
            convert_to(&7u32, &mut dst, &params).unwrap_err().kind(),
            ErrorKind::Oversize
        );
    }

    #[test]
    fn stream_reads_stop_at_value_end() {
        let mut source = Cursor::new(vec![0, 1, 0, 0xAA]);
        let params = Params::default().with_endianness(Endianness::Big);
        assert_eq!(convert_from_reader::<u16, _>(&mut source, &params).unwrap(), 1);
        assert_eq!(source.position(), 2);
        assert_eq!(try_convert_from_reader::<u8, _>(&mut source, &params), Some((0, 1)));
        assert_eq!(try_convert_from_reader::<u16, _>(&mut source, &params), None);
    }

    /// One length byte, then that many bytes; shown four bytes at a time.
    #[derive(Debug, PartialEq)]
    struct Short(Vec<u8>);

    impl SelfDescribing for Short {
        const READ_SIZE: usize = 4;

        fn read_binary(data: &[u8], _: Endianness) -> Option<(Self, usize)> {
            let (&len, rest) = data.split_first()?;
            Some((Short(rest.get(..len as usize)?.to_vec()), len as usize + 1))
        }

        fn write_size(&self) -> usize {
            self.0.len() + 1
        }

        fn write_binary(&self, _: &mut [u8], _: Endianness) -> Option<usize> {
            None
        }
    }

    impl Binary for Short {
        fn self_describing() -> Option<Handler<Self>> {
            Some(Handler::self_describing())
        }
    }

    #[test]
    fn stream_count_matches_source_position() {
        let params = Params::default();
        let mut source = Cursor::new(vec![2, b'a', b'b', 0x11, 0x22, 0x33]);
        let (value, consumed) = try_convert_from_reader::<Short, _>(&mut source, &params).unwrap();
        assert_eq!(value, Short(b"ab".to_vec()));
        assert_eq!(consumed as u64, source.position());
        assert_eq!(consumed, Short::READ_SIZE);
        assert_eq!(convert_from_reader::<u8, _>(&mut source, &params).unwrap(), 0x22);

        // A buffer is never over-read.
        assert_eq!(
            try_convert_from::<Short>(&[2, b'a', b'b', 0x11], &params),
            Some((Short(b"ab".to_vec()), 3))
        );
    }

    #[test]
    fn stream_writes_append() {
        let mut sink = Vec::<u8>::new();
        let params = Params::default().with_endianness(Endianness::Big);
        assert_eq!(convert_to_writer(&0x0102u16, &mut sink, &params).unwrap(), 2);
        assert_eq!(try_convert_to_writer(&Integer::from(-1), &mut sink, &params), Some(1));
        assert_eq!(sink, [1, 2, 0xFF]);
    }

    proptest! {
        #![proptest_config(proptest_cfg())]

        #[test]
        fn size_matches_output(text in "\\PC{0,32}", terminated in any::<bool>()) {
            let params = Params::default().with_null_terminated(terminated);
            let bytes = convert_to_vec(&text, &params).unwrap();
            prop_assert_eq!(binary_size(&text, &params).unwrap(), bytes.len());
            let mut dst = vec![0u8; bytes.len()];
            prop_assert_eq!(convert_to(&text, &mut dst, &params).unwrap(), bytes.len());
            prop_assert_eq!(dst, bytes);
        }
    }
}
