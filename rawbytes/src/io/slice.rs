use {
    super::*,
    core::mem,
};

/// Get a slice of `len` bytes for reading, advancing the input by `len` bytes, or
/// returning `None` if the input does not have at least `len` bytes remaining.
#[inline(always)]
fn advance_slice_checked<'a, T>(input: &mut &'a [T], len: usize) -> Option<&'a [T]> {
    let (dst, rest) = input.split_at_checked(len)?;
    *input = rest;
    Some(dst)
}

/// Get a slice of `len` bytes for writing, advancing the output by `len` bytes, or
/// returning `None` if the output does not have at least `len` bytes remaining.
#[inline(always)]
fn advance_slice_mut_checked<'a, T>(input: &mut &'a mut [T], len: usize) -> Option<&'a mut [T]> {
    let (dst, rest) = mem::take(input).split_at_mut_checked(len)?;
    *input = rest;
    Some(dst)
}

/// [`Reader`] over a borrowed, finite byte buffer.
///
/// ```
/// # use rawbytes::io::{Reader, SliceReader};
/// let mut reader = SliceReader::new(&[1, 2, 3, 4]);
/// assert_eq!(&*reader.take(2).unwrap(), &[1, 2]);
/// assert_eq!(reader.position(), 2);
/// assert_eq!(reader.remaining(), &[3, 4]);
/// ```
#[derive(Clone, Debug)]
pub struct SliceReader<'a> {
    buf: &'a [u8],
    position: usize,
}

impl<'a> SliceReader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// Bytes not yet consumed.
    pub const fn remaining(&self) -> &'a [u8] {
        self.buf
    }

    #[inline]
    fn advance(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        let Some(chunk) = advance_slice_checked(&mut self.buf, len) else {
            return Err(read_size_limit(len));
        };
        self.position += len;
        Ok(chunk)
    }
}

impl Reader for SliceReader<'_> {
    #[inline]
    fn read_exact(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        let chunk = self.advance(buf.len())?;
        buf.copy_from_slice(chunk);
        Ok(())
    }

    #[inline]
    fn take(&mut self, len: usize) -> ReadResult<Cow<'_, [u8]>> {
        self.advance(len).map(Cow::Borrowed)
    }

    #[inline]
    fn peek(&mut self, len: usize) -> ReadResult<&[u8]> {
        Ok(&self.buf[..len.min(self.buf.len())])
    }

    #[inline]
    fn skip(&mut self, len: usize) -> ReadResult<()> {
        self.advance(len).map(drop)
    }

    fn read_to_end(&mut self) -> ReadResult<Vec<u8>> {
        let rest = self.advance(self.buf.len())?;
        Ok(rest.to_vec())
    }

    fn read_terminated(&mut self, terminator: &[u8]) -> ReadResult<(Vec<u8>, usize)> {
        let (data, consumed) = match find_terminator(self.buf, terminator) {
            Some(end) => (&self.buf[..end], end + terminator.len()),
            None => (self.buf, self.buf.len()),
        };
        let data = data.to_vec();
        self.advance(consumed)?;
        Ok((data, consumed))
    }

    #[inline(always)]
    fn position(&self) -> usize {
        self.position
    }
}

/// Bounded [`Writer`] over a caller-provided buffer.
///
/// Writes that do not fit are rejected whole; nothing is copied on failure.
#[derive(Debug)]
pub struct SliceWriter<'a> {
    buf: &'a mut [u8],
    written: usize,
}

impl<'a> SliceWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, written: 0 }
    }
}

impl Writer for SliceWriter<'_> {
    #[inline]
    fn write(&mut self, src: &[u8]) -> WriteResult<()> {
        let Some(dst) = advance_slice_mut_checked(&mut self.buf, src.len()) else {
            return Err(write_size_limit(src.len()));
        };
        dst.copy_from_slice(src);
        self.written += src.len();
        Ok(())
    }

    fn write_zeroes(&mut self, len: usize) -> WriteResult<()> {
        let Some(dst) = advance_slice_mut_checked(&mut self.buf, len) else {
            return Err(write_size_limit(len));
        };
        dst.fill(0);
        self.written += len;
        Ok(())
    }

    #[inline(always)]
    fn remaining(&self) -> Option<usize> {
        Some(self.buf.len())
    }

    #[inline(always)]
    fn written(&self) -> usize {
        self.written
    }
}
