//! [`Reader`] and [`Writer`] implementations.
//!
//! Both traits are object safe: the conversion engine threads a `&mut dyn Reader`
//! or `&mut dyn Writer` through every recursive step, so composite members, bounded
//! sub-readers and stream adapters all share one code path.
use {std::borrow::Cow, thiserror::Error};

mod slice;
mod std_io;
mod vec;

pub use {
    slice::{SliceReader, SliceWriter},
    std_io::{read_terminated_from, StreamReader, StreamWriter},
    vec::SizeCounter,
};

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Attempting to read {0} bytes past the end of the input")]
    ReadSizeLimit(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ReadResult<T> = core::result::Result<T, ReadError>;

#[cold]
pub const fn read_size_limit(len: usize) -> ReadError {
    ReadError::ReadSizeLimit(len)
}

/// Offset of the first `terminator` in `data`, scanning at a stride of the
/// terminator's own length.
///
/// A wide encoding such as UTF-16 may contain a zero byte inside a code unit; only
/// aligned matches count.
pub fn find_terminator(data: &[u8], terminator: &[u8]) -> Option<usize> {
    if terminator.is_empty() {
        return None;
    }
    data.chunks_exact(terminator.len())
        .position(|chunk| chunk == terminator)
        .map(|index| index * terminator.len())
}

/// Sequential byte source.
pub trait Reader {
    /// Fill `buf` completely or fail with [`ReadError::ReadSizeLimit`].
    fn read_exact(&mut self, buf: &mut [u8]) -> ReadResult<()>;

    /// Consume exactly `len` bytes.
    ///
    /// Buffer-backed readers borrow; stream-backed readers allocate.
    fn take(&mut self, len: usize) -> ReadResult<Cow<'_, [u8]>> {
        let mut buf = vec![0; len];
        self.read_exact(&mut buf)?;
        Ok(Cow::Owned(buf))
    }

    /// Look at up to `len` upcoming bytes without consuming them.
    ///
    /// Returns fewer than `len` bytes only when the source is exhausted.
    fn peek(&mut self, len: usize) -> ReadResult<&[u8]>;

    /// Advance past `len` bytes without interpreting them.
    fn skip(&mut self, len: usize) -> ReadResult<()> {
        self.take(len).map(drop)
    }

    /// Consume everything that is left.
    fn read_to_end(&mut self) -> ReadResult<Vec<u8>>;

    /// Consume bytes up to and including the first aligned `terminator`.
    ///
    /// Returns the bytes preceding the terminator and the total consumed. When no
    /// terminator is present the remaining input is consumed whole.
    fn read_terminated(&mut self, terminator: &[u8]) -> ReadResult<(Vec<u8>, usize)>;

    /// Number of bytes consumed so far.
    fn position(&self) -> usize;
}

impl<R: Reader + ?Sized> Reader for &mut R {
    #[inline(always)]
    fn read_exact(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        (**self).read_exact(buf)
    }

    #[inline(always)]
    fn take(&mut self, len: usize) -> ReadResult<Cow<'_, [u8]>> {
        (**self).take(len)
    }

    #[inline(always)]
    fn peek(&mut self, len: usize) -> ReadResult<&[u8]> {
        (**self).peek(len)
    }

    #[inline(always)]
    fn skip(&mut self, len: usize) -> ReadResult<()> {
        (**self).skip(len)
    }

    #[inline(always)]
    fn read_to_end(&mut self) -> ReadResult<Vec<u8>> {
        (**self).read_to_end()
    }

    #[inline(always)]
    fn read_terminated(&mut self, terminator: &[u8]) -> ReadResult<(Vec<u8>, usize)> {
        (**self).read_terminated(terminator)
    }

    #[inline(always)]
    fn position(&self) -> usize {
        (**self).position()
    }
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Attempting to write {0} bytes past the end of the destination")]
    WriteSizeLimit(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cold]
pub const fn write_size_limit(len: usize) -> WriteError {
    WriteError::WriteSizeLimit(len)
}

pub type WriteResult<T> = core::result::Result<T, WriteError>;

/// Sequential byte sink.
pub trait Writer {
    /// Append `src`. A bounded writer rejects the whole write if it does not fit.
    fn write(&mut self, src: &[u8]) -> WriteResult<()>;

    /// Append `len` zero bytes.
    fn write_zeroes(&mut self, len: usize) -> WriteResult<()> {
        const ZEROES: [u8; 64] = [0; 64];
        if let Some(remaining) = self.remaining() {
            if len > remaining {
                return Err(write_size_limit(len));
            }
        }
        let mut left = len;
        while left > 0 {
            let n = left.min(ZEROES.len());
            self.write(&ZEROES[..n])?;
            left -= n;
        }
        Ok(())
    }

    /// Capacity left, or `None` for sinks without a fixed size.
    fn remaining(&self) -> Option<usize>;

    /// Number of bytes written so far.
    fn written(&self) -> usize;

    fn finish(&mut self) -> WriteResult<()> {
        Ok(())
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    #[inline(always)]
    fn write(&mut self, src: &[u8]) -> WriteResult<()> {
        (**self).write(src)
    }

    #[inline(always)]
    fn write_zeroes(&mut self, len: usize) -> WriteResult<()> {
        (**self).write_zeroes(len)
    }

    #[inline(always)]
    fn remaining(&self) -> Option<usize> {
        (**self).remaining()
    }

    #[inline(always)]
    fn written(&self) -> usize {
        (**self).written()
    }

    #[inline(always)]
    fn finish(&mut self) -> WriteResult<()> {
        (**self).finish()
    }
}
