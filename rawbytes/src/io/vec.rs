use super::*;

/// Writer implementation for `Vec<u8>` that appends to the vector. The vector will grow as needed.
///
/// # Examples
///
/// Writing to a new vector.
/// ```
/// # use rawbytes::io::Writer;
/// let mut vec = Vec::<u8>::new();
/// let bytes = [1, 2, 3];
/// vec.write(&bytes).unwrap();
/// assert_eq!(vec, &[1, 2, 3]);
/// ```
///
/// Writing to an existing vector.
/// ```
/// # use rawbytes::io::Writer;
/// let mut vec = vec![1, 2, 3];
/// let bytes = [4, 5, 6];
/// vec.write(&bytes).unwrap();
/// assert_eq!(vec, &[1, 2, 3, 4, 5, 6]);
/// ```
impl Writer for Vec<u8> {
    #[inline]
    fn write(&mut self, src: &[u8]) -> WriteResult<()> {
        self.extend_from_slice(src);
        Ok(())
    }

    #[inline]
    fn write_zeroes(&mut self, len: usize) -> WriteResult<()> {
        self.resize(self.len() + len, 0);
        Ok(())
    }

    #[inline(always)]
    fn remaining(&self) -> Option<usize> {
        None
    }

    #[inline(always)]
    fn written(&self) -> usize {
        self.len()
    }
}

/// Unbounded [`Writer`] that discards its input and only counts it.
#[derive(Clone, Copy, Debug, Default)]
pub struct SizeCounter {
    written: usize,
}

impl SizeCounter {
    pub const fn new() -> Self {
        Self { written: 0 }
    }
}

impl Writer for SizeCounter {
    #[inline(always)]
    fn write(&mut self, src: &[u8]) -> WriteResult<()> {
        self.written += src.len();
        Ok(())
    }

    #[inline(always)]
    fn write_zeroes(&mut self, len: usize) -> WriteResult<()> {
        self.written += len;
        Ok(())
    }

    #[inline(always)]
    fn remaining(&self) -> Option<usize> {
        None
    }

    #[inline(always)]
    fn written(&self) -> usize {
        self.written
    }
}
