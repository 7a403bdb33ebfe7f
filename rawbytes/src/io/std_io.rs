use {
    super::*,
    std::io::{self, ErrorKind, Read, Write},
};

/// Read from `source` until `dst` is full or the source is exhausted.
///
/// Returns the number of bytes read; retries on [`ErrorKind::Interrupted`].
fn read_fill<R: Read + ?Sized>(source: &mut R, dst: &mut [u8]) -> io::Result<usize> {
    let mut read = 0;
    while read < dst.len() {
        match source.read(&mut dst[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(read)
}

/// Read terminator-sized chunks from `source` until one equals `terminator`.
///
/// Returns the bytes preceding the terminator and the total number of bytes
/// consumed, terminator included. A source that ends first yields everything it
/// produced.
pub fn read_terminated_from<R: Read + ?Sized>(
    source: &mut R,
    terminator: &[u8],
) -> io::Result<(Vec<u8>, usize)> {
    let mut data = Vec::new();
    if terminator.is_empty() {
        let consumed = source.read_to_end(&mut data)?;
        return Ok((data, consumed));
    }

    let mut chunk = vec![0; terminator.len()];
    let mut consumed = 0;
    loop {
        let n = read_fill(source, &mut chunk)?;
        consumed += n;
        if n == chunk.len() && chunk == terminator {
            return Ok((data, consumed));
        }
        data.extend_from_slice(&chunk[..n]);
        if n < chunk.len() {
            return Ok((data, consumed));
        }
    }
}

/// [`Reader`] over any [`std::io::Read`] source.
///
/// Bytes requested through [`Reader::peek`] are held in a lookahead buffer and
/// handed out again by subsequent reads; nothing else is buffered, so the inner
/// source is never read past what the conversion needs.
pub struct StreamReader<R> {
    lookahead: Vec<u8>,
    position: usize,
    inner: R,
}

impl<R: Read> StreamReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            lookahead: Vec::new(),
            position: 0,
            inner,
        }
    }

    /// Return the wrapped source. Bytes still held for lookahead are dropped.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Number of bytes pulled from the source, held lookahead included.
    pub fn drawn(&self) -> usize {
        self.position + self.lookahead.len()
    }

    /// Move up to `dst.len()` bytes out of the lookahead buffer, then the source.
    fn read_raw(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let buffered = self.lookahead.len().min(dst.len());
        dst[..buffered].copy_from_slice(&self.lookahead[..buffered]);
        self.lookahead.drain(..buffered);
        let read = buffered + read_fill(&mut self.inner, &mut dst[buffered..])?;
        self.position += read;
        Ok(read)
    }
}

impl<R: Read> Reader for StreamReader<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        let read = self.read_raw(buf)?;
        if read < buf.len() {
            return Err(read_size_limit(buf.len()));
        }
        Ok(())
    }

    fn peek(&mut self, len: usize) -> ReadResult<&[u8]> {
        let buffered = self.lookahead.len();
        if buffered < len {
            self.lookahead.resize(len, 0);
            let read = read_fill(&mut self.inner, &mut self.lookahead[buffered..])?;
            self.lookahead.truncate(buffered + read);
        }
        Ok(&self.lookahead[..len.min(self.lookahead.len())])
    }

    fn skip(&mut self, len: usize) -> ReadResult<()> {
        let buffered = self.lookahead.len().min(len);
        self.lookahead.drain(..buffered);
        let wanted = (len - buffered) as u64;
        let discarded = io::copy(&mut Read::take(&mut self.inner, wanted), &mut io::sink())?;
        self.position += buffered + discarded as usize;
        if discarded < wanted {
            return Err(read_size_limit(len));
        }
        Ok(())
    }

    fn read_to_end(&mut self) -> ReadResult<Vec<u8>> {
        let mut data = core::mem::take(&mut self.lookahead);
        Read::read_to_end(&mut self.inner, &mut data)?;
        self.position += data.len();
        Ok(data)
    }

    fn read_terminated(&mut self, terminator: &[u8]) -> ReadResult<(Vec<u8>, usize)> {
        let lookahead = core::mem::take(&mut self.lookahead);
        let mut source = lookahead.as_slice().chain(&mut self.inner);
        let (data, consumed) = read_terminated_from(&mut source, terminator)?;
        // Put back whatever part of the lookahead the scan did not reach.
        if consumed < lookahead.len() {
            self.lookahead = lookahead[consumed..].to_vec();
        }
        self.position += consumed;
        Ok((data, consumed))
    }

    #[inline(always)]
    fn position(&self) -> usize {
        self.position
    }
}

/// Unbounded [`Writer`] over any [`std::io::Write`] sink.
pub struct StreamWriter<W> {
    written: usize,
    inner: W,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { written: 0, inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Writer for StreamWriter<W> {
    fn write(&mut self, src: &[u8]) -> WriteResult<()> {
        self.inner.write_all(src)?;
        self.written += src.len();
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

    fn finish(&mut self) -> WriteResult<()> {
        self.inner.flush()?;
        Ok(())
    }
}
