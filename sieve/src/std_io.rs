//! Bridges between [`std::io`] and the endpoint traits.

use std::io::{
    ErrorKind,
    Read,
    Seek,
    SeekFrom,
    Write,
};

use crate::{
    endpoint::{
        check_bounds,
        Mark,
        Sink,
        Source,
    },
    Error,
};

/// A byte [`Source`] reading from a [`std::io::Read`].
///
/// Implements [`Mark`] if the reader is [`Seek`]: marking remembers the
/// stream position and resetting seeks back to it.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
    marked: Option<u64>,
}

impl<R> IoSource<R> {
    #[inline]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            marked: None,
        }
    }

    #[inline]
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Source for IoSource<R> {
    type Unit = u8;

    fn read_one(&mut self) -> Result<Option<u8>, Error> {
        let mut byte = [0u8];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read_into(
        &mut self,
        buf: &mut [u8],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>, Error> {
        check_bounds(buf.len(), offset, length)?;
        if length == 0 {
            return Ok(Some(0));
        }

        loop {
            match self.inner.read(&mut buf[offset..offset + length]) {
                Ok(0) => return Ok(None),
                Ok(n_read) => return Ok(Some(n_read)),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn skip(&mut self, n: u64) -> Result<u64, Error> {
        let skipped = std::io::copy(&mut (&mut self.inner).take(n), &mut std::io::sink())?;
        Ok(skipped)
    }
}

impl<R: Read + Seek> Mark for IoSource<R> {
    fn mark(&mut self, _limit: usize) -> Result<(), Error> {
        self.marked = Some(self.inner.stream_position()?);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), Error> {
        let position = self.marked.ok_or(Error::NoMark)?;
        self.inner.seek(SeekFrom::Start(position))?;
        Ok(())
    }
}

/// A char [`Source`] decoding UTF-8 from a [`std::io::Read`].
///
/// Reads exactly the bytes of the chars it returns, so nothing after the last
/// delivered char is taken from the reader. Wrap unbuffered readers in a
/// [`BufReader`](std::io::BufReader).
///
/// Malformed input fails with an [`ErrorKind::InvalidData`] I/O error.
#[derive(Debug)]
pub struct Utf8Source<R> {
    inner: R,
    marked: Option<u64>,
    deferred: Option<Error>,
}

impl<R> Utf8Source<R> {
    #[inline]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            marked: None,
            deferred: None,
        }
    }

    #[inline]
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Utf8Source<R> {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        let mut byte = [0u8];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn decode_one(&mut self) -> Result<Option<char>, Error> {
        let Some(lead) = self.read_byte()?
        else {
            return Ok(None);
        };

        let width = match lead {
            0x00..=0x7f => return Ok(Some(char::from(lead))),
            0xc2..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf4 => 4,
            _ => return Err(malformed(format!("invalid UTF-8 lead byte {lead:#04x}"))),
        };

        let mut encoded = [lead, 0, 0, 0];
        for byte in &mut encoded[1..width] {
            *byte = self
                .read_byte()?
                .ok_or_else(|| std::io::Error::from(ErrorKind::UnexpectedEof))?;
        }

        let decoded = std::str::from_utf8(&encoded[..width]).map_err(malformed)?;
        Ok(decoded.chars().next())
    }
}

fn malformed(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    std::io::Error::new(ErrorKind::InvalidData, e).into()
}

impl<R: Read> Source for Utf8Source<R> {
    type Unit = char;

    fn read_one(&mut self) -> Result<Option<char>, Error> {
        if let Some(e) = self.deferred.take() {
            return Err(e);
        }
        self.decode_one()
    }

    /// Decodes up to `length` chars. An error after at least one char was
    /// decoded is returned by the next call instead.
    fn read_into(
        &mut self,
        buf: &mut [char],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>, Error> {
        check_bounds(buf.len(), offset, length)?;
        if length == 0 {
            return Ok(Some(0));
        }
        if let Some(e) = self.deferred.take() {
            return Err(e);
        }

        let mut n_read = 0;
        while n_read < length {
            match self.decode_one() {
                Ok(Some(c)) => {
                    buf[offset + n_read] = c;
                    n_read += 1;
                }
                Ok(None) => break,
                Err(e) if n_read > 0 => {
                    self.deferred = Some(e);
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        Ok((n_read > 0).then_some(n_read))
    }

    fn skip(&mut self, n: u64) -> Result<u64, Error> {
        let mut skipped = 0;
        while skipped < n && self.read_one()?.is_some() {
            skipped += 1;
        }
        Ok(skipped)
    }
}

impl<R: Read + Seek> Mark for Utf8Source<R> {
    fn mark(&mut self, _limit: usize) -> Result<(), Error> {
        self.marked = Some(self.inner.stream_position()?);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), Error> {
        let position = self.marked.ok_or(Error::NoMark)?;
        self.inner.seek(SeekFrom::Start(position))?;
        self.deferred = None;
        Ok(())
    }
}

/// A byte [`Sink`] writing to a [`std::io::Write`].
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W> IoSink<W> {
    #[inline]
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Sink for IoSink<W> {
    type Unit = u8;

    #[inline]
    fn write_one(&mut self, unit: u8) -> Result<(), Error> {
        self.inner.write_all(&[unit])?;
        Ok(())
    }

    #[inline]
    fn write_slice(&mut self, buf: &[u8], offset: usize, length: usize) -> Result<(), Error> {
        check_bounds(buf.len(), offset, length)?;
        self.inner.write_all(&buf[offset..offset + length])?;
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush()?;
        Ok(())
    }
}

/// A char [`Sink`] that writes UTF-8 to a [`std::io::Write`].
#[derive(Debug)]
pub struct Utf8Sink<W> {
    inner: W,
}

impl<W> Utf8Sink<W> {
    #[inline]
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Sink for Utf8Sink<W> {
    type Unit = char;

    #[inline]
    fn write_one(&mut self, unit: char) -> Result<(), Error> {
        let mut encoded = [0u8; 4];
        self.inner
            .write_all(unit.encode_utf8(&mut encoded).as_bytes())?;
        Ok(())
    }

    fn write_slice(&mut self, buf: &[char], offset: usize, length: usize) -> Result<(), Error> {
        check_bounds(buf.len(), offset, length)?;
        let encoded = buf[offset..offset + length].iter().collect::<String>();
        self.inner.write_all(encoded.as_bytes())?;
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Exposes a byte [`Source`] as a [`std::io::Read`].
#[derive(Debug)]
pub struct StdRead<S> {
    inner: S,
}

impl<S> StdRead<S> {
    #[inline]
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Source<Unit = u8>> Read for StdRead<S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let length = buf.len();
        if length == 0 {
            return Ok(0);
        }
        Ok(self.inner.read_into(buf, 0, length)?.unwrap_or_default())
    }
}

/// Exposes a byte [`Sink`] as a [`std::io::Write`].
#[derive(Debug)]
pub struct StdWrite<S> {
    inner: S,
}

impl<S> StdWrite<S> {
    #[inline]
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Sink<Unit = u8>> Write for StdWrite<S> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write_slice(buf, 0, buf.len())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(self.inner.flush()?)
    }
}
