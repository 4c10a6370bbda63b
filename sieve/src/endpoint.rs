//! The sequential endpoint contract every decorator wraps and re-exposes.
//!
//! A [`Source`] produces units (bytes or chars) one after another, a
//! [`Sink`] consumes them. Sources that can rewind to a save point also
//! implement [`Mark`].

use crate::{
    count::{
        CountSink,
        CountSource,
    },
    error::OutOfBounds,
    range::{
        RangeSink,
        RangeSource,
    },
    Error,
};

/// Checks that `offset..offset + length` lies inside a buffer of length
/// `len`.
#[inline]
pub fn check_bounds(len: usize, offset: usize, length: usize) -> Result<(), OutOfBounds> {
    if offset <= len && length <= len - offset {
        Ok(())
    }
    else {
        Err(OutOfBounds {
            offset,
            length,
            len,
        })
    }
}

/// A sequential, possibly blocking, read endpoint.
pub trait Source {
    type Unit: Copy;

    /// Reads a single unit. Returns `None` at the end of the stream.
    fn read_one(&mut self) -> Result<Option<Self::Unit>, Error>;

    /// Reads up to `length` units into `buf[offset..offset + length]`.
    ///
    /// Returns the number of units read, or `None` at the end of the stream.
    /// A `length` of 0 reads nothing and returns `Some(0)`. Implementations
    /// must validate `offset` and `length` with [`check_bounds`] before
    /// doing anything else.
    fn read_into(
        &mut self,
        buf: &mut [Self::Unit],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>, Error>;

    /// Skips up to `n` units and returns how many were actually skipped.
    ///
    /// Fewer than `n` are only skipped at the end of the stream.
    fn skip(&mut self, n: u64) -> Result<u64, Error>;

    #[inline]
    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// A [`Source`] that can return to a previously marked position.
pub trait Mark: Source {
    /// Marks the current position. `limit` is the number of units the
    /// caller intends to read before calling [`reset`](Mark::reset).
    fn mark(&mut self, limit: usize) -> Result<(), Error>;

    /// Returns to the position of the last [`mark`](Mark::mark).
    fn reset(&mut self) -> Result<(), Error>;
}

/// A sequential, possibly blocking, write endpoint.
pub trait Sink {
    type Unit: Copy;

    fn write_one(&mut self, unit: Self::Unit) -> Result<(), Error>;

    /// Writes `buf[offset..offset + length]`. Implementations must validate
    /// `offset` and `length` with [`check_bounds`] before doing anything
    /// else.
    fn write_slice(&mut self, buf: &[Self::Unit], offset: usize, length: usize)
        -> Result<(), Error>;

    #[inline]
    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }

    #[inline]
    fn close(&mut self) -> Result<(), Error> {
        self.flush()
    }
}

pub trait SourceExt: Source {
    #[inline]
    fn counted(self) -> CountSource<Self>
    where
        Self: Sized,
    {
        CountSource::new(self)
    }

    #[inline]
    fn range(self, from: u64, to: u64) -> Result<RangeSource<Self>, Error>
    where
        Self: Sized,
    {
        RangeSource::new(self, from, to)
    }

    /// Reads until the end of the stream.
    fn read_to_vec(&mut self) -> Result<Vec<Self::Unit>, Error> {
        let mut out = vec![];
        while let Some(unit) = self.read_one()? {
            out.push(unit);
        }
        Ok(out)
    }
}

impl<S: Source + ?Sized> SourceExt for S {}

pub trait SinkExt: Sink {
    #[inline]
    fn counted(self) -> CountSink<Self>
    where
        Self: Sized,
    {
        CountSink::new(self)
    }

    #[inline]
    fn range(self, from: u64, to: u64) -> Result<RangeSink<Self>, Error>
    where
        Self: Sized,
    {
        RangeSink::new(self, from, to)
    }

    #[inline]
    fn write_all(&mut self, buf: &[Self::Unit]) -> Result<(), Error> {
        self.write_slice(buf, 0, buf.len())
    }
}

impl<S: Sink + ?Sized> SinkExt for S {}

impl<'a, S: Source + ?Sized> Source for &'a mut S {
    type Unit = S::Unit;

    #[inline]
    fn read_one(&mut self) -> Result<Option<Self::Unit>, Error> {
        S::read_one(self)
    }

    #[inline]
    fn read_into(
        &mut self,
        buf: &mut [Self::Unit],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>, Error> {
        S::read_into(self, buf, offset, length)
    }

    #[inline]
    fn skip(&mut self, n: u64) -> Result<u64, Error> {
        S::skip(self, n)
    }

    #[inline]
    fn close(&mut self) -> Result<(), Error> {
        S::close(self)
    }
}

impl<'a, S: Mark + ?Sized> Mark for &'a mut S {
    #[inline]
    fn mark(&mut self, limit: usize) -> Result<(), Error> {
        S::mark(self, limit)
    }

    #[inline]
    fn reset(&mut self) -> Result<(), Error> {
        S::reset(self)
    }
}

impl<'a, S: Sink + ?Sized> Sink for &'a mut S {
    type Unit = S::Unit;

    #[inline]
    fn write_one(&mut self, unit: Self::Unit) -> Result<(), Error> {
        S::write_one(self, unit)
    }

    #[inline]
    fn write_slice(
        &mut self,
        buf: &[Self::Unit],
        offset: usize,
        length: usize,
    ) -> Result<(), Error> {
        S::write_slice(self, buf, offset, length)
    }

    #[inline]
    fn flush(&mut self) -> Result<(), Error> {
        S::flush(self)
    }

    #[inline]
    fn close(&mut self) -> Result<(), Error> {
        S::close(self)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    type Unit = S::Unit;

    #[inline]
    fn read_one(&mut self) -> Result<Option<Self::Unit>, Error> {
        S::read_one(self)
    }

    #[inline]
    fn read_into(
        &mut self,
        buf: &mut [Self::Unit],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>, Error> {
        S::read_into(self, buf, offset, length)
    }

    #[inline]
    fn skip(&mut self, n: u64) -> Result<u64, Error> {
        S::skip(self, n)
    }

    #[inline]
    fn close(&mut self) -> Result<(), Error> {
        S::close(self)
    }
}

impl<S: Mark + ?Sized> Mark for Box<S> {
    #[inline]
    fn mark(&mut self, limit: usize) -> Result<(), Error> {
        S::mark(self, limit)
    }

    #[inline]
    fn reset(&mut self) -> Result<(), Error> {
        S::reset(self)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    type Unit = S::Unit;

    #[inline]
    fn write_one(&mut self, unit: Self::Unit) -> Result<(), Error> {
        S::write_one(self, unit)
    }

    #[inline]
    fn write_slice(
        &mut self,
        buf: &[Self::Unit],
        offset: usize,
        length: usize,
    ) -> Result<(), Error> {
        S::write_slice(self, buf, offset, length)
    }

    #[inline]
    fn flush(&mut self) -> Result<(), Error> {
        S::flush(self)
    }

    #[inline]
    fn close(&mut self) -> Result<(), Error> {
        S::close(self)
    }
}

impl<U: Copy> Sink for Vec<U> {
    type Unit = U;

    #[inline]
    fn write_one(&mut self, unit: U) -> Result<(), Error> {
        self.push(unit);
        Ok(())
    }

    #[inline]
    fn write_slice(&mut self, buf: &[U], offset: usize, length: usize) -> Result<(), Error> {
        check_bounds(buf.len(), offset, length)?;
        self.extend_from_slice(&buf[offset..offset + length]);
        Ok(())
    }
}
