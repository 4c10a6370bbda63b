//! Decorators that count the units passing through them.

use crate::{
    endpoint::{
        check_bounds,
        Mark,
        Sink,
        Source,
    },
    Error,
};

/// Counts the units read from the inner source.
///
/// The count follows the inner source through [`Mark::mark`] and
/// [`Mark::reset`]: a reset rolls the count back to its value at the mark.
#[derive(Clone, Debug)]
pub struct CountSource<S> {
    inner: S,
    count: u64,
    marked: u64,
}

impl<S> CountSource<S> {
    #[inline]
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            count: 0,
            marked: 0,
        }
    }

    /// Number of units read since construction, or since the mark that was
    /// last reset to.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> From<S> for CountSource<S> {
    #[inline]
    fn from(value: S) -> Self {
        Self::new(value)
    }
}

impl<S: Source> Source for CountSource<S> {
    type Unit = S::Unit;

    fn read_one(&mut self) -> Result<Option<Self::Unit>, Error> {
        let unit = self.inner.read_one()?;
        if unit.is_some() {
            self.count += 1;
        }
        Ok(unit)
    }

    fn read_into(
        &mut self,
        buf: &mut [Self::Unit],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>, Error> {
        check_bounds(buf.len(), offset, length)?;
        if length == 0 {
            return Ok(Some(0));
        }

        let n_read = self.inner.read_into(buf, offset, length)?;
        if let Some(n_read) = n_read {
            self.count += n_read as u64;
        }
        Ok(n_read)
    }

    fn skip(&mut self, n: u64) -> Result<u64, Error> {
        if n == 0 {
            return Ok(0);
        }

        let skipped = self.inner.skip(n)?;
        self.count += skipped;
        Ok(skipped)
    }

    #[inline]
    fn close(&mut self) -> Result<(), Error> {
        self.inner.close()
    }
}

impl<S: Mark> Mark for CountSource<S> {
    fn mark(&mut self, limit: usize) -> Result<(), Error> {
        self.inner.mark(limit)?;
        self.marked = self.count;
        tracing::trace!(count = self.count, limit, "mark");
        Ok(())
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.inner.reset()?;
        tracing::trace!(from = self.count, to = self.marked, "reset");
        self.count = self.marked;
        Ok(())
    }
}

/// Counts the units written to the inner sink.
#[derive(Clone, Debug)]
pub struct CountSink<S> {
    inner: S,
    count: u64,
}

impl<S> CountSink<S> {
    #[inline]
    pub fn new(inner: S) -> Self {
        Self { inner, count: 0 }
    }

    /// Number of units the inner sink accepted.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> From<S> for CountSink<S> {
    #[inline]
    fn from(value: S) -> Self {
        Self::new(value)
    }
}

impl<S: Sink> Sink for CountSink<S> {
    type Unit = S::Unit;

    fn write_one(&mut self, unit: Self::Unit) -> Result<(), Error> {
        self.inner.write_one(unit)?;
        self.count += 1;
        Ok(())
    }

    fn write_slice(
        &mut self,
        buf: &[Self::Unit],
        offset: usize,
        length: usize,
    ) -> Result<(), Error> {
        check_bounds(buf.len(), offset, length)?;
        if length == 0 {
            return Ok(());
        }

        self.inner.write_slice(buf, offset, length)?;
        self.count += length as u64;
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush()
    }

    #[inline]
    fn close(&mut self) -> Result<(), Error> {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CountSink,
        CountSource,
    };
    use crate::{
        cursor::Cursor,
        endpoint::{
            Mark,
            Sink,
            SinkExt,
            Source,
            SourceExt,
        },
        testing::{
            Broken,
            Probe,
        },
        Error,
    };

    #[test]
    fn it_counts_single_reads_but_not_the_end() {
        let mut source = CountSource::new(Cursor::new(vec![1u8, 2, 3]));
        for expected in 1..=3 {
            assert!(source.read_one().unwrap().is_some());
            assert_eq!(source.count(), expected);
        }
        assert_eq!(source.read_one().unwrap(), None);
        assert_eq!(source.count(), 3);
        assert_eq!(source.read_one().unwrap(), None);
        assert_eq!(source.count(), 3);
    }

    #[test]
    fn it_counts_chars() {
        let mut source = Cursor::from_str("grüße").counted();
        assert_eq!(source.read_to_vec().unwrap().into_iter().collect::<String>(), "grüße");
        assert_eq!(source.count(), 5);
    }

    #[test]
    fn it_counts_what_was_actually_read_in_bulk() {
        let mut source = CountSource::new(Cursor::new(&b"abcde"[..]));
        let mut buf = [0u8; 8];
        assert_eq!(source.read_into(&mut buf, 1, 3).unwrap(), Some(3));
        assert_eq!(source.count(), 3);
        assert_eq!(source.read_into(&mut buf, 0, 8).unwrap(), Some(2));
        assert_eq!(source.count(), 5);
        assert_eq!(source.read_into(&mut buf, 0, 8).unwrap(), None);
        assert_eq!(source.count(), 5);
        assert_eq!(&buf[..2], b"de");
    }

    #[test]
    fn empty_reads_dont_touch_the_inner_source() {
        let mut source = CountSource::new(Probe::new(Cursor::new(&b"abc"[..])));
        let mut buf = [0u8; 4];
        assert_eq!(source.read_into(&mut buf, 4, 0).unwrap(), Some(0));
        assert_eq!(source.skip(0).unwrap(), 0);
        assert_eq!(source.get_ref().calls(), 0);
        assert_eq!(source.count(), 0);
    }

    #[test]
    fn invalid_regions_fail_before_delegating() {
        let mut source = CountSource::new(Probe::new(Cursor::new(&b"abc"[..])));
        let mut buf = [0u8; 4];
        assert!(matches!(
            source.read_into(&mut buf, 3, 2),
            Err(Error::OutOfBounds(_))
        ));
        assert!(matches!(
            source.read_into(&mut buf, 5, 0),
            Err(Error::OutOfBounds(_))
        ));
        assert_eq!(source.get_ref().calls(), 0);
        assert_eq!(source.count(), 0);
    }

    #[test]
    fn skip_adds_what_was_actually_skipped() {
        let mut source = CountSource::new(Cursor::new(vec![1u8, 2, 3]));
        assert_eq!(source.skip(2).unwrap(), 2);
        assert_eq!(source.count(), 2);
        assert_eq!(source.skip(2).unwrap(), 1);
        assert_eq!(source.count(), 3);
    }

    #[test]
    fn reset_restores_the_count_at_the_mark() {
        let mut source = CountSource::new(Cursor::new(&b"abcd"[..]));
        source.read_one().unwrap();
        source.mark(8).unwrap();
        assert_eq!(source.read_one().unwrap(), Some(b'b'));
        source.skip(1).unwrap();
        assert_eq!(source.count(), 3);
        source.reset().unwrap();
        assert_eq!(source.count(), 1);
        assert_eq!(source.read_one().unwrap(), Some(b'b'));
        assert_eq!(source.count(), 2);
    }

    #[test]
    fn reset_without_mark_goes_back_to_zero() {
        let mut source = CountSource::new(Cursor::new(&b"ab"[..]));
        source.read_one().unwrap();
        source.reset().unwrap();
        assert_eq!(source.count(), 0);
        assert_eq!(source.read_one().unwrap(), Some(b'a'));
    }

    #[test]
    fn inner_errors_propagate_without_counting() {
        let mut source = CountSource::new(Broken::<u8>::default());
        let mut buf = [0u8; 4];
        assert!(matches!(source.read_one(), Err(Error::Io(_))));
        assert!(matches!(source.read_into(&mut buf, 0, 4), Err(Error::Io(_))));
        assert!(matches!(source.skip(3), Err(Error::Io(_))));
        assert!(matches!(source.mark(1), Err(Error::Io(_))));
        assert_eq!(source.count(), 0);

        let mut sink = CountSink::new(Broken::<u8>::default());
        assert!(matches!(sink.write_one(1), Err(Error::Io(_))));
        assert!(matches!(sink.write_all(&buf), Err(Error::Io(_))));
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn it_counts_written_slices() {
        let mut sink = CountSink::new(Vec::new());
        let data = b"hello world";
        let mut total = 0;
        for (offset, length) in [(0, 5), (5, 0), (5, 1), (6, 5)] {
            sink.write_slice(data, offset, length).unwrap();
            total += length as u64;
            assert_eq!(sink.count(), total);
        }
        sink.write_one(b'!').unwrap();
        assert_eq!(sink.count(), 12);
        assert_eq!(sink.into_inner(), b"hello world!");
    }

    #[test]
    fn empty_and_invalid_writes_dont_touch_the_inner_sink() {
        let mut sink = CountSink::new(Probe::new(Vec::<char>::new()));
        sink.write_slice(&['a', 'b'], 2, 0).unwrap();
        assert!(matches!(
            sink.write_slice(&['a', 'b'], 1, 2),
            Err(Error::OutOfBounds(_))
        ));
        assert_eq!(sink.get_ref().calls(), 0);
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn flush_and_close_are_forwarded() {
        let mut sink = CountSink::new(Probe::new(Vec::<u8>::new()));
        sink.flush().unwrap();
        sink.close().unwrap();
        assert_eq!(sink.get_ref().flushes(), 1);
        assert_eq!(sink.get_ref().closes(), 1);

        let mut source = CountSource::new(Probe::new(Cursor::new(&b""[..])));
        source.close().unwrap();
        assert_eq!(source.get_ref().closes(), 1);
    }
}
