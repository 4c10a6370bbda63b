//! Decorators that only let through the units inside a [`Window`].

use crate::{
    endpoint::{
        check_bounds,
        Mark,
        Sink,
        Source,
    },
    Error,
    Window,
};

/// Reads only the positions `from..=to` of the inner source.
///
/// Positions before `from` are skipped on the inner source the first time
/// something is read; after `to` the source reports the end of the stream.
/// [`index`](Self::index) tracks the position in the inner source, not the
/// number of units delivered.
#[derive(Clone, Debug)]
pub struct RangeSource<S> {
    inner: S,
    window: Window,
    index: u64,
    marked: u64,
}

impl<S> RangeSource<S> {
    #[inline]
    pub fn new(inner: S, from: u64, to: u64) -> Result<Self, Error> {
        Ok(Self::with_window(inner, Window::new(from, to)?))
    }

    #[inline]
    pub fn with_window(inner: S, window: Window) -> Self {
        Self {
            inner,
            window,
            index: 0,
            marked: 0,
        }
    }

    #[inline]
    pub fn from_index(&self) -> u64 {
        self.window.from_index()
    }

    #[inline]
    pub fn to_index(&self) -> u64 {
        self.window.to_index()
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    /// Position of the next unit in the inner source.
    #[inline]
    pub fn index(&self) -> u64 {
        self.index
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

    #[inline]
    fn is_past_window(&self) -> bool {
        self.index > self.window.to_index()
    }
}

impl<S: Source> RangeSource<S> {
    /// Skips the inner source forward to `from`. Stops early if the inner
    /// source ends before that.
    fn skip_to_window(&mut self) -> Result<(), Error> {
        let from = self.window.from_index();
        if self.index >= from {
            return Ok(());
        }

        while self.index < from {
            let skipped = self.inner.skip(from - self.index)?;
            if skipped == 0 {
                break;
            }
            self.index += skipped;
        }

        tracing::trace!(index = self.index, from, "skipped to window");
        Ok(())
    }
}

impl<S: Source> Source for RangeSource<S> {
    type Unit = S::Unit;

    fn read_one(&mut self) -> Result<Option<Self::Unit>, Error> {
        self.skip_to_window()?;
        if self.is_past_window() || self.index < self.window.from_index() {
            return Ok(None);
        }

        let unit = self.inner.read_one()?;
        if unit.is_some() {
            self.index = self.index.saturating_add(1);
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

        self.skip_to_window()?;
        if self.is_past_window() || self.index < self.window.from_index() {
            return Ok(None);
        }

        // never read past `to`, even if the caller asked for more.
        let length =
            std::cmp::min(length as u64, self.window.remaining_from(self.index)) as usize;

        let n_read = self.inner.read_into(buf, offset, length)?;
        if let Some(n_read) = n_read {
            self.index += n_read as u64;
        }
        Ok(n_read)
    }

    /// Skips up to `n` units inside the window.
    ///
    /// `n` is not clamped to the window: skipping past `to` is allowed and
    /// makes every following read report the end of the stream.
    fn skip(&mut self, n: u64) -> Result<u64, Error> {
        if n == 0 || self.is_past_window() {
            return Ok(0);
        }

        self.skip_to_window()?;
        let skipped = self.inner.skip(n)?;
        self.index += skipped;
        Ok(skipped)
    }

    #[inline]
    fn close(&mut self) -> Result<(), Error> {
        self.inner.close()
    }
}

impl<S: Mark> Mark for RangeSource<S> {
    fn mark(&mut self, limit: usize) -> Result<(), Error> {
        self.inner.mark(limit)?;
        self.marked = self.index;
        tracing::trace!(index = self.index, limit, "mark");
        Ok(())
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.inner.reset()?;
        tracing::trace!(from = self.index, to = self.marked, "reset");
        self.index = self.marked;
        Ok(())
    }
}

/// Writes only the positions `from..=to` to the inner sink.
///
/// Units outside the window are accepted and dropped. Every write advances
/// [`index`](Self::index), whether anything was forwarded or not.
#[derive(Clone, Debug)]
pub struct RangeSink<S> {
    inner: S,
    window: Window,
    index: u64,
}

impl<S> RangeSink<S> {
    #[inline]
    pub fn new(inner: S, from: u64, to: u64) -> Result<Self, Error> {
        Ok(Self::with_window(inner, Window::new(from, to)?))
    }

    #[inline]
    pub fn with_window(inner: S, window: Window) -> Self {
        Self {
            inner,
            window,
            index: 0,
        }
    }

    #[inline]
    pub fn from_index(&self) -> u64 {
        self.window.from_index()
    }

    #[inline]
    pub fn to_index(&self) -> u64 {
        self.window.to_index()
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    /// Position the next written unit will have.
    #[inline]
    pub fn index(&self) -> u64 {
        self.index
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

impl<S: Sink> Sink for RangeSink<S> {
    type Unit = S::Unit;

    fn write_one(&mut self, unit: Self::Unit) -> Result<(), Error> {
        if self.window.contains(self.index) {
            self.inner.write_one(unit)?;
        }
        self.index = self.index.saturating_add(1);
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

        // the slice covers the positions `start..=last`. forward its
        // intersection with the window.
        let start = self.index;
        let last = start.saturating_add(length as u64 - 1);
        let first_forwarded = std::cmp::max(start, self.window.from_index());
        let last_forwarded = std::cmp::min(last, self.window.to_index());

        if first_forwarded <= last_forwarded {
            let skip = (first_forwarded - start) as usize;
            let n = (last_forwarded - first_forwarded + 1) as usize;
            self.inner.write_slice(buf, offset + skip, n)?;
        }

        self.index = last.saturating_add(1);
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
