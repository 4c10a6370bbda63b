use std::ops::Deref;

use crate::{
    endpoint::{
        check_bounds,
        Mark,
        Source,
    },
    Error,
};

/// A source that reads units from an in-memory buffer.
///
/// Works for anything that derefs to a slice of units, e.g. `&[u8]`,
/// `Vec<u8>` or `Vec<char>`. Supports [`Mark`]: a reset without a prior
/// mark rewinds to the start.
#[derive(Clone, Debug)]
pub struct Cursor<B> {
    buf: B,
    offset: usize,
    marked: usize,
}

impl<B> Cursor<B> {
    #[inline]
    pub fn new(buf: B) -> Self {
        Self::with_offset(buf, 0)
    }

    #[inline]
    pub fn with_offset(buf: B, offset: usize) -> Self {
        Self {
            buf,
            offset,
            marked: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn into_inner(self) -> B {
        self.buf
    }
}

impl Cursor<Vec<char>> {
    /// Creates a char cursor over the characters of `s`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        Self::new(s.chars().collect())
    }
}

impl<B: Deref<Target = [U]>, U> Cursor<B> {
    #[inline]
    fn rest(&self) -> &[U] {
        let buf = &*self.buf;
        &buf[self.offset.min(buf.len())..]
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.rest().len()
    }
}

impl<B: Deref<Target = [U]>, U: Copy> Source for Cursor<B> {
    type Unit = U;

    #[inline]
    fn read_one(&mut self) -> Result<Option<U>, Error> {
        let unit = self.rest().first().copied();
        if unit.is_some() {
            self.offset += 1;
        }
        Ok(unit)
    }

    fn read_into(
        &mut self,
        buf: &mut [U],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>, Error> {
        check_bounds(buf.len(), offset, length)?;
        if length == 0 {
            return Ok(Some(0));
        }

        let rest = self.rest();
        if rest.is_empty() {
            return Ok(None);
        }

        let n = std::cmp::min(length, rest.len());
        buf[offset..offset + n].copy_from_slice(&rest[..n]);
        self.offset += n;
        Ok(Some(n))
    }

    #[inline]
    fn skip(&mut self, n: u64) -> Result<u64, Error> {
        let n = usize::try_from(n).unwrap_or(usize::MAX).min(self.remaining());
        self.offset += n;
        Ok(n as u64)
    }
}

impl<B: Deref<Target = [U]>, U: Copy> Mark for Cursor<B> {
    #[inline]
    fn mark(&mut self, _limit: usize) -> Result<(), Error> {
        self.marked = self.offset;
        Ok(())
    }

    #[inline]
    fn reset(&mut self) -> Result<(), Error> {
        self.offset = self.marked;
        Ok(())
    }
}

impl<B> AsRef<B> for Cursor<B> {
    #[inline]
    fn as_ref(&self) -> &B {
        &self.buf
    }
}

impl<B> From<B> for Cursor<B> {
    #[inline]
    fn from(value: B) -> Self {
        Self::new(value)
    }
}
