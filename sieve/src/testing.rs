//! Endpoints for tests.

use std::marker::PhantomData;

use crate::{
    endpoint::{
        Mark,
        Sink,
        Source,
    },
    Error,
};

/// Records how often the wrapped endpoint is reached.
#[derive(Debug)]
pub struct Probe<S> {
    inner: S,
    calls: usize,
    flushes: usize,
    closes: usize,
    requested: Vec<usize>,
}

impl<S> Probe<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: 0,
            flushes: 0,
            closes: 0,
            requested: vec![],
        }
    }

    /// Number of reads, skips, marks, resets and writes.
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn closes(&self) -> usize {
        self.closes
    }

    /// `length` of every bulk read or write, in order.
    pub fn requested(&self) -> &[usize] {
        &self.requested
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Source> Source for Probe<S> {
    type Unit = S::Unit;

    fn read_one(&mut self) -> Result<Option<Self::Unit>, Error> {
        self.calls += 1;
        self.inner.read_one()
    }

    fn read_into(
        &mut self,
        buf: &mut [Self::Unit],
        offset: usize,
        length: usize,
    ) -> Result<Option<usize>, Error> {
        self.calls += 1;
        self.requested.push(length);
        self.inner.read_into(buf, offset, length)
    }

    fn skip(&mut self, n: u64) -> Result<u64, Error> {
        self.calls += 1;
        self.inner.skip(n)
    }

    fn close(&mut self) -> Result<(), Error> {
        self.closes += 1;
        self.inner.close()
    }
}

impl<S: Mark> Mark for Probe<S> {
    fn mark(&mut self, limit: usize) -> Result<(), Error> {
        self.calls += 1;
        self.inner.mark(limit)
    }

    fn reset(&mut self) -> Result<(), Error> {
        self.calls += 1;
        self.inner.reset()
    }
}

impl<S: Sink> Sink for Probe<S> {
    type Unit = S::Unit;

    fn write_one(&mut self, unit: Self::Unit) -> Result<(), Error> {
        self.calls += 1;
        self.inner.write_one(unit)
    }

    fn write_slice(
        &mut self,
        buf: &[Self::Unit],
        offset: usize,
        length: usize,
    ) -> Result<(), Error> {
        self.calls += 1;
        self.requested.push(length);
        self.inner.write_slice(buf, offset, length)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.flushes += 1;
        self.inner.flush()
    }

    fn close(&mut self) -> Result<(), Error> {
        self.closes += 1;
        self.inner.close()
    }
}

/// An endpoint that fails every operation with a broken pipe.
#[derive(Debug)]
pub struct Broken<U> {
    _unit: PhantomData<U>,
}

impl<U> Default for Broken<U> {
    fn default() -> Self {
        Self { _unit: PhantomData }
    }
}

fn broken() -> Error {
    std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken").into()
}

impl<U: Copy> Source for Broken<U> {
    type Unit = U;

    fn read_one(&mut self) -> Result<Option<U>, Error> {
        Err(broken())
    }

    fn read_into(
        &mut self,
        _buf: &mut [U],
        _offset: usize,
        _length: usize,
    ) -> Result<Option<usize>, Error> {
        Err(broken())
    }

    fn skip(&mut self, _n: u64) -> Result<u64, Error> {
        Err(broken())
    }
}

impl<U: Copy> Mark for Broken<U> {
    fn mark(&mut self, _limit: usize) -> Result<(), Error> {
        Err(broken())
    }

    fn reset(&mut self) -> Result<(), Error> {
        Err(broken())
    }
}

impl<U: Copy> Sink for Broken<U> {
    type Unit = U;

    fn write_one(&mut self, _unit: U) -> Result<(), Error> {
        Err(broken())
    }

    fn write_slice(&mut self, _buf: &[U], _offset: usize, _length: usize) -> Result<(), Error> {
        Err(broken())
    }
}
