//! Counting and windowing decorators for sequential byte and char streams.
//!
//! A [`Source`] is something units (bytes or chars) are read from, a
//! [`Sink`] is something they are written to. The decorators in this crate
//! wrap one of them and implement the same trait again, so they stack in any
//! order:
//!
//! - [`CountSource`] and [`CountSink`] count the units passing through.
//! - [`RangeSource`] and [`RangeSink`] only let through the units at
//!   positions inside a [`Window`].
//!
//! ```
//! use sieve::{
//!     Cursor,
//!     SourceExt,
//! };
//!
//! let mut source = Cursor::new(&b"hello world"[..]).range(6, 10)?.counted();
//! assert_eq!(source.read_to_vec()?, b"world");
//! assert_eq!(source.count(), 5);
//! # Ok::<(), sieve::Error>(())
//! ```

mod copy;
pub mod count;
mod cursor;
pub mod endpoint;
mod error;
pub mod range;
pub mod std_io;
#[cfg(test)]
mod testing;
mod window;

pub use self::{
    copy::copy,
    count::{
        CountSink,
        CountSource,
    },
    cursor::Cursor,
    endpoint::{
        Mark,
        Sink,
        SinkExt,
        Source,
        SourceExt,
    },
    error::{
        Error,
        OutOfBounds,
    },
    range::{
        RangeSink,
        RangeSource,
    },
    std_io::{
        IoSink,
        IoSource,
        StdRead,
        StdWrite,
        Utf8Sink,
        Utf8Source,
    },
    window::{
        ParseWindowError,
        Window,
    },
};
