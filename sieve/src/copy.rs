use crate::{
    endpoint::{
        Sink,
        Source,
    },
    Error,
};

/// Copies everything from `source` to `sink`, using `buf` as intermediate
/// buffer. Returns the number of units copied.
///
/// # Panics
///
/// Panics if `buf` is empty.
pub fn copy<S, K>(source: &mut S, sink: &mut K, buf: &mut [S::Unit]) -> Result<u64, Error>
where
    S: Source + ?Sized,
    K: Sink<Unit = S::Unit> + ?Sized,
{
    assert!(!buf.is_empty(), "copy with empty buffer");

    let length = buf.len();
    let mut total_copied = 0;
    while let Some(n_read) = source.read_into(buf, 0, length)? {
        sink.write_slice(buf, 0, n_read)?;
        total_copied += n_read as u64;
    }
    Ok(total_copied)
}
