/// Errors produced by endpoints and decorators.
///
/// Decorators never wrap errors coming from the endpoint they decorate:
/// whatever the inner endpoint returns is passed up as is.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid window: to ({to}) must not be less than from ({from})")]
    InvalidWindow { from: u64, to: u64 },

    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    #[error("Reset without a prior mark")]
    NoMark,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    #[inline]
    pub fn custom(error: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Custom(error.into())
    }
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Io(e) => e,
            Error::InvalidWindow { .. } | Error::OutOfBounds(_) => {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, value)
            }
            Error::NoMark => std::io::Error::new(std::io::ErrorKind::Unsupported, value),
            Error::Custom(e) => std::io::Error::other(e),
        }
    }
}

/// `offset` and `length` don't describe a region inside a buffer of length
/// `len`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Index out of bounds: {offset}+{length} not in buffer (0..{len})")]
pub struct OutOfBounds {
    pub offset: usize,
    pub length: usize,
    pub len: usize,
}
