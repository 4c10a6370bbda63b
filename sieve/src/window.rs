use std::{
    fmt::Display,
    ops::RangeInclusive,
    str::FromStr,
};

use crate::Error;

/// Inclusive range of positions `[from, to]` a range decorator lets
/// through.
///
/// A `Window` always satisfies `from <= to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawWindow", into = "RawWindow"))]
pub struct Window {
    from: u64,
    to: u64,
}

impl Window {
    /// The window covering every position.
    pub const ALL: Self = Self {
        from: 0,
        to: u64::MAX,
    };

    #[inline]
    pub fn new(from: u64, to: u64) -> Result<Self, Error> {
        if to < from {
            Err(Error::InvalidWindow { from, to })
        }
        else {
            Ok(Self { from, to })
        }
    }

    /// Window of exactly one position.
    #[inline]
    pub fn single(position: u64) -> Self {
        Self {
            from: position,
            to: position,
        }
    }

    #[inline]
    pub fn from_index(&self) -> u64 {
        self.from
    }

    #[inline]
    pub fn to_index(&self) -> u64 {
        self.to
    }

    #[inline]
    pub fn contains(&self, position: u64) -> bool {
        self.from <= position && position <= self.to
    }

    /// Number of positions from `position` up to and including `to`.
    ///
    /// Saturates for the window ending at `u64::MAX`.
    #[inline]
    pub fn remaining_from(&self, position: u64) -> u64 {
        if position > self.to {
            0
        }
        else {
            (self.to - position).saturating_add(1)
        }
    }
}

impl Default for Window {
    #[inline]
    fn default() -> Self {
        Self::ALL
    }
}

impl TryFrom<RangeInclusive<u64>> for Window {
    type Error = Error;

    #[inline]
    fn try_from(value: RangeInclusive<u64>) -> Result<Self, Self::Error> {
        Self::new(*value.start(), *value.end())
    }
}

impl From<Window> for RangeInclusive<u64> {
    #[inline]
    fn from(value: Window) -> Self {
        value.from..=value.to
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.from, self.to)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseWindowError {
    #[error("Expected a window of the form `from..=to`: {0:?}")]
    Syntax(String),

    #[error("Invalid position")]
    Position(#[from] std::num::ParseIntError),

    #[error(transparent)]
    Invalid(#[from] Error),
}

impl FromStr for Window {
    type Err = ParseWindowError;

    /// Parses `from..=to`, `from..=` (open end) and a single `position`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((from, to)) = s.split_once("..=") {
            let from = if from.is_empty() { 0 } else { from.trim().parse()? };
            let to = if to.is_empty() {
                u64::MAX
            }
            else {
                to.trim().parse()?
            };
            Ok(Self::new(from, to)?)
        }
        else if s.contains("..") {
            Err(ParseWindowError::Syntax(s.to_owned()))
        }
        else {
            Ok(Self::single(s.parse()?))
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawWindow {
    #[serde(default)]
    from: u64,
    #[serde(default = "default_to")]
    to: u64,
}

#[cfg(feature = "serde")]
fn default_to() -> u64 {
    u64::MAX
}

#[cfg(feature = "serde")]
impl TryFrom<RawWindow> for Window {
    type Error = Error;

    fn try_from(value: RawWindow) -> Result<Self, Self::Error> {
        Self::new(value.from, value.to)
    }
}

#[cfg(feature = "serde")]
impl From<Window> for RawWindow {
    fn from(value: Window) -> Self {
        Self {
            from: value.from,
            to: value.to,
        }
    }
}
