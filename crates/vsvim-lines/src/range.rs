#![forbid(unsafe_code)]

//! Closed line ranges.
//!
//! A [`LineRange`] is the inclusive span `[start, end]` of line numbers.
//! Single-line ranges (`start == end`) are valid; empty ranges are not
//! representable.

use std::fmt;

/// Inclusive range of line numbers: `[start, end]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineRange {
    start: usize,
    end: usize,
}

impl LineRange {
    /// Create a range covering `start..=end`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "line range start {start} is past end {end}");
        Self { start, end }
    }

    /// Create a range covering `start..=end`, or `None` if `start > end`.
    #[must_use]
    pub fn try_new(start: usize, end: usize) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Create a range of `count` lines beginning at `start`.
    ///
    /// Returns `None` for `count == 0` or if the last line overflows.
    #[must_use]
    pub fn from_count(start: usize, count: usize) -> Option<Self> {
        let end = start.checked_add(count.checked_sub(1)?)?;
        Some(Self { start, end })
    }

    /// Range containing exactly one line.
    #[must_use]
    pub const fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    /// First line of the range.
    #[must_use]
    pub const fn start(self) -> usize {
        self.start
    }

    /// Last line of the range (inclusive).
    #[must_use]
    pub const fn end(self) -> usize {
        self.end
    }

    /// Number of lines covered. Never zero (saturates for `[0-usize::MAX]`).
    #[must_use]
    pub const fn count(self) -> usize {
        (self.end - self.start).saturating_add(1)
    }

    #[must_use]
    pub const fn contains_line(self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }

    /// Whether the two ranges share at least one line.
    ///
    /// Ranges that merely touch (`a.end + 1 == b.start`) do not intersect.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Whether `other` lies entirely inside `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest range covering both `a` and `b`, including any gap between them.
    #[must_use]
    pub fn overarching(a: Self, b: Self) -> Self {
        Self {
            start: a.start.min(b.start),
            end: a.end.max(b.end),
        }
    }
}

impl fmt::Debug for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.start, self.end)
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<(usize, usize)> for LineRange {
    /// # Panics
    ///
    /// Panics if the tuple is not ordered.
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}
