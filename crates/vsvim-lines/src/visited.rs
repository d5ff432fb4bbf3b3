#![forbid(unsafe_code)]

//! Tracking of already-visited line ranges.
//!
//! [`VisitedLineRanges`] records which lines a caller has processed (for
//! example while computing outlining regions incrementally) and answers the
//! question "what part of this range still needs work?".
//!
//! # Invariants
//!
//! 1. Stored ranges are sorted ascending by start.
//! 2. No two stored ranges intersect; intersecting input is merged on `add`.
//! 3. Touching ranges (`[1-5]`, `[6-9]`) stay separate entries.
//!
//! ```text
//! add([4-10])
//! before: [1-5] [12-14]
//! after:  [1-10] [12-14]
//! ```

use crate::range::LineRange;

/// Normalized set of visited line ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedLineRanges {
    ranges: Vec<LineRange>,
}

impl VisitedLineRanges {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `range` as visited, merging it with any stored range it intersects.
    pub fn add(&mut self, range: LineRange) {
        self.ranges.push(range);
        self.ranges.sort_unstable_by_key(|r| r.start());

        let mut merged: Vec<LineRange> = Vec::with_capacity(self.ranges.len());
        for next in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(last) if last.intersects(next) => {
                    *last = LineRange::overarching(*last, next);
                }
                _ => merged.push(next),
            }
        }
        self.ranges = merged;

        tracing::trace!(%range, entries = self.ranges.len(), "visited range added");
    }

    /// Whether a single stored range fully contains `range`.
    ///
    /// Coverage by the union of several stored ranges does not count.
    #[must_use]
    pub fn contains(&self, range: LineRange) -> bool {
        self.ranges.iter().any(|r| r.contains(range))
    }

    /// Whether `line` is inside any stored range.
    #[must_use]
    pub fn contains_line(&self, line: usize) -> bool {
        self.ranges.iter().any(|r| r.contains_line(line))
    }

    /// The part of `range` that has not been visited yet.
    ///
    /// Only the first stored range (in ascending order) that intersects
    /// `range` is taken into account:
    ///
    /// - it contains `range`: `None`
    /// - it starts at or before `range`: the lines after it
    /// - it starts inside `range`: the lines before it
    ///
    /// With no intersecting range the whole of `range` is returned.
    #[must_use]
    pub fn unvisited(&self, range: LineRange) -> Option<LineRange> {
        let Some(found) = self.ranges.iter().find(|r| r.intersects(range)) else {
            return Some(range);
        };

        if found.contains(range) {
            None
        } else if found.start() <= range.start() {
            // found.end() < range.end() here, so the successor line exists.
            Some(LineRange::new(found.end() + 1, range.end()))
        } else {
            Some(LineRange::new(range.start(), found.start() - 1))
        }
    }

    /// Forget every visited range.
    pub fn clear(&mut self) {
        self.ranges.clear();
        tracing::trace!("visited ranges cleared");
    }

    /// Bounding range of everything visited, gaps included.
    #[must_use]
    pub fn bounds(&self) -> Option<LineRange> {
        match self.ranges.as_slice() {
            [] => None,
            [only] => Some(*only),
            [first, .., last] => Some(LineRange::new(first.start(), last.end())),
        }
    }

    /// Stored ranges in ascending order.
    #[must_use]
    pub fn ranges(&self) -> &[LineRange] {
        &self.ranges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl Extend<LineRange> for VisitedLineRanges {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = LineRange>,
    {
        for range in iter {
            self.add(range);
        }
    }
}

impl FromIterator<LineRange> for VisitedLineRanges {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = LineRange>,
    {
        let mut visited = Self::new();
        visited.extend(iter);
        visited
    }
}
