#![forbid(unsafe_code)]

//! Line ranges and visited-region tracking.
//!
//! - [`LineRange`]: inclusive `[start, end]` span of line numbers
//! - [`VisitedLineRanges`]: normalized set of ranges already processed,
//!   used to ask which part of a query range still needs scanning
//!
//! ```
//! use vsvim_lines::{LineRange, VisitedLineRanges};
//!
//! let mut visited = VisitedLineRanges::new();
//! visited.add(LineRange::new(5, 10));
//! assert_eq!(visited.unvisited(LineRange::new(1, 7)), Some(LineRange::new(1, 4)));
//! assert_eq!(visited.unvisited(LineRange::new(6, 9)), None);
//! ```
//!
//! # Concurrency
//!
//! No internal locking. A tracker belongs to one owner; share it across
//! threads only behind the caller's own synchronization.

pub mod range;
pub mod visited;

pub use range::LineRange;
pub use visited::VisitedLineRanges;

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn add_is_traced() {
        let mut visited = VisitedLineRanges::new();
        visited.add(LineRange::new(2, 3));
        assert!(logs_contain("visited range added"));
        visited.clear();
        assert!(logs_contain("visited ranges cleared"));
    }
}
