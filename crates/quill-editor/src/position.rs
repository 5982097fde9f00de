//! Text positions.
//!
//! All coordinates are **0-indexed**. Line 0 is the first line of the buffer,
//! column 0 is the first character. Columns count chars, not bytes.
//!
//! A `Position` is always absolute (a buffer line). The viewport keeps its
//! cursor relative to the first visible line and converts on demand.

use std::fmt;

/// A position in a text buffer: (line, column), both 0-indexed.
///
/// # Ordering
///
/// Positions are ordered lexicographically: line first, then column, so
/// `Position { line: 0, col: 5 }` < `Position { line: 1, col: 0 }`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The origin: line 0, column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line.cmp(&other.line).then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for humans.
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_default() {
        assert_eq!(Position::ZERO, Position::default());
        assert_eq!(Position::new(0, 0), Position::ZERO);
    }

    #[test]
    fn ordering_same_line_uses_column() {
        assert!(Position::new(3, 1) < Position::new(3, 7));
    }

    #[test]
    fn ordering_line_dominates_column() {
        assert!(Position::new(0, 99) < Position::new(1, 0));
        assert_eq!(
            Position::new(2, 4).max(Position::new(1, 50)),
            Position::new(2, 4)
        );
    }

    #[test]
    fn debug_is_zero_indexed() {
        assert_eq!(format!("{:?}", Position::new(4, 2)), "Pos(4:2)");
    }

    #[test]
    fn display_is_one_indexed() {
        assert_eq!(Position::new(4, 2).to_string(), "5:3");
    }
}
