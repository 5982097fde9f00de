//! Visual selections.
//!
//! A [`Selection`] is normalized: `start` is never after `end`, whichever
//! endpoint the cursor is on. `end.col` is exclusive, so a line-wise
//! selection of an empty line selects nothing on it but still covers the
//! line.

use crate::buffer::{Buffer, BufferError, Result};
use crate::mode::VisualKind;
use crate::position::Position;

/// A normalized selection in absolute buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: Position,
    /// One past the last selected column on `end.line`.
    pub end: Position,
}

impl Selection {
    /// The selection between the visual `anchor` and the `cursor`.
    ///
    /// On one line the columns are ordered. Across lines the earlier line's
    /// endpoint starts the selection. Line-wise selections run from column 0
    /// of the first line to the end of the last.
    #[must_use]
    pub fn new(anchor: Position, cursor: Position, kind: VisualKind, buffer: &Buffer) -> Self {
        let (mut start, mut end) = if anchor.line == cursor.line {
            (
                Position::new(anchor.line, anchor.col.min(cursor.col)),
                Position::new(anchor.line, anchor.col.max(cursor.col)),
            )
        } else if cursor.line < anchor.line {
            (cursor, anchor)
        } else {
            (anchor, cursor)
        };

        match kind {
            VisualKind::Char => end.col += 1,
            VisualKind::Line => {
                start.col = 0;
                end.col = buffer.line_len(end.line).unwrap_or(0);
            }
        }
        Self { start, end }
    }

    #[must_use]
    pub const fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// True if the cell at (`line`, `col`) is selected.
    #[must_use]
    pub const fn contains(&self, line: usize, col: usize) -> bool {
        if line < self.start.line || line > self.end.line {
            return false;
        }
        if self.is_single_line() {
            return col >= self.start.col && col < self.end.col;
        }
        if line == self.start.line {
            col >= self.start.col
        } else if line == self.end.line {
            col < self.end.col
        } else {
            true
        }
    }

    /// Delete the selected text and return where the cursor lands.
    ///
    /// Across lines, the head of the first line and the tail of the last line
    /// are joined on the first line and every line after it is removed. The
    /// first line stays even when the join leaves it empty, unless the
    /// selection spanned the whole buffer: then the buffer is cleared and
    /// flagged as originated empty, as if every line had been removed.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfRange`] if the selection reaches past the buffer.
    /// The buffer is left untouched.
    pub fn delete(&self, buffer: &mut Buffer) -> Result<Position> {
        let Self { start, end } = *self;
        if end.line >= buffer.line_count() {
            return Err(BufferError::OutOfRange { row: end.line });
        }

        let covers_buffer = start.line == 0 && end.line + 1 == buffer.line_count();
        let start_len = buffer.line_len(start.line)?;
        let from = start.col.min(start_len);
        if self.is_single_line() {
            buffer.erase(start.line, from, end.col.saturating_sub(from))?;
        } else {
            let tail: String = buffer
                .line(end.line)
                .map(|line| line.chars().skip(end.col).collect())
                .unwrap_or_default();
            buffer.erase(start.line, from, start_len)?;
            buffer.append_to_line(start.line, &tail)?;
            for line in (start.line + 1..=end.line).rev() {
                buffer.remove_line(line)?;
            }
        }
        if covers_buffer && buffer.line_count() == 1 && buffer.line_len(0)? == 0 {
            buffer.clear();
        }

        let line = start.line.min(buffer.line_count().saturating_sub(1));
        let len = buffer.line_len(line)?;
        Ok(Position::new(line, start.col.min(len.saturating_sub(1))))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
