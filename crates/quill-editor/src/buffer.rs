//! Text buffer: an ordered list of lines.
//!
//! A `Buffer` wraps a [`ropey::Rope`] holding the lines joined by `\n`, with
//! no trailing newline. Line `i` of the buffer is line `i` of the rope minus
//! its terminator, so a buffer always has at least one line and a single empty
//! line is the empty rope.
//!
//! ropey is built without `unicode_lines`, so only `\n` splits lines. A `\r`
//! read from a CRLF file stays in the line as an ordinary character and is
//! written back unchanged.
//!
//! # Originated empty
//!
//! An empty file loads as one empty line, but saving it untouched must write
//! zero bytes, not a lone newline. The buffer remembers that it started (or
//! was reduced back to) nothing, and [`to_lines`](Buffer::to_lines) reports an
//! empty list while that holds.
//!
//! Every mutator validates its row and column first and returns
//! [`BufferError`] without touching the text when they are out of range.

use std::iter;

use ropey::{Rope, RopeSlice};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An out-of-range buffer access. The buffer is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("line {row} is out of range")]
    OutOfRange { row: usize },
    #[error("column {col} is past the end of line {row}")]
    ColumnOutOfRange { row: usize, col: usize },
}

pub type Result<T> = std::result::Result<T, BufferError>;

/// Whitespace skipped by [`Buffer::first_non_blank`].
const BLANKS: [char; 4] = [' ', '\t', '\r', '\n'];

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Buffer {
    rope: Rope,
    originated_empty: bool,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// An empty buffer: one empty line, flagged as originated empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            originated_empty: true,
        }
    }

    /// A buffer holding `lines`. No lines at all gives [`Buffer::new`].
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        let mut any = false;
        for line in lines {
            if any {
                text.push('\n');
            }
            text.push_str(line.as_ref());
            any = true;
        }

        Self {
            rope: Rope::from_str(&text),
            originated_empty: !any,
        }
    }

    // -- Text access --------------------------------------------------------

    /// Number of lines, never zero.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line `row` without its terminator.
    #[must_use]
    pub fn line(&self, row: usize) -> Option<RopeSlice<'_>> {
        if row >= self.line_count() {
            return None;
        }
        let line = self.rope.line(row);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            Some(line.slice(..len - 1))
        } else {
            Some(line)
        }
    }

    /// Line `row` as an owned string.
    #[must_use]
    pub fn line_text(&self, row: usize) -> Option<String> {
        self.line(row).map(|line| line.to_string())
    }

    /// Length of line `row` in chars.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfRange`] if `row` is not a line.
    pub fn line_len(&self, row: usize) -> Result<usize> {
        self.line(row)
            .map(|line| line.len_chars())
            .ok_or(BufferError::OutOfRange { row })
    }

    /// Index of the first char of line `row` that is not a space, tab, CR or
    /// LF. A blank line gives its length.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfRange`] if `row` is not a line.
    pub fn first_non_blank(&self, row: usize) -> Result<usize> {
        let line = self.line(row).ok_or(BufferError::OutOfRange { row })?;
        Ok(line
            .chars()
            .position(|c| !BLANKS.contains(&c))
            .unwrap_or_else(|| line.len_chars()))
    }

    /// Every line, in order.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.line_count()).filter_map(|row| self.line_text(row))
    }

    /// The lines to persist: nothing at all for an untouched empty buffer.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        if self.is_originated_empty() {
            Vec::new()
        } else {
            self.lines().collect()
        }
    }

    /// Whether the buffer is one empty line that never held anything since it
    /// was created or last emptied.
    #[must_use]
    pub fn is_originated_empty(&self) -> bool {
        self.originated_empty && self.rope.len_chars() == 0
    }

    // -- Editing ------------------------------------------------------------

    /// Replace line `row` with `text`.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfRange`] if `row` is not a line.
    pub fn set_line(&mut self, row: usize, text: &str) -> Result<()> {
        debug_assert!(!text.contains('\n'), "lines never contain newlines");
        let len = self.line_len(row)?;
        let start = self.rope.line_to_char(row);
        self.rope.remove(start..start + len);
        self.rope.insert(start, text);
        self.touch();
        Ok(())
    }

    /// Add `text` as a new last line.
    pub fn push_line(&mut self, text: &str) {
        debug_assert!(!text.contains('\n'), "lines never contain newlines");
        let end = self.rope.len_chars();
        self.rope.insert_char(end, '\n');
        self.rope.insert(end + 1, text);
        self.touch();
    }

    /// Insert `text` as line `row`, shifting later lines down. `row` may be
    /// one past the last line to append.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfRange`] if `row > line_count()`.
    pub fn insert_line(&mut self, row: usize, text: &str) -> Result<()> {
        debug_assert!(!text.contains('\n'), "lines never contain newlines");
        let count = self.line_count();
        if row == count {
            self.push_line(text);
            return Ok(());
        }
        if row > count {
            return Err(BufferError::OutOfRange { row });
        }

        let start = self.rope.line_to_char(row);
        self.rope.insert_char(start, '\n');
        self.rope.insert(start, text);
        self.touch();
        Ok(())
    }

    /// Append `text` to the end of line `row`.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfRange`] if `row` is not a line.
    pub fn append_to_line(&mut self, row: usize, text: &str) -> Result<()> {
        debug_assert!(!text.contains('\n'), "lines never contain newlines");
        let len = self.line_len(row)?;
        let at = self.rope.line_to_char(row) + len;
        self.rope.insert(at, text);
        self.touch();
        Ok(())
    }

    /// Delete line `row`, shifting later lines up.
    ///
    /// Removing the only line leaves one empty line flagged as originated
    /// empty.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfRange`] if `row` is not a line.
    pub fn remove_line(&mut self, row: usize) -> Result<()> {
        let count = self.line_count();
        if row >= count {
            return Err(BufferError::OutOfRange { row });
        }

        if count == 1 {
            self.clear();
            return Ok(());
        }

        let start = self.rope.line_to_char(row);
        if row + 1 == count {
            // Last line: take the newline that ends the previous one.
            let end = self.rope.len_chars();
            self.rope.remove(start - 1..end);
        } else {
            let next = self.rope.line_to_char(row + 1);
            self.rope.remove(start..next);
        }
        Ok(())
    }

    /// Drop every line, leaving one empty line flagged as originated empty.
    pub fn clear(&mut self) {
        self.rope = Rope::new();
        self.originated_empty = true;
    }

    /// Erase up to `len` chars of line `row` starting at `col`. The count is
    /// clamped to the end of the line.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfRange`] if `row` is not a line,
    /// [`BufferError::ColumnOutOfRange`] if `col` is past the line end.
    pub fn erase(&mut self, row: usize, col: usize, len: usize) -> Result<()> {
        let line_len = self.line_len(row)?;
        if col > line_len {
            return Err(BufferError::ColumnOutOfRange { row, col });
        }

        let count = len.min(line_len - col);
        if count > 0 {
            let start = self.rope.line_to_char(row) + col;
            self.rope.remove(start..start + count);
        }
        Ok(())
    }

    /// Insert `count` copies of `ch` into line `row` at `col`.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfRange`] if `row` is not a line,
    /// [`BufferError::ColumnOutOfRange`] if `col` is past the line end.
    pub fn insert_fill(&mut self, row: usize, col: usize, count: usize, ch: char) -> Result<()> {
        debug_assert!(ch != '\n', "lines never contain newlines");
        let line_len = self.line_len(row)?;
        if col > line_len {
            return Err(BufferError::ColumnOutOfRange { row, col });
        }

        let fill: String = iter::repeat_n(ch, count).collect();
        let at = self.rope.line_to_char(row) + col;
        self.rope.insert(at, &fill);
        self.touch();
        Ok(())
    }

    /// Any text written clears the originated-empty flag for good.
    fn touch(&mut self) {
        if self.rope.len_chars() > 0 {
            self.originated_empty = false;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
