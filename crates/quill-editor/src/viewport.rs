//! Viewport: the visible window onto the buffer and the cursor inside it.
//!
//! The cursor row is relative to the first visible line; the current buffer
//! line is always `first + row`. Columns are logical (chars). The horizontal
//! offset is only touched by rendering.
//!
//! # Remembered column
//!
//! When moving vertically, the cursor remembers the column it was at. Moving
//! through a short line and then reaching a long line again snaps back to the
//! remembered column. Horizontal movement resets it to the current column.
//!
//! Movement methods take the buffer as a parameter; the viewport never owns
//! or references it.

use crate::buffer::Buffer;
use crate::position::Position;
use crate::view::cell_width;

/// Scroll and cursor state for one window of text rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// First visible buffer line.
    first: usize,
    /// `first` as of the last repaint.
    previous_first: usize,
    /// Visible text rows, at least 1.
    rows: usize,
    /// Cursor row relative to `first`.
    row: usize,
    col: usize,
    remembered: usize,
    /// First rendered column (chars).
    h_offset: usize,
}

fn line_len(buffer: &Buffer, line: usize) -> usize {
    buffer.line_len(line).unwrap_or(0)
}

fn first_non_blank(buffer: &Buffer, line: usize) -> usize {
    buffer.first_non_blank(line).unwrap_or(0)
}

fn last_line(buffer: &Buffer) -> usize {
    buffer.line_count().saturating_sub(1)
}

impl Viewport {
    #[must_use]
    pub fn new(rows: usize) -> Self {
        Self {
            first: 0,
            previous_first: 0,
            rows: rows.max(1),
            row: 0,
            col: 0,
            remembered: 0,
            h_offset: 0,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn first(&self) -> usize {
        self.first
    }

    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.col
    }

    #[inline]
    #[must_use]
    pub const fn remembered_col(&self) -> usize {
        self.remembered
    }

    #[inline]
    #[must_use]
    pub const fn h_offset(&self) -> usize {
        self.h_offset
    }

    /// The buffer line under the cursor.
    #[inline]
    #[must_use]
    pub const fn current_line(&self) -> usize {
        self.first + self.row
    }

    /// The cursor as an absolute buffer position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.current_line(), self.col)
    }

    // -- Direct updates -----------------------------------------------------

    /// Set the column without touching the remembered column.
    pub const fn set_col(&mut self, col: usize) {
        self.col = col;
    }

    /// Set the column and remember it.
    pub const fn set_col_remembered(&mut self, col: usize) {
        self.col = col;
        self.remembered = col;
    }

    pub const fn remember_col(&mut self) {
        self.remembered = self.col;
    }

    /// Change the number of visible rows. Returns `true` if it changed.
    pub fn set_rows(&mut self, rows: usize) -> bool {
        let rows = rows.max(1);
        if rows == self.rows {
            return false;
        }
        self.rows = rows;
        self.keep_row_visible();
        true
    }

    /// True once per change of `first` since the last call.
    pub const fn take_scrolled(&mut self) -> bool {
        let scrolled = self.first != self.previous_first;
        self.previous_first = self.first;
        scrolled
    }

    /// Pull the cursor back inside the buffer after lines were removed.
    pub fn clamp_to(&mut self, buffer: &Buffer) {
        let last = last_line(buffer);
        if self.first > last {
            self.first = last;
            self.row = 0;
        }
        if self.current_line() > last {
            self.row = last - self.first;
        }
        self.keep_row_visible();
    }

    fn keep_row_visible(&mut self) {
        if self.row >= self.rows {
            self.first += self.row - (self.rows - 1);
            self.row = self.rows - 1;
        }
    }

    /// Move the cursor to `line`, scrolling as little as possible.
    pub fn place(&mut self, buffer: &Buffer, line: usize) {
        let line = line.min(last_line(buffer));
        if line < self.first {
            self.first = line;
            self.row = 0;
        } else if line >= self.first + self.rows {
            self.first = line + 1 - self.rows;
            self.row = self.rows - 1;
        } else {
            self.row = line - self.first;
        }
    }

    /// One row down for a freshly opened line, scrolling on the bottom row.
    pub const fn advance_row(&mut self) {
        if self.row + 1 >= self.rows {
            self.first += 1;
        } else {
            self.row += 1;
        }
    }

    /// One row up after joining into the previous line, scrolling on the top
    /// row.
    pub const fn retreat_row(&mut self) {
        if self.row == 0 {
            self.first = self.first.saturating_sub(1);
        } else {
            self.row -= 1;
        }
    }

    // -- Columns ------------------------------------------------------------

    /// The remembered column fitted to the current line.
    #[must_use]
    pub fn adjusted_column(&self, buffer: &Buffer) -> usize {
        let len = line_len(buffer, self.current_line());
        if self.remembered >= len {
            len.saturating_sub(1)
        } else {
            self.remembered
        }
    }

    /// Jump to the first non-blank char of the current line.
    pub fn first_non_blank(&mut self, buffer: &Buffer) {
        self.set_col_remembered(first_non_blank(buffer, self.current_line()));
    }

    /// Scroll horizontally so the cursor fits in `text_cols` columns.
    /// Returns the cursor's column inside the text area.
    pub fn follow_cursor(&mut self, line: &str, text_cols: usize) -> usize {
        let limit = text_cols.saturating_sub(1);
        let widths: Vec<usize> = line.chars().map(cell_width).collect();
        let span = |from: usize, to: usize| -> usize {
            (from..to).map(|i| widths.get(i).copied().unwrap_or(1)).sum()
        };

        if self.col < self.h_offset {
            self.h_offset = self.col;
        }
        while self.h_offset < self.col && span(self.h_offset, self.col) > limit {
            self.h_offset += 1;
        }
        span(self.h_offset, self.col)
    }

    // -- Vertical jumps -----------------------------------------------------

    /// Go to `line`, keeping the window still when it is already visible.
    ///
    /// Far targets are centered; near ones scroll just enough to show them
    /// on the top or bottom row. Distances are measured in terminal lines
    /// (text rows plus the command line).
    pub fn jump_line(&mut self, buffer: &Buffer, line: usize) {
        let line = line.min(last_line(buffer));
        if line >= self.first && line < self.first + self.rows {
            self.row = line - self.first;
            return;
        }

        let screen = self.rows + 1;
        let half = screen / 2;
        if line.abs_diff(self.first + half) > screen {
            self.first = buffer
                .line_count()
                .saturating_sub(self.rows)
                .min(line.saturating_sub(half));
            self.row = line - self.first;
        } else if line < self.current_line() {
            self.first = line;
            self.row = 0;
        } else {
            self.first = line + 1 - self.rows;
            self.row = self.rows - 1;
        }
        self.keep_row_visible();
    }

    /// Scroll so `line` sits in the middle of the window.
    pub fn center_line(&mut self, buffer: &Buffer, line: usize) {
        let line = line.min(last_line(buffer));
        self.first = line.saturating_sub(self.rows / 2);
        self.row = line - self.first;
        self.keep_row_visible();
    }

    /// Ctrl-F: the bottom row becomes the top row.
    pub fn page_down(&mut self, buffer: &Buffer) {
        self.first = (self.first + self.rows - 1).min(last_line(buffer));
        if self.current_line() > last_line(buffer) {
            self.end_of_file(buffer);
        } else {
            self.col = self.adjusted_column(buffer);
        }
    }

    /// Ctrl-B: the top row becomes the bottom row.
    pub fn page_up(&mut self, buffer: &Buffer) {
        self.first = self.first.saturating_sub(self.rows - 1);
        self.col = self.adjusted_column(buffer);
    }

    /// `G`: the last line, on the bottom row when the buffer overflows the
    /// window.
    pub fn end_of_file(&mut self, buffer: &Buffer) {
        let last = last_line(buffer);
        if buffer.line_count() > self.rows {
            self.first = last + 1 - self.rows;
            self.row = self.rows - 1;
        } else {
            self.first = 0;
            self.row = last;
        }
        self.set_col_remembered(first_non_blank(buffer, last));
    }

    /// `gg`: the first line and its first non-blank char.
    pub fn first_line(&mut self, buffer: &Buffer) {
        self.first = 0;
        self.row = 0;
        self.set_col_remembered(first_non_blank(buffer, 0));
    }

    // -- Single steps -------------------------------------------------------

    pub fn move_up(&mut self, buffer: &Buffer) {
        if self.current_line() > 0 {
            if self.row > 0 {
                self.row -= 1;
            } else {
                self.first -= 1;
            }
        }
        self.col = self.adjusted_column(buffer);
    }

    pub fn move_down(&mut self, buffer: &Buffer) {
        if self.current_line() + 1 < buffer.line_count() {
            if self.row + 1 < self.rows {
                self.row += 1;
            } else {
                self.first += 1;
            }
        }
        self.col = self.adjusted_column(buffer);
    }

    pub const fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            self.remembered = self.col;
        }
    }

    /// One char right. With `past_end` the cursor may stop one past the last
    /// char.
    pub fn move_right(&mut self, buffer: &Buffer, past_end: bool) {
        let len = line_len(buffer, self.current_line());
        if self.col < len && (past_end || self.col + 1 < len) {
            self.col += 1;
            self.remembered = self.col;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbered(count: usize) -> Buffer {
        Buffer::from_lines((0..count).map(|i| format!("line {i}")))
    }

    fn at(first: usize, row: usize, rows: usize) -> Viewport {
        Viewport {
            first,
            previous_first: first,
            row,
            ..Viewport::new(rows)
        }
    }

    // ── Columns ───────────────────────────────────────────────────────────

    #[test]
    fn adjusted_column_fits_line() {
        let buf = Buffer::from_lines(["abcd", ""]);
        let mut vp = Viewport::new(10);
        vp.remembered = 10;
        assert_eq!(vp.adjusted_column(&buf), 3);
        vp.remembered = 2;
        assert_eq!(vp.adjusted_column(&buf), 2);
        vp.row = 1;
        assert_eq!(vp.adjusted_column(&buf), 0);
    }

    #[test]
    fn vertical_moves_restore_remembered_column() {
        let buf = Buffer::from_lines(["long line here", "ab", "another long one"]);
        let mut vp = Viewport::new(10);
        vp.set_col_remembered(9);
        vp.move_down(&buf);
        assert_eq!(vp.col(), 1);
        vp.move_down(&buf);
        assert_eq!(vp.col(), 9);
    }

    #[test]
    fn move_right_respects_line_end() {
        let buf = Buffer::from_lines(["abc"]);
        let mut vp = Viewport::new(10);
        for _ in 0..5 {
            vp.move_right(&buf, false);
        }
        assert_eq!(vp.col(), 2);
        vp.move_right(&buf, true);
        assert_eq!(vp.col(), 3);
        vp.move_right(&buf, true);
        assert_eq!(vp.col(), 3);
        assert_eq!(vp.remembered_col(), 3);
    }

    #[test]
    fn move_right_on_empty_line_stays() {
        let buf = Buffer::from_lines([""]);
        let mut vp = Viewport::new(10);
        vp.move_right(&buf, false);
        vp.move_right(&buf, true);
        assert_eq!(vp.col(), 0);
    }

    #[test]
    fn move_left_stops_at_zero() {
        let mut vp = Viewport::new(10);
        vp.set_col(1);
        vp.move_left();
        vp.move_left();
        assert_eq!(vp.col(), 0);
        assert_eq!(vp.remembered_col(), 0);
    }

    #[test]
    fn first_non_blank_sets_column() {
        let buf = Buffer::from_lines(["   x"]);
        let mut vp = Viewport::new(10);
        vp.first_non_blank(&buf);
        assert_eq!((vp.col(), vp.remembered_col()), (3, 3));
    }

    // ── Single steps ──────────────────────────────────────────────────────

    #[test]
    fn move_down_scrolls_at_bottom() {
        let buf = numbered(10);
        let mut vp = Viewport::new(3);
        for _ in 0..3 {
            vp.move_down(&buf);
        }
        assert_eq!((vp.first(), vp.row()), (1, 2));
        assert_eq!(vp.current_line(), 3);
    }

    #[test]
    fn move_down_stops_at_last_line() {
        let buf = numbered(2);
        let mut vp = Viewport::new(10);
        vp.move_down(&buf);
        vp.move_down(&buf);
        assert_eq!(vp.current_line(), 1);
    }

    #[test]
    fn move_up_scrolls_at_top() {
        let buf = numbered(10);
        let mut vp = at(5, 0, 3);
        vp.move_up(&buf);
        assert_eq!((vp.first(), vp.row()), (4, 0));
    }

    #[test]
    fn move_up_on_first_line_stays() {
        let buf = numbered(3);
        let mut vp = Viewport::new(3);
        vp.move_up(&buf);
        assert_eq!(vp.current_line(), 0);
    }

    // ── Jumps ─────────────────────────────────────────────────────────────

    #[test]
    fn jump_to_visible_line_keeps_window() {
        let buf = numbered(100);
        let mut vp = Viewport::new(10);
        vp.jump_line(&buf, 5);
        assert_eq!((vp.first(), vp.row()), (0, 5));
    }

    #[test]
    fn jump_far_centers() {
        let buf = numbered(100);
        let mut vp = Viewport::new(10);
        vp.jump_line(&buf, 50);
        assert_eq!((vp.first(), vp.row()), (45, 5));
    }

    #[test]
    fn jump_near_below_lands_on_bottom_row() {
        let buf = numbered(100);
        let mut vp = Viewport::new(10);
        vp.jump_line(&buf, 12);
        assert_eq!((vp.first(), vp.row()), (3, 9));
    }

    #[test]
    fn jump_near_above_lands_on_top_row() {
        let buf = numbered(100);
        let mut vp = at(20, 0, 10);
        vp.jump_line(&buf, 15);
        assert_eq!((vp.first(), vp.row()), (15, 0));
    }

    #[test]
    fn jump_past_end_clamps_to_last_line() {
        let buf = numbered(100);
        let mut vp = Viewport::new(10);
        vp.jump_line(&buf, 1000);
        assert_eq!((vp.first(), vp.row()), (90, 9));
        assert_eq!(vp.current_line(), 99);
    }

    #[test]
    fn jump_with_one_row_stays_visible() {
        let buf = numbered(100);
        let mut vp = Viewport::new(1);
        vp.jump_line(&buf, 50);
        assert_eq!(vp.current_line(), 50);
        assert_eq!(vp.row(), 0);
    }

    #[test]
    fn center_line_puts_line_mid_window() {
        let buf = numbered(100);
        let mut vp = Viewport::new(10);
        vp.center_line(&buf, 50);
        assert_eq!((vp.first(), vp.row()), (45, 5));
        vp.center_line(&buf, 2);
        assert_eq!((vp.first(), vp.row()), (0, 2));
    }

    #[test]
    fn end_of_file_long_buffer() {
        let buf = numbered(30);
        let mut vp = Viewport::new(10);
        vp.end_of_file(&buf);
        assert_eq!((vp.first(), vp.row()), (20, 9));
        assert_eq!(vp.current_line(), 29);
    }

    #[test]
    fn end_of_file_short_buffer() {
        let buf = Buffer::from_lines(["a", "b", "  c"]);
        let mut vp = Viewport::new(10);
        vp.end_of_file(&buf);
        assert_eq!((vp.first(), vp.row(), vp.col()), (0, 2, 2));
        assert_eq!(vp.remembered_col(), 2);
    }

    #[test]
    fn first_line_resets_window() {
        let buf = Buffer::from_lines(["\tx", "b"]);
        let mut vp = at(1, 0, 1);
        vp.first_line(&buf);
        assert_eq!((vp.first(), vp.row(), vp.col()), (0, 0, 1));
    }

    // ── Paging ────────────────────────────────────────────────────────────

    #[test]
    fn page_down_moves_bottom_row_to_top() {
        let buf = numbered(100);
        let mut vp = Viewport::new(10);
        vp.page_down(&buf);
        assert_eq!((vp.first(), vp.row()), (9, 0));
    }

    #[test]
    fn page_down_past_end_goes_to_end_of_file() {
        let buf = numbered(12);
        let mut vp = at(0, 5, 10);
        vp.page_down(&buf);
        assert_eq!((vp.first(), vp.row()), (2, 9));
    }

    #[test]
    fn page_up_moves_top_row_to_bottom() {
        let buf = numbered(100);
        let mut vp = at(20, 0, 10);
        vp.page_up(&buf);
        assert_eq!(vp.first(), 11);
        vp.first = 3;
        vp.page_up(&buf);
        assert_eq!(vp.first(), 0);
    }

    // ── Window bookkeeping ────────────────────────────────────────────────

    #[test]
    fn scroll_is_reported_once() {
        let buf = numbered(100);
        let mut vp = Viewport::new(10);
        assert!(!vp.take_scrolled());
        vp.page_down(&buf);
        assert!(vp.take_scrolled());
        assert!(!vp.take_scrolled());
    }

    #[test]
    fn clamp_after_lines_removed() {
        let buf = numbered(3);
        let mut vp = at(5, 2, 10);
        vp.clamp_to(&buf);
        assert_eq!((vp.first(), vp.row()), (2, 0));
        let mut vp = at(0, 7, 10);
        vp.clamp_to(&buf);
        assert_eq!(vp.current_line(), 2);
    }

    #[test]
    fn shrinking_rows_keeps_cursor_visible() {
        let mut vp = at(0, 8, 10);
        assert!(vp.set_rows(4));
        assert_eq!((vp.first(), vp.row()), (5, 3));
        assert!(!vp.set_rows(4));
    }

    #[test]
    fn place_scrolls_minimally() {
        let buf = numbered(50);
        let mut vp = at(10, 0, 5);
        vp.place(&buf, 12);
        assert_eq!((vp.first(), vp.row()), (10, 2));
        vp.place(&buf, 3);
        assert_eq!((vp.first(), vp.row()), (3, 0));
        vp.place(&buf, 20);
        assert_eq!((vp.first(), vp.row()), (16, 4));
    }

    #[test]
    fn advance_and_retreat_rows() {
        let mut vp = at(0, 1, 2);
        vp.advance_row();
        assert_eq!((vp.first(), vp.row()), (1, 1));
        vp.retreat_row();
        assert_eq!((vp.first(), vp.row()), (1, 0));
        vp.retreat_row();
        assert_eq!((vp.first(), vp.row()), (0, 0));
    }

    // ── Horizontal offset ─────────────────────────────────────────────────

    #[test]
    fn follow_cursor_scrolls_right_then_left() {
        let mut vp = Viewport::new(10);
        vp.set_col(7);
        assert_eq!(vp.follow_cursor("abcdefghij", 5), 4);
        assert_eq!(vp.h_offset(), 3);
        vp.set_col(5);
        assert_eq!(vp.follow_cursor("abcdefghij", 5), 2);
        assert_eq!(vp.h_offset(), 3);
        vp.set_col(1);
        assert_eq!(vp.follow_cursor("abcdefghij", 5), 0);
        assert_eq!(vp.h_offset(), 1);
    }

    #[test]
    fn follow_cursor_counts_wide_chars() {
        let mut vp = Viewport::new(10);
        vp.set_col(3);
        // Each CJK char is two cells wide.
        assert_eq!(vp.follow_cursor("日本語です", 5), 4);
        assert_eq!(vp.h_offset(), 1);
    }

    #[test]
    fn follow_cursor_past_line_end() {
        let mut vp = Viewport::new(10);
        vp.set_col(3);
        assert_eq!(vp.follow_cursor("abc", 80), 3);
        assert_eq!(vp.h_offset(), 0);
    }
}
