//! View: drawing the buffer and the bottom line onto a [`Surface`].
//!
//! The screen is split into text rows and one command-line row:
//!
//! ```text
//! ┌────────────────────────────┐
//! │  1 fn main() {             │  text rows: gutter + clipped line
//! │  2     println!("hi");     │
//! │  3 }                       │
//! │                            │  rows past the buffer are cleared
//! │ -- INSERT --               │  command line / status row
//! └────────────────────────────┘
//! ```
//!
//! Rendering never mutates editor state; the editor computes the cursor and
//! the horizontal offset first and hands everything over in a [`Frame`].

use std::io;

use unicode_width::UnicodeWidthChar;

use quill_term::surface::Surface;
use quill_theme::{ColorBackground, ColorForeground, pair_index};

use crate::buffer::Buffer;
use crate::position::Position;
use crate::selection::Selection;
use crate::viewport::Viewport;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Gutter width for line numbers.
///
/// Room for the digits of `line_count + 1`, a leading pad column and a
/// separator space:
///
/// | Lines   | Gutter |
/// |---------|--------|
/// | 1–8     | 3      |
/// | 9–98    | 4      |
/// | 99–998  | 5      |
///
/// Returns 0 when `show_numbers` is false.
#[must_use]
pub fn gutter_width(line_count: usize, show_numbers: bool) -> usize {
    if !show_numbers {
        return 0;
    }
    let digits = (line_count + 1).ilog10() as usize + 1;
    digits + 2
}

/// Terminal cells taken by `ch`. Tabs draw as one cell; zero-width and
/// control chars still take one so every char stays addressable.
#[must_use]
pub fn cell_width(ch: char) -> usize {
    if ch == '\t' {
        return 1;
    }
    ch.width().unwrap_or(1).max(1)
}

// ---------------------------------------------------------------------------
// Pen
// ---------------------------------------------------------------------------

/// Pair used for ordinary text.
pub const TEXT_PAIR: u8 = pair_index(ColorForeground::Default, ColorBackground::Default);
/// Pair for selected cells and tabs.
pub const ACCENT_PAIR: u8 = pair_index(ColorForeground::Default, ColorBackground::Accent);
/// Pair for error messages.
pub const ERROR_PAIR: u8 = pair_index(ColorForeground::Color1, ColorBackground::Default);

/// Applies color pairs, or does nothing when colors are off.
///
/// Colors are on only when the surface supports them and a colorscheme is
/// active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    enabled: bool,
}

impl Pen {
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.enabled
    }

    /// Run `draw` with `pair` switched on.
    ///
    /// # Errors
    ///
    /// Propagates surface errors.
    pub fn paint<S, F>(self, surface: &mut S, pair: u8, draw: F) -> io::Result<()>
    where
        S: Surface + ?Sized,
        F: FnOnce(&mut S) -> io::Result<()>,
    {
        if self.enabled {
            surface.attribute_on(pair)?;
        }
        let result = draw(surface);
        if self.enabled {
            surface.attribute_off(pair)?;
        }
        result
    }

    /// Switch from pair `from` to pair `to`.
    ///
    /// # Errors
    ///
    /// Propagates surface errors.
    pub fn swap<S: Surface + ?Sized>(self, surface: &mut S, from: u8, to: u8) -> io::Result<()> {
        if self.enabled {
            surface.attribute_off(from)?;
            surface.attribute_on(to)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StatusLine
// ---------------------------------------------------------------------------

/// A message or error on the bottom row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    text: String,
    is_error: bool,
}

impl StatusLine {
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    /// The text without the error prefix.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.is_error
    }

    /// What the bottom row shows.
    #[must_use]
    pub fn rendered(&self) -> String {
        if self.is_error {
            format!("ERROR: {}", self.text)
        } else {
            self.text.clone()
        }
    }

    const fn pair(&self) -> u8 {
        if self.is_error { ERROR_PAIR } else { TEXT_PAIR }
    }
}

/// What the bottom row should show this frame.
#[derive(Debug, Clone, Copy)]
pub enum BottomLine<'a> {
    /// Command mode: `:` and the typed text.
    Command(&'a str),
    Status(&'a StatusLine),
    Blank,
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// Everything needed to draw the text rows.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub buffer: &'a Buffer,
    pub viewport: &'a Viewport,
    pub gutter: usize,
    pub columns: usize,
    pub selection: Option<Selection>,
    /// Absolute cursor position; its cell is never highlighted.
    pub cursor: Position,
    pub pen: Pen,
}

impl Frame<'_> {
    fn highlighted(&self, line: usize, col: usize, ch: char) -> bool {
        if ch == '\t' {
            return true;
        }
        let is_cursor = line == self.cursor.line && col == self.cursor.col;
        !is_cursor && self.selection.is_some_and(|sel| sel.contains(line, col))
    }
}

/// Draw every text row. With `scrolled` each row is flushed as it is drawn.
///
/// # Errors
///
/// Propagates surface errors.
pub fn draw_text<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &Frame<'_>,
    scrolled: bool,
) -> io::Result<()> {
    let first = frame.viewport.first();
    for row in 0..frame.viewport.rows() {
        let line = first + row;
        if line < frame.buffer.line_count() {
            frame.pen.paint(surface, TEXT_PAIR, |s| draw_row(s, frame, row, line))?;
        } else {
            surface.move_cursor(row, 0)?;
        }
        surface.clear_to_eol()?;
        if scrolled {
            surface.refresh()?;
        }
    }
    Ok(())
}

fn draw_row<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &Frame<'_>,
    row: usize,
    line: usize,
) -> io::Result<()> {
    if frame.gutter > 0 {
        let number = format!("{:>width$} ", line + 1, width = frame.gutter - 1);
        surface.print(row, 0, &number)?;
    } else {
        surface.move_cursor(row, 0)?;
    }

    let Some(text) = frame.buffer.line(line) else {
        return Ok(());
    };
    let text_cols = frame.columns.saturating_sub(frame.gutter);
    let offset = frame.viewport.h_offset();
    let mut used = 0;

    for (col, ch) in text.chars().enumerate().skip(offset) {
        let width = cell_width(ch);
        if used + width > text_cols {
            break;
        }
        let screen = frame.gutter + used;
        let glyph = if ch == '\t' { ' ' } else { ch };
        if frame.highlighted(line, col, ch) {
            frame.pen.swap(surface, TEXT_PAIR, ACCENT_PAIR)?;
            surface.print_char(row, screen, glyph)?;
            frame.pen.swap(surface, ACCENT_PAIR, TEXT_PAIR)?;
        } else {
            surface.print_char(row, screen, glyph)?;
        }
        used += width;
    }
    Ok(())
}

/// Draw the command-line row.
///
/// # Errors
///
/// Propagates surface errors.
pub fn draw_bottom<S: Surface + ?Sized>(
    surface: &mut S,
    row: usize,
    bottom: BottomLine<'_>,
    pen: Pen,
) -> io::Result<()> {
    match bottom {
        BottomLine::Command(input) => pen.paint(surface, TEXT_PAIR, |s| {
            s.print(row, 0, &format!(":{input}"))?;
            s.clear_to_eol()
        }),
        BottomLine::Status(status) => pen.paint(surface, status.pair(), |s| {
            s.print(row, 0, &status.rendered())?;
            s.clear_to_eol()
        }),
        BottomLine::Blank => {
            surface.move_cursor(row, 0)?;
            surface.clear_to_eol()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
