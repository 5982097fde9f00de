// SPDX-License-Identifier: MIT
//
// In-memory surface for driving the editor from tests.
//
// Input comes from a queue filled up front; an empty queue reads as end of
// input. Output lands in a character grid that tests inspect row by row.
// Each cell remembers the color pair active when it was drawn.

use std::collections::{BTreeMap, VecDeque};
use std::io;

use crate::color::CellColor;
use crate::input::{Event, KeyCode, KeyEvent, Modifiers};
use crate::surface::Surface;

/// One queued input step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Event(Event),
    /// Change the dimensions, then deliver `Event::Resize`.
    Resize { rows: usize, cols: usize },
}

/// A drawn cell: character plus the color pair it was drawn with (0 = none).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    pair: u8,
}

const BLANK: Cell = Cell { ch: ' ', pair: 0 };

/// A [`Surface`] backed by memory.
///
/// ```
/// use quill_term::scripted::ScriptedSurface;
/// use quill_term::surface::Surface;
///
/// let mut s = ScriptedSurface::new(5, 20);
/// s.print(0, 2, "hi").unwrap();
/// assert_eq!(s.row_text(0), "  hi");
/// ```
#[derive(Debug)]
pub struct ScriptedSurface {
    steps: VecDeque<Step>,
    rows: usize,
    cols: usize,
    grid: Vec<Vec<Cell>>,
    cursor: (usize, usize),
    cursor_visible: bool,
    color: bool,
    pairs: BTreeMap<u8, (CellColor, CellColor)>,
    active_pair: u8,
    refreshes: usize,
}

impl ScriptedSurface {
    /// A blank `rows` × `cols` surface with color support and no input.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            steps: VecDeque::new(),
            rows,
            cols,
            grid: vec![vec![BLANK; cols]; rows],
            cursor: (0, 0),
            cursor_visible: true,
            color: true,
            pairs: BTreeMap::new(),
            active_pair: 0,
            refreshes: 0,
        }
    }

    /// Turn color support off (or back on).
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    // ── Scripting input ─────────────────────────────────────────────

    /// Queue one event.
    pub fn push_event(&mut self, event: Event) {
        self.steps.push_back(Step::Event(event));
    }

    /// Queue one key.
    pub fn push_key(&mut self, key: KeyEvent) {
        self.push_event(Event::Key(key));
    }

    /// Queue Ctrl+`ch`.
    pub fn push_ctrl(&mut self, ch: char) {
        self.push_key(KeyEvent::with(KeyCode::Char(ch), Modifiers::CTRL));
    }

    /// Queue each character of `keys` as a keypress.
    ///
    /// `\n` is Enter, `\t` is Tab, `\x1b` is Escape and `\x7f` is Backspace.
    pub fn type_str(&mut self, keys: &str) {
        for ch in keys.chars() {
            let code = match ch {
                '\n' => KeyCode::Enter,
                '\t' => KeyCode::Tab,
                '\x1b' => KeyCode::Escape,
                '\x7f' => KeyCode::Backspace,
                c => KeyCode::Char(c),
            };
            self.push_key(KeyEvent::plain(code));
        }
    }

    /// Queue a resize to `rows` × `cols`.
    pub fn push_resize(&mut self, rows: usize, cols: usize) {
        self.steps.push_back(Step::Resize { rows, cols });
    }

    /// Input steps not yet read.
    #[must_use]
    pub fn pending_input(&self) -> usize {
        self.steps.len()
    }

    // ── Inspecting output ───────────────────────────────────────────

    /// The text on `row` with trailing blanks removed.
    #[must_use]
    pub fn row_text(&self, row: usize) -> String {
        self.grid.get(row).map_or_else(String::new, |cells| {
            let text: String = cells.iter().map(|c| c.ch).collect();
            text.trim_end().to_owned()
        })
    }

    /// The text on the bottom row, where messages and the command line live.
    #[must_use]
    pub fn bottom_row(&self) -> String {
        self.row_text(self.rows.saturating_sub(1))
    }

    /// The color pair the cell at `(row, col)` was drawn with, 0 for none.
    #[must_use]
    pub fn pair_at(&self, row: usize, col: usize) -> u8 {
        self.grid
            .get(row)
            .and_then(|cells| cells.get(col))
            .map_or(0, |c| c.pair)
    }

    /// The colors registered for `pair`.
    #[must_use]
    pub fn color_pair(&self, pair: u8) -> Option<(CellColor, CellColor)> {
        self.pairs.get(&pair).copied()
    }

    /// Number of registered color pairs.
    #[must_use]
    pub fn color_pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Current cursor `(row, col)`.
    #[must_use]
    pub const fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Whether the cursor is shown.
    #[must_use]
    pub const fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// How many times [`Surface::refresh`] ran.
    #[must_use]
    pub const fn refresh_count(&self) -> usize {
        self.refreshes
    }

    fn put(&mut self, row: usize, col: usize, ch: char) {
        if let Some(cell) = self.grid.get_mut(row).and_then(|cells| cells.get_mut(col)) {
            *cell = Cell {
                ch,
                pair: self.active_pair,
            };
        }
    }

    fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.grid = vec![vec![BLANK; cols]; rows];
        self.cursor = (0, 0);
    }
}

impl Surface for ScriptedSurface {
    fn refresh(&mut self) -> io::Result<()> {
        self.refreshes += 1;
        Ok(())
    }

    fn move_cursor(&mut self, row: usize, col: usize) -> io::Result<()> {
        self.cursor = (row, col);
        Ok(())
    }

    fn print(&mut self, row: usize, col: usize, text: &str) -> io::Result<()> {
        let mut at = col;
        for ch in text.chars() {
            self.put(row, at, ch);
            at += 1;
        }
        self.cursor = (row, at);
        Ok(())
    }

    fn print_char(&mut self, row: usize, col: usize, ch: char) -> io::Result<()> {
        self.put(row, col, ch);
        self.cursor = (row, col + 1);
        Ok(())
    }

    fn clear_to_eol(&mut self) -> io::Result<()> {
        let (row, col) = self.cursor;
        if let Some(cells) = self.grid.get_mut(row) {
            for cell in cells.iter_mut().skip(col) {
                *cell = BLANK;
            }
        }
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        self.cursor_visible = visible;
        Ok(())
    }

    fn read_input(&mut self) -> io::Result<Option<Event>> {
        Ok(self.steps.pop_front().map(|step| match step {
            Step::Event(event) => event,
            Step::Resize { rows, cols } => {
                self.resize(rows, cols);
                Event::Resize
            }
        }))
    }

    fn attribute_on(&mut self, pair: u8) -> io::Result<()> {
        self.active_pair = pair;
        Ok(())
    }

    fn attribute_off(&mut self, pair: u8) -> io::Result<()> {
        if self.active_pair == pair {
            self.active_pair = 0;
        }
        Ok(())
    }

    fn init_color_pair(&mut self, pair: u8, fg: CellColor, bg: CellColor) {
        self.pairs.insert(pair, (fg, bg));
    }

    fn has_color_support(&self) -> bool {
        self.color
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.cols
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
