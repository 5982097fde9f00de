//! The editor: modal key dispatch over a buffer and a viewport.
//!
//! # Driver loop
//!
//! ```text
//! update ──▶ render ──▶ read one event ──▶ dispatch ─┐
//!   ▲                                                │
//!   └──────────── until Exit or end of input ────────┘
//! ```
//!
//! Dispatch is one `match` on the mode. Multi-key bindings (`gg`, `zz`, `dd`,
//! `12j`) park in a `Pending` state that the next key consumes, so no
//! handler ever re-enters the loop.
//!
//! Mode changes go through [`Editor::set_mode`], which runs the old mode's
//! exit hook and the new mode's enter hook. Setting the current mode again
//! does nothing.

use std::io;
use std::path::{Path, PathBuf};

use quill_term::input::{Event, KeyCode, KeyEvent, Modifiers};
use quill_term::surface::Surface;
use quill_theme::ColorschemeRegistry;

use crate::bind_count::BindCount;
use crate::buffer::{Buffer, Result};
use crate::command::{CommandLine, Operation, get_command};
use crate::file;
use crate::history::History;
use crate::mode::{Mode, VisualKind};
use crate::options::Options;
use crate::position::Position;
use crate::selection::Selection;
use crate::view::{self, BottomLine, Frame, Pen, StatusLine};
use crate::viewport::Viewport;

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// The collaborators the editor drives: where it draws, its options and the
/// colorschemes it can switch between.
#[derive(Debug)]
pub struct EditorContext<S: Surface> {
    pub surface: S,
    pub options: Options,
    pub colorschemes: ColorschemeRegistry,
}

impl<S: Surface> EditorContext<S> {
    /// Default options and no colorschemes.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            options: Options::new(),
            colorschemes: ColorschemeRegistry::new(),
        }
    }
}

/// A key prefix waiting for the next key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Pending {
    #[default]
    None,
    G,
    Z,
    D,
    /// Digits are being typed.
    Count,
}

/// The `Char` of an unmodified key.
fn plain_char(key: KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) => Some(c),
        _ => None,
    }
}

/// The `Char` of a Ctrl chord.
const fn ctrl_char(key: KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if key.is_ctrl() => Some(c),
        _ => None,
    }
}

/// Text rows for a surface of `rows` lines; one line is the command line.
const fn text_rows(rows: usize) -> usize {
    let text = rows.saturating_sub(1);
    if text == 0 { 1 } else { text }
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// One editing session over one file.
#[derive(Debug)]
pub struct Editor<S: Surface> {
    ctx: EditorContext<S>,
    path: PathBuf,
    buffer: Buffer,
    history: History,
    viewport: Viewport,
    mode: Mode,
    pending: Pending,
    count: BindCount,
    /// Absolute position captured on entering visual mode.
    anchor: Position,
    command_line: CommandLine,
    /// Cursor when `:` was pressed.
    saved_cursor: Position,
    status: Option<StatusLine>,
    gutter: usize,
}

impl<S: Surface> Editor<S> {
    /// Start a session on `lines`, read from `path`.
    pub fn new(ctx: EditorContext<S>, path: impl Into<PathBuf>, lines: &[String]) -> Self {
        let buffer = Buffer::from_lines(lines);
        let mut history = History::new();
        history.snapshot(&buffer.to_lines());
        let viewport = Viewport::new(text_rows(ctx.surface.rows()));

        Self {
            ctx,
            path: path.into(),
            buffer,
            history,
            viewport,
            mode: Mode::Normal,
            pending: Pending::None,
            count: BindCount::new(),
            anchor: Position::ZERO,
            command_line: CommandLine::new(),
            saved_cursor: Position::ZERO,
            status: None,
            gutter: 0,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Absolute cursor position.
    #[must_use]
    pub const fn cursor(&self) -> Position {
        self.viewport.position()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    #[must_use]
    pub fn command_line(&self) -> &str {
        self.command_line.input()
    }

    #[must_use]
    pub const fn context(&self) -> &EditorContext<S> {
        &self.ctx
    }

    pub const fn context_mut(&mut self) -> &mut EditorContext<S> {
        &mut self.ctx
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.ctx.surface
    }

    /// True when the buffer differs from what was last loaded or written.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.history.has_unsaved_changes(&self.buffer.to_lines())
    }

    // -- Driver -------------------------------------------------------------

    /// Activate the configured colorscheme, run `initial_command`, then edit
    /// until the mode is Exit or input runs out.
    ///
    /// # Errors
    ///
    /// Propagates surface errors.
    pub fn run(&mut self, initial_command: &str) -> io::Result<()> {
        self.update();
        self.activate_configured_colorscheme();
        self.run_command(initial_command);

        while self.mode != Mode::Exit {
            self.update();
            self.render()?;
            let Some(event) = self.ctx.surface.read_input()? else {
                log::debug!("end of input");
                break;
            };
            self.handle_event(event);
        }
        Ok(())
    }

    fn activate_configured_colorscheme(&mut self) {
        let Ok(name) = self.ctx.options.get_string("colorscheme") else {
            return;
        };
        if !name.is_empty() && !self.ctx.colorschemes.activate(name, &mut self.ctx.surface) {
            log::warn!("colorscheme '{name}' not found");
        }
    }

    /// Feed one input event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // The next update picks up the new size.
            Event::Resize => log::debug!("resize event"),
            Event::Key(key) => {
                if let Err(err) = self.handle_key(key) {
                    log::warn!("{:?} in {}: {err}", key.code, self.mode);
                }
            }
        }
    }

    /// Sync with the surface size and the buffer's shape.
    fn update(&mut self) {
        let rows = text_rows(self.ctx.surface.rows());
        if self.viewport.set_rows(rows) {
            log::debug!("now {rows} text rows");
            self.viewport
                .center_line(&self.buffer, self.viewport.current_line());
        }
        self.viewport.clamp_to(&self.buffer);
        let number = self.ctx.options.get_bool("number").unwrap_or(true);
        self.gutter = view::gutter_width(self.buffer.line_count(), number);
    }

    fn render(&mut self) -> io::Result<()> {
        let scrolled = self.viewport.take_scrolled();
        let columns = self.ctx.surface.columns();
        let text_cols = columns.saturating_sub(self.gutter).max(1);
        let line = self
            .buffer
            .line_text(self.viewport.current_line())
            .unwrap_or_default();
        let cursor_col = self.gutter + self.viewport.follow_cursor(&line, text_cols);
        let pen = Pen::new(self.ctx.surface.has_color_support() && self.ctx.colorschemes.has_active());
        let bottom_row = self.viewport.rows();

        let frame = Frame {
            buffer: &self.buffer,
            viewport: &self.viewport,
            gutter: self.gutter,
            columns,
            selection: self.selection(),
            cursor: self.viewport.position(),
            pen,
        };
        let bottom = match (self.mode, &self.status) {
            (Mode::Command, _) => BottomLine::Command(self.command_line.input()),
            (_, Some(status)) => BottomLine::Status(status),
            (_, None) => BottomLine::Blank,
        };
        let (cursor_row, cursor_col) = if self.mode == Mode::Command {
            (bottom_row, 1 + self.command_line.input().chars().map(view::cell_width).sum::<usize>())
        } else {
            (self.viewport.row(), cursor_col)
        };

        let surface = &mut self.ctx.surface;
        if scrolled {
            surface.set_cursor_visible(false)?;
        }
        view::draw_text(surface, &frame, scrolled)?;
        view::draw_bottom(surface, bottom_row, bottom, pen)?;
        surface.move_cursor(cursor_row, cursor_col.min(columns.saturating_sub(1)))?;
        if scrolled {
            surface.set_cursor_visible(true)?;
        }
        surface.refresh()
    }

    // -- Modes --------------------------------------------------------------

    /// Switch modes, running the exit hook of the old one and the enter hook
    /// of the new one.
    pub fn set_mode(&mut self, new: Mode) {
        let old = self.mode;
        if old == new {
            return;
        }

        match old {
            Mode::Insert => {
                self.clear_command_line();
                if self.viewport.col() > 0 {
                    self.viewport.set_col(self.viewport.col() - 1);
                }
                self.viewport.remember_col();
            }
            Mode::Command => {
                self.viewport.place(&self.buffer, self.saved_cursor.line);
                self.viewport.set_col(self.saved_cursor.col);
                self.clear_command_line();
            }
            Mode::Normal => self.count.reset(),
            Mode::Visual(_) => {
                self.clear_command_line();
                self.count.reset();
            }
            Mode::Exit => {}
        }

        if let Some(banner) = new.banner() {
            self.status = Some(StatusLine::message(banner));
        }
        // Switching between v and V keeps the original anchor.
        if new.is_visual() && !old.is_visual() {
            self.anchor = self.viewport.position();
        }

        log::debug!("mode {old} -> {new}");
        self.mode = new;
    }

    fn clear_command_line(&mut self) {
        self.command_line.clear();
        self.status = None;
    }

    fn message(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine::message(text));
    }

    fn error(&mut self, text: impl Into<String>) {
        let status = StatusLine::error(text);
        log::debug!("{}", status.rendered());
        self.status = Some(status);
    }

    fn selection(&self) -> Option<Selection> {
        self.mode
            .visual_kind()
            .map(|kind| Selection::new(self.anchor, self.viewport.position(), kind, &self.buffer))
    }

    // -- Dispatch -----------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match std::mem::take(&mut self.pending) {
            Pending::None => self.dispatch(key),
            Pending::Count => {
                if let Some(digit) = plain_char(key).and_then(|c| c.to_digit(10)) {
                    self.count.add_digit(digit);
                    self.pending = Pending::Count;
                    Ok(())
                } else {
                    self.dispatch(key)
                }
            }
            prefix => {
                match (prefix, plain_char(key)) {
                    (Pending::G, Some('g')) => self.go_to_first_line(),
                    (Pending::Z, Some('z')) => self.center_current(),
                    (Pending::D, Some('d')) => self.delete_lines()?,
                    _ => self.count.reset(),
                }
                Ok(())
            }
        }
    }

    fn dispatch(&mut self, key: KeyEvent) -> Result<()> {
        match self.mode {
            Mode::Normal => self.normal_key(key),
            Mode::Insert => self.insert_key(key),
            Mode::Visual(kind) => self.visual_key(kind, key),
            Mode::Command => {
                self.command_key(key);
                Ok(())
            }
            Mode::Exit => Ok(()),
        }
    }

    fn normal_key(&mut self, key: KeyEvent) -> Result<()> {
        let line = self.viewport.current_line();
        match plain_char(key) {
            Some('a') => {
                let len = self.buffer.line_len(line)?;
                self.viewport.set_col((self.viewport.col() + 1).min(len));
                self.set_mode(Mode::Insert);
            }
            Some('A') => {
                self.viewport.set_col(self.buffer.line_len(line)?);
                self.set_mode(Mode::Insert);
            }
            Some('i') => self.set_mode(Mode::Insert),
            Some('v') => self.set_mode(Mode::Visual(VisualKind::Char)),
            Some('V') => self.set_mode(Mode::Visual(VisualKind::Line)),
            Some('o') => {
                self.buffer.insert_line(line + 1, "")?;
                self.viewport.set_col(0);
                self.viewport.advance_row();
                self.set_mode(Mode::Insert);
            }
            Some('O') => {
                self.buffer.insert_line(line, "")?;
                self.viewport.set_col(0);
                self.set_mode(Mode::Insert);
            }
            Some('z') => self.pending = Pending::Z,
            Some('d') => self.pending = Pending::D,
            _ => return self.shared_key(key),
        }
        Ok(())
    }

    /// Bindings common to Normal and Visual.
    fn shared_key(&mut self, key: KeyEvent) -> Result<()> {
        match ctrl_char(key) {
            Some('f') => return self.repeat(|ed| Ok(ed.moved(Viewport::page_down))),
            Some('b') => return self.repeat(|ed| Ok(ed.moved(Viewport::page_up))),
            _ => {}
        }

        let past_end = self.mode.cursor_past_end();
        match plain_char(key) {
            Some('h') => self.repeat(|ed| Ok(ed.moved(|vp, _| vp.move_left())))?,
            Some('j') => self.repeat(|ed| Ok(ed.moved(Viewport::move_down)))?,
            Some('k') => self.repeat(|ed| Ok(ed.moved(Viewport::move_up)))?,
            Some('l') => {
                self.repeat(|ed| Ok(ed.moved(|vp, buf| vp.move_right(buf, past_end))))?;
            }
            Some('0') => self.viewport.set_col_remembered(0),
            Some('^') => self.viewport.first_non_blank(&self.buffer),
            Some('x') => self.repeat(Self::delete_char)?,
            Some('g') => self.pending = Pending::G,
            Some('G') => self.go_to_last_line(),
            Some(':') => {
                self.saved_cursor = self.viewport.position();
                self.clear_command_line();
                self.set_mode(Mode::Command);
            }
            Some(c @ '1'..='9') => {
                self.count.add_digit(u32::from(c) - u32::from('0'));
                self.pending = Pending::Count;
            }
            _ => self.count.reset(),
        }
        Ok(())
    }

    fn visual_key(&mut self, kind: VisualKind, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Escape {
            self.set_mode(Mode::Normal);
            return Ok(());
        }
        match (kind, plain_char(key)) {
            (_, Some('d')) => {
                let result = self.delete_selection(kind);
                self.set_mode(Mode::Normal);
                return result;
            }
            (VisualKind::Char, Some('v')) | (VisualKind::Line, Some('V')) => {
                self.set_mode(Mode::Normal);
            }
            (VisualKind::Char, Some('V')) => self.set_mode(Mode::Visual(VisualKind::Line)),
            (VisualKind::Line, Some('v')) => self.set_mode(Mode::Visual(VisualKind::Char)),
            _ => return self.shared_key(key),
        }
        Ok(())
    }

    fn insert_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Escape => self.set_mode(Mode::Normal),
            KeyCode::Backspace | KeyCode::Delete => self.insert_backspace()?,
            KeyCode::Enter => self.insert_enter()?,
            KeyCode::Tab => self.insert_tab()?,
            _ => {
                if let Some(ch) = plain_char(key) {
                    self.insert_text(ch, 1)?;
                }
            }
        }
        Ok(())
    }

    fn command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Escape => self.set_mode(Mode::Normal),
            KeyCode::Backspace | KeyCode::Delete => {
                if !self.command_line.backspace() {
                    self.set_mode(Mode::Normal);
                }
            }
            KeyCode::Enter => {
                let line = self.command_line.take();
                self.set_mode(Mode::Normal);
                self.run_command(&line);
            }
            _ => {
                if let Some(ch) = plain_char(key) {
                    self.command_line.push(ch);
                }
            }
        }
    }

    // -- Normal actions -----------------------------------------------------

    /// Run `step` count times, stopping early once it makes no progress.
    fn repeat(&mut self, mut step: impl FnMut(&mut Self) -> Result<bool>) -> Result<()> {
        for _ in 0..self.count.value() {
            if !step(self)? {
                break;
            }
        }
        Ok(())
    }

    /// Apply a viewport motion. Returns `true` if anything changed.
    fn moved(&mut self, motion: impl FnOnce(&mut Viewport, &Buffer)) -> bool {
        let before = self.viewport.clone();
        motion(&mut self.viewport, &self.buffer);
        self.viewport != before
    }

    /// `x`: delete the char under the cursor.
    fn delete_char(&mut self) -> Result<bool> {
        let line = self.viewport.current_line();
        if self.buffer.line_len(line)? == 0 {
            return Ok(false);
        }
        let col = self.viewport.col();
        self.buffer.erase(line, col, 1)?;
        let len = self.buffer.line_len(line)?;
        if col >= len && len > 0 {
            self.viewport.set_col(len - 1);
        }
        Ok(true)
    }

    /// `gg`, or `Ngg`.
    fn go_to_first_line(&mut self) {
        if self.count.is_empty() {
            self.viewport.first_line(&self.buffer);
        } else {
            let line = self.count.value() - 1;
            self.jump_to(line);
        }
    }

    /// `G`, or `NG`.
    fn go_to_last_line(&mut self) {
        if self.count.is_empty() {
            self.viewport.end_of_file(&self.buffer);
        } else {
            let line = self.count.value() - 1;
            self.jump_to(line);
        }
    }

    fn jump_to(&mut self, line: usize) {
        self.viewport.jump_line(&self.buffer, line);
        self.viewport.first_non_blank(&self.buffer);
    }

    /// `zz`, or `Nzz`.
    fn center_current(&mut self) {
        let line = if self.count.is_empty() {
            self.viewport.current_line()
        } else {
            self.count.value() - 1
        };
        self.viewport.center_line(&self.buffer, line);
    }

    /// `dd`, or `Ndd`: delete lines from the cursor down.
    fn delete_lines(&mut self) -> Result<()> {
        let wanted = self.count.value();
        let line = self.viewport.current_line();
        let available = self.buffer.line_count().saturating_sub(line);
        for _ in 0..wanted.min(available) {
            self.buffer.remove_line(line)?;
        }
        self.viewport.clamp_to(&self.buffer);
        self.viewport.first_non_blank(&self.buffer);
        Ok(())
    }

    fn delete_selection(&mut self, kind: VisualKind) -> Result<()> {
        let selection = Selection::new(self.anchor, self.viewport.position(), kind, &self.buffer);
        let cursor = selection.delete(&mut self.buffer)?;
        self.viewport.place(&self.buffer, cursor.line);
        self.viewport.set_col(cursor.col);
        Ok(())
    }

    // -- Insert actions -----------------------------------------------------

    fn insert_text(&mut self, ch: char, count: usize) -> Result<()> {
        let line = self.viewport.current_line();
        let col = self.viewport.col();
        self.buffer.insert_fill(line, col, count, ch)?;
        self.viewport.set_col(col + count);
        Ok(())
    }

    /// Erase left, or join with the previous line at column 0.
    fn insert_backspace(&mut self) -> Result<()> {
        let line = self.viewport.current_line();
        let col = self.viewport.col();
        if col > 0 {
            self.buffer.erase(line, col - 1, 1)?;
            self.viewport.set_col(col - 1);
        } else if line > 0 {
            let joined_at = self.buffer.line_len(line - 1)?;
            let text = self.buffer.line_text(line).unwrap_or_default();
            self.buffer.append_to_line(line - 1, &text)?;
            self.buffer.remove_line(line)?;
            self.viewport.set_col(joined_at);
            self.viewport.retreat_row();
        }
        Ok(())
    }

    /// Split the line at the cursor.
    fn insert_enter(&mut self) -> Result<()> {
        let line = self.viewport.current_line();
        let col = self.viewport.col();
        let len = self.buffer.line_len(line)?;
        let tail: String = self
            .buffer
            .line(line)
            .map(|text| text.chars().skip(col).collect())
            .unwrap_or_default();
        self.buffer.insert_line(line + 1, &tail)?;
        if col < len {
            self.buffer.erase(line, col, len - col)?;
        }
        self.viewport.set_col(0);
        self.viewport.advance_row();
        Ok(())
    }

    fn insert_tab(&mut self) -> Result<()> {
        if self.ctx.options.get_bool("tabs").unwrap_or(false) {
            self.insert_text('\t', 1)
        } else {
            let size = self.ctx.options.get_int("tabsize").unwrap_or(4);
            self.insert_text(' ', size)
        }
    }

    // -- Commands -----------------------------------------------------------

    /// Parse and run a command line, as typed after `:`.
    pub fn run_command(&mut self, line: &str) {
        for cmd in get_command(line) {
            log::debug!("run {:?} name={:?} arg={:?}", cmd.op, cmd.name, cmd.arg);
            match cmd.op {
                Operation::Write => self.write(),
                Operation::Quit => {
                    if self.is_modified() {
                        self.error("No write since last change");
                    } else {
                        self.set_mode(Mode::Exit);
                    }
                }
                Operation::ForceQuit => self.set_mode(Mode::Exit),
                Operation::PrintColorscheme => match self.ctx.colorschemes.current_name() {
                    Some(name) => {
                        let name = name.to_owned();
                        self.message(name);
                    }
                    None => self.error("No colorscheme detected"),
                },
                Operation::Set => self.set_option(&cmd.arg),
                Operation::Echo => self.echo(&cmd.arg),
                Operation::JumpLine => match cmd.jump_target() {
                    Ok(target) => self.jump_to(target.saturating_sub(1)),
                    Err(err) => self.error(err.to_string()),
                },
                Operation::InvalidCommand => self.error(format!("Not an editor command: {line}")),
                Operation::TrailingCharacters => self.error("Trailing characters"),
            }
        }
    }

    fn write(&mut self) {
        let lines = self.buffer.to_lines();
        match file::save_lines(&self.path, &lines) {
            Ok(()) => {
                self.history.snapshot(&lines);
                self.message(format!("\"{}\" written", self.path.display()));
            }
            Err(err) => {
                log::warn!("writing {} failed: {err}", self.path.display());
                self.error(format!("Cannot write \"{}\": {err}", self.path.display()));
            }
        }
    }

    fn set_option(&mut self, arg: &str) {
        let before = self.colorscheme_option();
        if !self.ctx.options.try_set(arg) {
            self.error(format!("Unknown option: {arg}"));
        }
        let after = self.colorscheme_option();
        if before != after && !self.ctx.colorschemes.activate(&after, &mut self.ctx.surface) {
            self.error(format!("Cannot find colorscheme '{arg}'"));
        }
    }

    fn colorscheme_option(&self) -> String {
        self.ctx
            .options
            .get_string("colorscheme")
            .unwrap_or_default()
            .to_owned()
    }

    /// Print a quoted argument without its quotes.
    fn echo(&mut self, arg: &str) {
        let quoted = match (arg.chars().next(), arg.chars().last()) {
            (Some(open), Some(close)) => open == close && matches!(open, '"' | '\''),
            _ => false,
        };
        if quoted {
            let inner = arg.get(1..arg.len() - 1).unwrap_or_default().to_owned();
            self.message(inner);
        } else {
            self.error(format!("Invalid echo argument {arg}"));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
