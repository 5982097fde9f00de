// SPDX-License-Identifier: MIT
//
// Drawing surface: the seam between the editor core and a terminal.
//
// The editor never writes escape sequences itself. It addresses cells by
// (row, col), turns numbered color pairs on and off, and asks for one input
// event at a time. `TermSurface` implements that on a real terminal;
// `ScriptedSurface` (see `scripted.rs`) implements it in memory for tests.
//
// # Raw mode
//
// `TermSurface` owns a `RawMode` guard: termios in raw mode, the alternate
// screen, a hidden cursor. Dropping the guard undoes all three. A panic hook
// writes a fixed restore sequence straight to fd 1 and puts termios back
// before the default handler prints.
//
// # SIGWINCH Handling
//
// A signal handler sets an `AtomicBool`. `read_input` polls stdin with a
// short timeout and checks the flag between polls, so a resize surfaces as
// `Event::Resize` even while no key is pressed.
//
// Every `unsafe` block here is a single POSIX call.
#![allow(unsafe_code)]

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::color::CellColor;
use crate::input::{Event, Parser};

// ─── Surface Trait ───────────────────────────────────────────────────────────

/// Everything the editor needs from a character-cell display.
///
/// Coordinates are 0-indexed `(row, col)`. Output may be buffered until
/// [`refresh`](Self::refresh).
pub trait Surface {
    /// Make everything drawn since the last refresh visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn refresh(&mut self) -> io::Result<()>;

    /// Place the cursor at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn move_cursor(&mut self, row: usize, col: usize) -> io::Result<()>;

    /// Draw `text` starting at `(row, col)`; the cursor ends after it.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn print(&mut self, row: usize, col: usize, text: &str) -> io::Result<()>;

    /// Draw a single character at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn print_char(&mut self, row: usize, col: usize, ch: char) -> io::Result<()>;

    /// Blank from the cursor to the end of its row.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn clear_to_eol(&mut self) -> io::Result<()>;

    /// Show or hide the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()>;

    /// Block until the next input event. `Ok(None)` means input has ended.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input source fails.
    fn read_input(&mut self) -> io::Result<Option<Event>>;

    /// Start drawing with color pair `pair`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn attribute_on(&mut self, pair: u8) -> io::Result<()>;

    /// Stop drawing with color pair `pair`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output fails.
    fn attribute_off(&mut self, pair: u8) -> io::Result<()>;

    /// Register color pair `pair` as `fg` on `bg`.
    fn init_color_pair(&mut self, pair: u8, fg: CellColor, bg: CellColor);

    /// Whether colors can be shown at all.
    fn has_color_support(&self) -> bool;

    /// Height in rows.
    fn rows(&self) -> usize;

    /// Width in columns.
    fn columns(&self) -> usize;
}

// ─── Raw mode ────────────────────────────────────────────────────────────────

/// Size assumed when the terminal cannot be queried, as `(rows, cols)`.
const FALLBACK_SIZE: (usize, usize) = (24, 80);

/// Written by the panic hook: end synchronized output, reset SGR, show the
/// cursor, then leave the alternate screen last.
const PANIC_RESTORE: &[u8] = b"\x1b[?2026l\x1b[0m\x1b[?25h\x1b[?1049l";

/// Termios from before raw mode, for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

static PANIC_HOOK: Once = Once::new();

#[cfg(unix)]
fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
fn is_tty() -> bool {
    false
}

/// `(rows, cols)` of the terminal on stdout.
#[cfg(unix)]
fn window_size() -> Option<(usize, usize)> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let ok = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) } == 0;
    (ok && ws.ws_row > 0 && ws.ws_col > 0)
        .then(|| (usize::from(ws.ws_row), usize::from(ws.ws_col)))
}

#[cfg(not(unix))]
fn window_size() -> Option<(usize, usize)> {
    None
}

#[cfg(unix)]
fn set_termios(termios: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Put stdin in raw mode (blocking reads of at least one byte) and return
/// the previous settings. `None` when stdin is not a terminal.
#[cfg(unix)]
fn enable_raw_mode() -> io::Result<Option<libc::termios>> {
    if !is_tty() {
        return Ok(None);
    }
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    let saved = termios;
    unsafe { libc::cfmakeraw(&raw mut termios) };
    termios.c_cc[libc::VMIN] = 1;
    termios.c_cc[libc::VTIME] = 0;
    set_termios(&termios)?;

    if let Ok(mut slot) = SAVED_TERMIOS.lock() {
        *slot = Some(saved);
    }
    Ok(Some(saved))
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_after_panic();
            previous(info);
        }));
    });
}

/// Best effort; nothing here may panic.
#[cfg(unix)]
fn restore_after_panic() {
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            PANIC_RESTORE.as_ptr().cast::<libc::c_void>(),
            PANIC_RESTORE.len(),
        );
    }
    if let Ok(slot) = SAVED_TERMIOS.lock() {
        if let Some(saved) = slot.as_ref() {
            let _ = set_termios(saved);
        }
    }
}

#[cfg(not(unix))]
fn restore_after_panic() {
    let mut out = io::stdout();
    let _ = out.write_all(PANIC_RESTORE);
    let _ = out.flush();
}

/// Raw mode on the alternate screen for as long as it lives.
struct RawMode {
    #[cfg(unix)]
    saved: Option<libc::termios>,
}

impl RawMode {
    fn enter() -> io::Result<Self> {
        install_panic_hook();
        #[cfg(unix)]
        let saved = enable_raw_mode()?;

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        out.flush()?;

        Ok(Self {
            #[cfg(unix)]
            saved,
        })
    }

    fn leave(&mut self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        ansi::end_sync(&mut out)?;
        ansi::reset(&mut out)?;
        ansi::cursor_show(&mut out)?;
        ansi::exit_alt_screen(&mut out)?;
        out.flush()?;
        drop(out);
        self.restore_termios()
    }

    #[cfg(unix)]
    fn restore_termios(&mut self) -> io::Result<()> {
        if let Some(saved) = self.saved.take() {
            set_termios(&saved)?;
            if let Ok(mut slot) = SAVED_TERMIOS.lock() {
                *slot = None;
            }
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn restore_termios(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = self.leave() {
            log::warn!("restoring the terminal failed: {err}");
        }
    }
}

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

/// Global flag set by the SIGWINCH handler.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Install a signal handler for SIGWINCH (terminal resize).
///
/// The handler only stores to an atomic, which is async-signal-safe.
#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── Stdin ───────────────────────────────────────────────────────────────────

/// Read chunk size. A keypress is 1-6 bytes; 1 KB covers fast typing.
const READ_BUF_SIZE: usize = 1024;

/// Poll interval while idle, so resizes are noticed promptly.
const IDLE_POLL_MS: i32 = 50;

/// How long a lone ESC waits for the rest of a sequence.
const ESC_TIMEOUT_MS: i32 = 25;

/// Wait up to `timeout_ms` for stdin to become readable.
///
/// An interrupted poll reports "not ready" so the caller re-checks flags.
#[cfg(unix)]
fn poll_stdin(timeout_ms: i32) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let ready = unsafe { libc::poll(&raw mut pfd, 1, timeout_ms) };

    if ready < 0 {
        let err = io::Error::last_os_error();
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(false)
        } else {
            Err(err)
        };
    }
    Ok(ready > 0)
}

#[cfg(not(unix))]
fn poll_stdin(_timeout_ms: i32) -> io::Result<bool> {
    Ok(true)
}

/// Read whatever stdin has. `Ok(0)` is end of input.
#[cfg(unix)]
fn read_stdin(buf: &mut [u8]) -> io::Result<usize> {
    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    if n < 0 {
        return Err(io::Error::last_os_error());
    }
    #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
    Ok(n as usize)
}

#[cfg(not(unix))]
fn read_stdin(buf: &mut [u8]) -> io::Result<usize> {
    use std::io::Read;
    io::stdin().lock().read(buf)
}

// ─── TermSurface ─────────────────────────────────────────────────────────────

/// A [`Surface`] drawing to the controlling terminal.
///
/// Creating one enters raw mode on the alternate screen; dropping it
/// restores the terminal.
pub struct TermSurface {
    _raw: RawMode,
    /// `(rows, cols)`, refreshed on SIGWINCH.
    size: (usize, usize),
    /// Bytes written since the last refresh.
    out: Vec<u8>,
    parser: Parser,
    /// Parsed events not yet handed out.
    pending: VecDeque<Event>,
    /// Registered pairs, indexed by pair number.
    pairs: Vec<Option<(CellColor, CellColor)>>,
    color: bool,
}

impl TermSurface {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or the alternate screen switch fails.
    pub fn new() -> io::Result<Self> {
        let raw = RawMode::enter()?;
        install_sigwinch_handler();

        let size = window_size().unwrap_or(FALLBACK_SIZE);
        let color = is_tty() && std::env::var("TERM").map_or(true, |term| term != "dumb");
        log::debug!("terminal surface ready, {}x{}, color {color}", size.1, size.0);

        Ok(Self {
            _raw: raw,
            size,
            out: Vec::with_capacity(16 * 1024),
            parser: Parser::new(),
            pending: VecDeque::new(),
            pairs: vec![None; usize::from(u8::MAX) + 1],
            color,
        })
    }
}

/// Clamp a cell coordinate into the terminal's `u16` range.
fn coord(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

impl Surface for TermSurface {
    fn refresh(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::begin_sync(&mut lock)?;
        lock.write_all(&self.out)?;
        ansi::end_sync(&mut lock)?;
        lock.flush()?;
        self.out.clear();
        Ok(())
    }

    fn move_cursor(&mut self, row: usize, col: usize) -> io::Result<()> {
        ansi::cursor_to(&mut self.out, coord(col), coord(row))
    }

    fn print(&mut self, row: usize, col: usize, text: &str) -> io::Result<()> {
        ansi::cursor_to(&mut self.out, coord(col), coord(row))?;
        self.out.write_all(text.as_bytes())
    }

    fn print_char(&mut self, row: usize, col: usize, ch: char) -> io::Result<()> {
        ansi::cursor_to(&mut self.out, coord(col), coord(row))?;
        let mut utf8 = [0u8; 4];
        self.out.write_all(ch.encode_utf8(&mut utf8).as_bytes())
    }

    fn clear_to_eol(&mut self) -> io::Result<()> {
        ansi::clear_to_eol(&mut self.out)
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        if visible {
            ansi::cursor_show(&mut self.out)
        } else {
            ansi::cursor_hide(&mut self.out)
        }
    }

    fn read_input(&mut self) -> io::Result<Option<Event>> {
        let mut buf = [0u8; READ_BUF_SIZE];

        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                self.size = window_size().unwrap_or(self.size);
                log::debug!("terminal resized to {}x{}", self.size.1, self.size.0);
                return Ok(Some(Event::Resize));
            }

            let timeout = if self.parser.has_pending() {
                ESC_TIMEOUT_MS
            } else {
                IDLE_POLL_MS
            };

            if !poll_stdin(timeout)? {
                if self.parser.has_pending() {
                    self.pending.extend(self.parser.flush());
                }
                continue;
            }

            match read_stdin(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(n) => self.pending.extend(self.parser.advance(&buf[..n])),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }

    fn attribute_on(&mut self, pair: u8) -> io::Result<()> {
        if let Some((fg, bg)) = self.pairs[usize::from(pair)] {
            ansi::fg(&mut self.out, fg)?;
            ansi::bg(&mut self.out, bg)?;
        }
        Ok(())
    }

    fn attribute_off(&mut self, pair: u8) -> io::Result<()> {
        if self.pairs[usize::from(pair)].is_some() {
            ansi::reset(&mut self.out)?;
        }
        Ok(())
    }

    fn init_color_pair(&mut self, pair: u8, fg: CellColor, bg: CellColor) {
        self.pairs[usize::from(pair)] = Some((fg, bg));
    }

    fn has_color_support(&self) -> bool {
        self.color
    }

    fn rows(&self) -> usize {
        self.size.0
    }

    fn columns(&self) -> usize {
        self.size.1
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
