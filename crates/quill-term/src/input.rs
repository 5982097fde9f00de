// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events. Handles what a plain terminal
// sends without any extended protocol enabled:
//
// - Control characters (Ctrl+letter, Enter, Tab, Backspace)
// - Legacy CSI sequences (arrows, Home/End, PageUp/PageDown, Delete)
// - SS3 sequences (arrow and Home/End alternate encoding)
// - Alt+key (ESC followed by printable character)
// - UTF-8 multi-byte characters
//
// The parser keeps a small byte buffer because escape sequences can span
// multiple `read()` calls. After a timeout with no new bytes, call
// [`Parser::flush`] to emit any pending lone ESC as a real Escape keypress.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A parsed terminal input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A keypress.
    Key(KeyEvent),
    /// The terminal window changed size.
    Resize,
}

/// A keyboard event with key identity and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key with the given modifiers.
    #[inline]
    #[must_use]
    pub const fn with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// Whether Ctrl was held.
    #[inline]
    #[must_use]
    pub const fn is_ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character (printable).
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Matches the xterm CSI modifier encoding where `param = 1 + bitmask`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Terminal input parser.
///
/// Feed raw bytes via [`advance`](Parser::advance) and collect structured
/// [`Event`]s. Incomplete sequences stay buffered until more bytes arrive.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte could be a standalone Escape keypress or the start of
/// a multi-byte sequence. The parser holds a lone ESC; the caller waits a
/// short timeout and then calls [`flush`](Parser::flush).
#[derive(Debug)]
pub struct Parser {
    /// Accumulated raw bytes waiting to be parsed.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a new parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed raw bytes from stdin and return all events that can be parsed.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Flush pending bytes as literal key events.
    ///
    /// A lone ESC becomes an Escape key event; printable leftovers become
    /// `Char` events; anything else is dropped.
    pub fn flush(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        for &byte in &self.buf {
            let key = match byte {
                0x1B => KeyEvent::plain(KeyCode::Escape),
                b @ 0x01..=0x1A => {
                    KeyEvent::with(KeyCode::Char((b + b'a' - 1) as char), Modifiers::CTRL)
                }
                0x7F => KeyEvent::plain(KeyCode::Backspace),
                b @ 0x20..=0x7E => KeyEvent::plain(KeyCode::Char(b as char)),
                _ => continue,
            };
            events.push(Event::Key(key));
        }
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────

/// Result of trying to parse one event from the buffer.
enum Parsed {
    /// Successfully parsed an event, consuming `usize` bytes.
    Event(Event, usize),
    /// Sequence is incomplete: need more bytes.
    Incomplete,
    /// Unrecognized byte(s), skip `usize` bytes.
    Skip(usize),
}

/// Try to parse a single event from the front of `buf`.
fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&lead) = buf.first() else {
        return Parsed::Skip(0);
    };

    match lead {
        0x1B => parse_escape(buf),
        0x00 => Parsed::Event(ctrl_key(KeyCode::Char('@')), 1),
        b @ (0x01..=0x07 | 0x0B..=0x0C | 0x0E..=0x1A) => {
            Parsed::Event(ctrl_key(KeyCode::Char((b + b'a' - 1) as char)), 1)
        }
        0x08 | 0x7F => Parsed::Event(press(KeyCode::Backspace), 1),
        0x09 => Parsed::Event(press(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Event(press(KeyCode::Enter), 1),
        b @ 0x20..=0x7E => Parsed::Event(press(KeyCode::Char(b as char)), 1),
        0xC0..=0xFF => parse_utf8(buf),
        // Bare continuation bytes: invalid lead.
        _ => Parsed::Skip(1),
    }
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], 0x1B);

    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x1B => Parsed::Event(key_with(KeyCode::Escape, Modifiers::ALT), 2),
        b @ 0x20..=0x7E => Parsed::Event(key_with(KeyCode::Char(b as char), Modifiers::ALT), 2),
        b @ 0x01..=0x1A => Parsed::Event(
            key_with(
                KeyCode::Char((b + b'a' - 1) as char),
                Modifiers::ALT | Modifiers::CTRL,
            ),
            2,
        ),
        // Unknown byte after ESC: standalone Escape.
        _ => Parsed::Event(press(KeyCode::Escape), 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'[');

    // Parameter bytes are 0x30..=0x3F, intermediates 0x20..=0x2F,
    // the final byte 0x40..=0x7E.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params = parse_csi_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params
        .get(1)
        .map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    if final_byte == b'~' {
        let code = match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            _ => return Parsed::Skip(consumed),
        };
        return Parsed::Event(key_with(code, modifiers), consumed);
    }

    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => return Parsed::Event(key_with(KeyCode::Tab, Modifiers::SHIFT), consumed),
        _ => return Parsed::Skip(consumed),
    };

    Parsed::Event(key_with(code, modifiers), consumed)
}

// ── SS3 (Single Shift 3) ───────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'O');

    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(3),
    };

    Parsed::Event(press(code), 3)
}

// ── UTF-8 ──────────────────────────────────────────────────────────────────

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);

    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    if buf[1..expected].iter().any(|&b| b & 0xC0 != 0x80) {
        return Parsed::Skip(1);
    }

    std::str::from_utf8(&buf[..expected]).map_or(Parsed::Skip(1), |s| {
        s.chars().next().map_or(Parsed::Skip(expected), |ch| {
            Parsed::Event(press(KeyCode::Char(ch)), expected)
        })
    })
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Create a simple key press event with no modifiers.
const fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::plain(code))
}

/// Create a Ctrl+key press event.
const fn ctrl_key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::with(code, Modifiers::CTRL))
}

/// Create a key press event with specific modifiers.
const fn key_with(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent::with(code, modifiers))
}

/// Parse semicolon-separated CSI parameters.
///
/// - `1;2` → `[1, 2]`
/// - (empty) → `[]`
fn parse_csi_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(|&b| b == b';')
        .map(|part| {
            part.iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// Decode CSI modifier parameter into `Modifiers` bitflags.
///
/// The encoding is `1 + bitmask`. A parameter of 0 or 1 means no modifiers.
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// Expected byte length of a UTF-8 character from its lead byte.
/// Returns 0 for invalid lead bytes (continuation bytes, 0xF8..=0xFF).
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(data: &[u8]) -> Vec<Event> {
        Parser::new().advance(data)
    }

    fn parse_one(data: &[u8]) -> Event {
        let events = parse(data);
        assert_eq!(events.len(), 1, "expected one event from {data:?}, got {events:?}");
        events[0]
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn key_mod(code: KeyCode, modifiers: Modifiers) -> Event {
        Event::Key(KeyEvent::with(code, modifiers))
    }

    // ── ASCII ───────────────────────────────────────────────────────────

    #[test]
    fn ascii_single_char() {
        assert_eq!(parse_one(b"a"), key(KeyCode::Char('a')));
    }

    #[test]
    fn ascii_multiple_chars() {
        assert_eq!(
            parse(b"dd"),
            vec![key(KeyCode::Char('d')), key(KeyCode::Char('d'))]
        );
    }

    #[test]
    fn ascii_colon_and_digits() {
        assert_eq!(
            parse(b":10"),
            vec![
                key(KeyCode::Char(':')),
                key(KeyCode::Char('1')),
                key(KeyCode::Char('0')),
            ]
        );
    }

    // ── Control characters ─────────────────────────────────────────────

    #[test]
    fn ctrl_f_and_ctrl_b() {
        assert_eq!(parse_one(&[0x06]), key_mod(KeyCode::Char('f'), Modifiers::CTRL));
        assert_eq!(parse_one(&[0x02]), key_mod(KeyCode::Char('b'), Modifiers::CTRL));
    }

    #[test]
    fn ctrl_at() {
        assert_eq!(parse_one(&[0x00]), key_mod(KeyCode::Char('@'), Modifiers::CTRL));
    }

    #[test]
    fn enter_cr_and_lf() {
        assert_eq!(parse_one(b"\r"), key(KeyCode::Enter));
        assert_eq!(parse_one(b"\n"), key(KeyCode::Enter));
    }

    #[test]
    fn tab() {
        assert_eq!(parse_one(b"\t"), key(KeyCode::Tab));
    }

    #[test]
    fn backspace_both_encodings() {
        assert_eq!(parse_one(&[0x08]), key(KeyCode::Backspace));
        assert_eq!(parse_one(&[0x7F]), key(KeyCode::Backspace));
    }

    #[test]
    fn ctrl_event_reports_ctrl() {
        let Event::Key(k) = parse_one(&[0x06]) else {
            panic!("expected key");
        };
        assert!(k.is_ctrl());
        assert!(!KeyEvent::plain(KeyCode::Char('f')).is_ctrl());
    }

    // ── CSI ─────────────────────────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(parse_one(b"\x1b[A"), key(KeyCode::Up));
        assert_eq!(parse_one(b"\x1b[B"), key(KeyCode::Down));
        assert_eq!(parse_one(b"\x1b[C"), key(KeyCode::Right));
        assert_eq!(parse_one(b"\x1b[D"), key(KeyCode::Left));
    }

    #[test]
    fn arrow_with_modifier() {
        assert_eq!(
            parse_one(b"\x1b[1;5C"),
            key_mod(KeyCode::Right, Modifiers::CTRL)
        );
        assert_eq!(
            parse_one(b"\x1b[1;2A"),
            key_mod(KeyCode::Up, Modifiers::SHIFT)
        );
    }

    #[test]
    fn tilde_keys() {
        assert_eq!(parse_one(b"\x1b[1~"), key(KeyCode::Home));
        assert_eq!(parse_one(b"\x1b[3~"), key(KeyCode::Delete));
        assert_eq!(parse_one(b"\x1b[4~"), key(KeyCode::End));
        assert_eq!(parse_one(b"\x1b[5~"), key(KeyCode::PageUp));
        assert_eq!(parse_one(b"\x1b[6~"), key(KeyCode::PageDown));
    }

    #[test]
    fn unknown_tilde_is_skipped() {
        assert!(parse(b"\x1b[15~").is_empty());
    }

    #[test]
    fn shift_tab() {
        assert_eq!(parse_one(b"\x1b[Z"), key_mod(KeyCode::Tab, Modifiers::SHIFT));
    }

    #[test]
    fn ss3_sequences() {
        assert_eq!(parse_one(b"\x1bOA"), key(KeyCode::Up));
        assert_eq!(parse_one(b"\x1bOH"), key(KeyCode::Home));
        assert_eq!(parse_one(b"\x1bOF"), key(KeyCode::End));
    }

    // ── Alt ─────────────────────────────────────────────────────────────

    #[test]
    fn alt_char() {
        assert_eq!(parse_one(b"\x1bx"), key_mod(KeyCode::Char('x'), Modifiers::ALT));
    }

    #[test]
    fn alt_ctrl_char() {
        assert_eq!(
            parse_one(&[0x1B, 0x01]),
            key_mod(KeyCode::Char('a'), Modifiers::ALT | Modifiers::CTRL)
        );
    }

    // ── UTF-8 ───────────────────────────────────────────────────────────

    #[test]
    fn utf8_two_and_three_byte() {
        assert_eq!(parse_one("é".as_bytes()), key(KeyCode::Char('é')));
        assert_eq!(parse_one("€".as_bytes()), key(KeyCode::Char('€')));
    }

    #[test]
    fn utf8_incomplete_waits() {
        let bytes = "€".as_bytes();
        let mut p = Parser::new();
        assert!(p.advance(&bytes[..1]).is_empty());
        assert!(p.has_pending());
        assert_eq!(p.advance(&bytes[1..]), vec![key(KeyCode::Char('€'))]);
        assert!(!p.has_pending());
    }

    #[test]
    fn stray_continuation_byte_is_skipped() {
        assert_eq!(parse(&[0x80, b'a']), vec![key(KeyCode::Char('a'))]);
    }

    // ── Escape ambiguity ────────────────────────────────────────────────

    #[test]
    fn lone_escape_pending_then_flushed() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b").is_empty());
        assert!(p.has_pending());
        assert_eq!(p.flush(), vec![key(KeyCode::Escape)]);
        assert!(!p.has_pending());
    }

    #[test]
    fn split_escape_sequence() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b[").is_empty());
        assert_eq!(p.advance(b"B"), vec![key(KeyCode::Down)]);
    }

    #[test]
    fn escape_followed_by_unknown_byte() {
        assert_eq!(
            parse(&[0x1B, 0x80]),
            vec![key(KeyCode::Escape)]
        );
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    #[test]
    fn csi_params() {
        assert_eq!(parse_csi_params(b""), Vec::<u16>::new());
        assert_eq!(parse_csi_params(b"1;5"), vec![1, 5]);
        assert_eq!(parse_csi_params(b"99999"), vec![u16::MAX]);
    }

    #[test]
    fn modifier_decoding() {
        assert_eq!(decode_modifiers(0), Modifiers::empty());
        assert_eq!(decode_modifiers(1), Modifiers::empty());
        assert_eq!(decode_modifiers(2), Modifiers::SHIFT);
        assert_eq!(decode_modifiers(3), Modifiers::ALT);
        assert_eq!(decode_modifiers(5), Modifiers::CTRL);
        assert_eq!(decode_modifiers(6), Modifiers::CTRL | Modifiers::SHIFT);
    }

    #[test]
    fn utf8_lengths() {
        assert_eq!(utf8_char_len(b'a'), 1);
        assert_eq!(utf8_char_len(0xC3), 2);
        assert_eq!(utf8_char_len(0xE2), 3);
        assert_eq!(utf8_char_len(0xF0), 4);
        assert_eq!(utf8_char_len(0x80), 0);
    }
}
