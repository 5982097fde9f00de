// SPDX-License-Identifier: MIT
//
// Terminal cell colors.
//
// `CellColor` is what the surface converts to SGR sequences. Colorscheme
// files spell colors as `#rrggbb`; `CellColor::hex` is the one parser for
// that notation.

use std::fmt;

// ─── CellColor ───────────────────────────────────────────────────────────────

/// Compact color for terminal output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),

    /// ANSI 256-color palette index.
    Ansi256(u8),

    /// Terminal default color (inherits from terminal settings).
    #[default]
    Default,
}

impl CellColor {
    /// Pure black, `#000000`.
    pub const BLACK: Self = Self::Rgb(0, 0, 0);

    /// Pure white, `#ffffff`.
    pub const WHITE: Self = Self::Rgb(255, 255, 255);

    /// Parse `#rrggbb` into an RGB color.
    ///
    /// Exactly a `#` and six hex digits; anything else is `None`.
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        match s.strip_prefix('#')?.as_bytes() {
            &[r1, r2, g1, g2, b1, b2] => Some(Self::Rgb(
                parse_hex_byte(r1, r2)?,
                parse_hex_byte(g1, g2)?,
                parse_hex_byte(b1, b2)?,
            )),
            _ => None,
        }
    }

    /// Whether this is the terminal default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Ansi256(idx) => write!(f, "ansi({idx})"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ─── Hex Parsing ─────────────────────────────────────────────────────────────

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
const fn parse_hex_byte(hi: u8, lo: u8) -> Option<u8> {
    match (parse_hex_digit(hi), parse_hex_digit(lo)) {
        (Some(hi), Some(lo)) => Some(hi << 4 | lo),
        _ => None,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_terminal_default() {
        assert!(CellColor::default().is_default());
        assert!(!CellColor::BLACK.is_default());
    }

    #[test]
    fn hex_six_digits() {
        assert_eq!(CellColor::hex("#282a36"), Some(CellColor::Rgb(0x28, 0x2a, 0x36)));
    }

    #[test]
    fn hex_is_case_insensitive() {
        assert_eq!(CellColor::hex("#FFb86C"), Some(CellColor::Rgb(0xff, 0xb8, 0x6c)));
    }

    #[test]
    fn hex_short_form_is_rejected() {
        assert_eq!(CellColor::hex("#f0a"), None);
    }

    #[test]
    fn hex_requires_hash() {
        assert_eq!(CellColor::hex("282a36"), None);
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert_eq!(CellColor::hex(""), None);
        assert_eq!(CellColor::hex("#"), None);
        assert_eq!(CellColor::hex("#12345"), None);
        assert_eq!(CellColor::hex("#zzzzzz"), None);
        assert_eq!(CellColor::hex("#1234567"), None);
    }

    #[test]
    fn debug_prints_hex() {
        assert_eq!(format!("{:?}", CellColor::Rgb(255, 0, 16)), "#ff0010");
        assert_eq!(CellColor::Ansi256(7).to_string(), "ansi(7)");
        assert_eq!(CellColor::Default.to_string(), "default");
    }
}
