//! Color pairs: the numbered (foreground, background) combinations the
//! editor draws with.
//!
//! Nine foreground slots times two backgrounds give eighteen pairs,
//! numbered 1..=18. Pair 0 is left to the terminal.

use quill_term::color::CellColor;
use quill_term::surface::Surface;

use crate::colorscheme::Colorscheme;

/// Number of foreground slots.
pub const FOREGROUND_SLOTS: u8 = 9;

/// Number of pairs a colorscheme registers.
pub const PAIR_COUNT: u8 = FOREGROUND_SLOTS * 2;

/// Which colorscheme color text is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColorForeground {
    Default = 1,
    Comment = 2,
    Accent = 3,
    Color1 = 4,
    Color2 = 5,
    Color3 = 6,
    Color4 = 7,
    Color5 = 8,
    Color6 = 9,
}

impl ColorForeground {
    pub const ALL: [Self; FOREGROUND_SLOTS as usize] = [
        Self::Default,
        Self::Comment,
        Self::Accent,
        Self::Color1,
        Self::Color2,
        Self::Color3,
        Self::Color4,
        Self::Color5,
        Self::Color6,
    ];

    /// The color this slot takes in `scheme`.
    #[must_use]
    pub const fn resolve(self, scheme: &Colorscheme) -> CellColor {
        match self {
            Self::Default => scheme.foreground,
            Self::Comment => scheme.comment,
            Self::Accent => scheme.accent,
            Self::Color1 => scheme.palette[0],
            Self::Color2 => scheme.palette[1],
            Self::Color3 => scheme.palette[2],
            Self::Color4 => scheme.palette[3],
            Self::Color5 => scheme.palette[4],
            Self::Color6 => scheme.palette[5],
        }
    }
}

/// What sits behind the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorBackground {
    Default,
    Accent,
}

impl ColorBackground {
    /// The color this background takes in `scheme`.
    #[must_use]
    pub const fn resolve(self, scheme: &Colorscheme) -> CellColor {
        match self {
            Self::Default => scheme.background,
            Self::Accent => scheme.accent,
        }
    }
}

/// Pair number for `fg` on `bg`.
#[must_use]
pub const fn pair_index(fg: ColorForeground, bg: ColorBackground) -> u8 {
    let base = match bg {
        ColorBackground::Default => 0,
        ColorBackground::Accent => FOREGROUND_SLOTS,
    };
    base + fg as u8
}

/// Register every pair of `scheme` on `surface`.
pub fn install_pairs<S: Surface + ?Sized>(scheme: &Colorscheme, surface: &mut S) {
    for bg in [ColorBackground::Default, ColorBackground::Accent] {
        for fg in ColorForeground::ALL {
            surface.init_color_pair(pair_index(fg, bg), fg.resolve(scheme), bg.resolve(scheme));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
