//! Colorschemes: ten named colors read from a `.clad` file.
//!
//! A `.clad` file is a list of `key = #rrggbb` lines. All whitespace is
//! ignored, `//` starts a comment, unknown keys are ignored, and a missing
//! or malformed value falls back to black for `background` and white for
//! everything else.

use std::collections::HashMap;

use quill_term::color::CellColor;

// ---------------------------------------------------------------------------
// Colorscheme
// ---------------------------------------------------------------------------

/// A complete set of editor colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colorscheme {
    pub background: CellColor,
    pub foreground: CellColor,
    pub comment: CellColor,
    pub accent: CellColor,
    /// `color1` through `color6`, in order.
    pub palette: [CellColor; 6],
}

impl Default for Colorscheme {
    fn default() -> Self {
        Self {
            background: CellColor::BLACK,
            foreground: CellColor::WHITE,
            comment: CellColor::WHITE,
            accent: CellColor::WHITE,
            palette: [CellColor::WHITE; 6],
        }
    }
}

impl Colorscheme {
    /// Parse the contents of a `.clad` file. Never fails; see the module docs
    /// for the fallback rules.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let entries = parse_entries(source);
        let color = |key: &str, fallback: CellColor| {
            entries
                .get(key)
                .and_then(|value| CellColor::hex(value))
                .unwrap_or(fallback)
        };

        let mut palette = [CellColor::WHITE; 6];
        for (i, slot) in palette.iter_mut().enumerate() {
            *slot = color(&format!("color{}", i + 1), CellColor::WHITE);
        }

        Self {
            background: color("background", CellColor::BLACK),
            foreground: color("foreground", CellColor::WHITE),
            comment: color("comment", CellColor::WHITE),
            accent: color("accent", CellColor::WHITE),
            palette,
        }
    }
}

/// Split `.clad` source into `key → value`, last definition winning.
fn parse_entries(source: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();

    for line in source.lines() {
        let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        let content = compact.find("//").map_or(compact.as_str(), |at| &compact[..at]);

        if let Some((key, value)) = content.split_once('=') {
            entries.insert(key.to_owned(), value.to_owned());
        }
    }

    entries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
