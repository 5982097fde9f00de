//! Vim-style modal editing.
//!
//! The editor is always in exactly one [`Mode`]. Each mode changes how input
//! is interpreted and how far right the cursor may go:
//!
//! | Mode      | Banner         | Cursor limit       | Purpose              |
//! |-----------|----------------|--------------------|----------------------|
//! | Normal    | (none)         | `0..len-1`         | Navigation, commands |
//! | Insert    | `-- INSERT --` | `0..len`           | Typing text          |
//! | Visual    | `-- VISUAL --` | `0..len`           | Selecting text       |
//! | V-Line    | `-- V-LINE --` | `0..len`           | Selecting lines      |
//! | Command   | (none)         | (in command line)  | `:` commands         |
//!
//! `Exit` is terminal: the driver loop stops as soon as it is reached.

use std::fmt;

// ---------------------------------------------------------------------------
// VisualKind
// ---------------------------------------------------------------------------

/// The sub-mode of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// `v`: character-wise selection.
    Char,
    /// `V`: line-wise selection (always selects full lines).
    Line,
}

impl fmt::Display for VisualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char => f.write_str("VISUAL"),
            Self::Line => f.write_str("V-LINE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The current editing mode.
///
/// Pure data. Key dispatch and the enter/exit hooks live on the editor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual(VisualKind),
    Command,
    Exit,
}

impl Mode {
    /// Human-readable name, for logs.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Visual(VisualKind::Char) => "VISUAL",
            Self::Visual(VisualKind::Line) => "V-LINE",
            Self::Command => "COMMAND",
            Self::Exit => "EXIT",
        }
    }

    /// The status-line banner printed on entering this mode.
    #[must_use]
    pub const fn banner(self) -> Option<&'static str> {
        match self {
            Self::Insert => Some("-- INSERT --"),
            Self::Visual(VisualKind::Char) => Some("-- VISUAL --"),
            Self::Visual(VisualKind::Line) => Some("-- V-LINE --"),
            Self::Normal | Self::Command | Self::Exit => None,
        }
    }

    /// True if the cursor may sit one past the last char.
    #[inline]
    #[must_use]
    pub const fn cursor_past_end(self) -> bool {
        !matches!(self, Self::Normal)
    }

    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual(_))
    }

    /// The visual sub-mode, if any.
    #[inline]
    #[must_use]
    pub const fn visual_kind(self) -> Option<VisualKind> {
        match self {
            Self::Visual(kind) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }

    #[test]
    fn banners() {
        assert_eq!(Mode::Insert.banner(), Some("-- INSERT --"));
        assert_eq!(Mode::Visual(VisualKind::Char).banner(), Some("-- VISUAL --"));
        assert_eq!(Mode::Visual(VisualKind::Line).banner(), Some("-- V-LINE --"));
        assert_eq!(Mode::Normal.banner(), None);
        assert_eq!(Mode::Command.banner(), None);
    }

    #[test]
    fn only_normal_stops_before_line_end() {
        assert!(!Mode::Normal.cursor_past_end());
        assert!(Mode::Insert.cursor_past_end());
        assert!(Mode::Visual(VisualKind::Char).cursor_past_end());
    }

    #[test]
    fn visual_kind_accessor() {
        assert_eq!(Mode::Visual(VisualKind::Line).visual_kind(), Some(VisualKind::Line));
        assert_eq!(Mode::Insert.visual_kind(), None);
        assert!(Mode::Visual(VisualKind::Char).is_visual());
        assert!(!Mode::Command.is_visual());
    }

    #[test]
    fn display_names() {
        assert_eq!(Mode::Normal.to_string(), "NORMAL");
        assert_eq!(Mode::Visual(VisualKind::Line).to_string(), "V-LINE");
        assert_eq!(VisualKind::Char.to_string(), "VISUAL");
    }
}
