//! Saved-content tracking for the "No write since last change" check.
//!
//! There is no undo: the history only remembers what the file looked like
//! after the last load or write.

/// The lines as they were last loaded or written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    saved: Vec<String>,
}

impl History {
    #[must_use]
    pub const fn new() -> Self {
        Self { saved: Vec::new() }
    }

    /// Record `lines` as the saved state.
    pub fn snapshot(&mut self, lines: &[String]) {
        lines.clone_into(&mut self.saved);
    }

    /// True when `lines` differ from the last snapshot.
    #[must_use]
    pub fn has_unsaved_changes(&self, lines: &[String]) -> bool {
        self.saved != lines
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn fresh_history_matches_nothing() {
        let history = History::new();
        assert!(!history.has_unsaved_changes(&[]));
        assert!(history.has_unsaved_changes(&lines(&[""])));
    }

    #[test]
    fn snapshot_clears_changes() {
        let mut history = History::new();
        let text = lines(&["a", "b"]);
        assert!(history.has_unsaved_changes(&text));
        history.snapshot(&text);
        assert!(!history.has_unsaved_changes(&text));
    }

    #[test]
    fn any_difference_is_a_change() {
        let mut history = History::new();
        history.snapshot(&lines(&["a", "b"]));
        assert!(history.has_unsaved_changes(&lines(&["a", "b", ""])));
        assert!(history.has_unsaved_changes(&lines(&["a", "c"])));
        assert!(history.has_unsaved_changes(&lines(&["a"])));
    }

    #[test]
    fn edit_then_revert_is_clean() {
        let mut history = History::new();
        history.snapshot(&lines(&["hello"]));
        let edited = lines(&["hell"]);
        assert!(history.has_unsaved_changes(&edited));
        assert!(!history.has_unsaved_changes(&lines(&["hello"])));
    }
}
