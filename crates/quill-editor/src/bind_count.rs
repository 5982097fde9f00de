//! Repeat counts typed before a command (`3j`, `12G`).

/// A pending decimal count.
///
/// Empty reads as 1 but stays distinguishable from an explicit `1` through
/// [`is_empty`](Self::is_empty). Reading always resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindCount {
    /// Accumulated digits; 0 means nothing typed.
    digits: usize,
}

impl BindCount {
    #[must_use]
    pub const fn new() -> Self {
        Self { digits: 0 }
    }

    /// Append decimal digit `digit` (0–9). Saturates instead of overflowing.
    pub fn add_digit(&mut self, digit: u32) {
        debug_assert!(digit < 10, "not a decimal digit: {digit}");
        self.digits = self
            .digits
            .saturating_mul(10)
            .saturating_add(digit as usize);
    }

    /// The count, or 1 when empty. Resets to empty.
    pub fn value(&mut self) -> usize {
        let value = if self.digits == 0 { 1 } else { self.digits };
        self.reset();
        value
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.digits == 0
    }

    pub fn reset(&mut self) {
        self.digits = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
