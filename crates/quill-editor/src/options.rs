//! Editor options: the `:set` system.
//!
//! # Supported syntax
//!
//! | Syntax               | Effect                          |
//! |----------------------|---------------------------------|
//! | `:set option`        | Enable a boolean option         |
//! | `:set nooption`      | Disable a boolean option        |
//! | `:set option=N`      | Assign an integer (digits only) |
//! | `:set option=value`  | Assign a string                 |
//!
//! # Options
//!
//! | Name          | Type    | Default |
//! |---------------|---------|---------|
//! | `number`      | bool    | true    |
//! | `tabs`        | bool    | false   |
//! | `tabsize`     | integer | 4       |
//! | `colorscheme` | string  | `""`    |

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::command::{Operation, get_command};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The value type an option lookup asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Int,
    String,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::String => "string",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("no {kind} option named '{name}'")]
    Unknown { kind: OptionKind, name: String },
}

pub type Result<T> = std::result::Result<T, OptionError>;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Typed option store. The set of names is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    bools: BTreeMap<&'static str, bool>,
    ints: BTreeMap<&'static str, usize>,
    strings: BTreeMap<&'static str, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bools: BTreeMap::from([("number", true), ("tabs", false)]),
            ints: BTreeMap::from([("tabsize", 4)]),
            strings: BTreeMap::from([("colorscheme", String::new())]),
        }
    }
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// [`OptionError::Unknown`] if `name` is not a boolean option.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.bools
            .get(name)
            .copied()
            .ok_or_else(|| unknown(OptionKind::Bool, name))
    }

    /// # Errors
    ///
    /// [`OptionError::Unknown`] if `name` is not an integer option.
    pub fn get_int(&self, name: &str) -> Result<usize> {
        self.ints
            .get(name)
            .copied()
            .ok_or_else(|| unknown(OptionKind::Int, name))
    }

    /// # Errors
    ///
    /// [`OptionError::Unknown`] if `name` is not a string option.
    pub fn get_string(&self, name: &str) -> Result<&str> {
        self.strings
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| unknown(OptionKind::String, name))
    }

    /// Apply one `:set` argument. Returns `false` (and changes nothing) if
    /// it names no option or the value does not fit the option's type.
    ///
    /// The forms are tried in order: `int=digits`, `string=value`, `bool`,
    /// `nobool`.
    pub fn try_set(&mut self, arg: &str) -> bool {
        if let Some((name, value)) = arg.split_once('=') {
            if let Some(slot) = self.ints.get_mut(name) {
                return match parse_digits(value) {
                    Some(n) => {
                        *slot = n;
                        true
                    }
                    None => false,
                };
            }
            if let Some(slot) = self.strings.get_mut(name) {
                value.clone_into(slot);
                return true;
            }
            return false;
        }

        if let Some(slot) = self.bools.get_mut(arg) {
            *slot = true;
            return true;
        }
        if let Some(slot) = arg.strip_prefix("no").and_then(|n| self.bools.get_mut(n)) {
            *slot = false;
            return true;
        }
        false
    }

    /// Apply the `set` commands found in rc lines. Other commands are
    /// ignored. Returns how many `set` arguments were accepted.
    pub fn apply_rc<'a, I>(&mut self, lines: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut applied = 0;
        for line in lines {
            for cmd in get_command(line) {
                if cmd.op != Operation::Set {
                    continue;
                }
                if self.try_set(&cmd.arg) {
                    applied += 1;
                } else {
                    log::warn!("rc: unknown option '{}'", cmd.arg);
                }
            }
        }
        applied
    }

    /// Every option as `name=value`, sorted by name within each type.
    pub fn iter_display(&self) -> impl Iterator<Item = String> + '_ {
        let bools = self.bools.iter().map(|(k, v)| format_bool(k, *v));
        let ints = self.ints.iter().map(|(k, v)| format!("{k}={v}"));
        let strings = self.strings.iter().map(|(k, v)| format!("{k}={v}"));
        bools.chain(ints).chain(strings)
    }
}

fn unknown(kind: OptionKind, name: &str) -> OptionError {
    OptionError::Unknown {
        kind,
        name: name.to_owned(),
    }
}

/// Non-empty ASCII digits that fit in `usize`.
fn parse_digits(value: &str) -> Option<usize> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Returns `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
