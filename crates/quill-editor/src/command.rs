//! Command-line mode: parsing what the user types after `:`.
//!
//! # Supported commands
//!
//! | Command              | Operations                 |
//! |----------------------|----------------------------|
//! | `:q`                 | Quit (fails when modified) |
//! | `:q!`                | `ForceQuit`                |
//! | `:w`                 | Write                      |
//! | `:wq`                | Write, Quit                |
//! | `:colo`, `:colorscheme` | `PrintColorscheme`     |
//! | `:set <arg>`         | Set                        |
//! | `:echo <arg>`        | Echo                       |
//! | `:<N>`               | `JumpLine`                 |
//!
//! Several commands can be chained with `|`. A `|` between matching quotes is
//! part of the argument: `:echo "a | b"` is one command.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// What a parsed command asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Quit,
    ForceQuit,
    Write,
    PrintColorscheme,
    Set,
    Echo,
    JumpLine,
    /// Unknown name, or an argument command without its argument.
    InvalidCommand,
    /// A no-argument command given an argument.
    TrailingCharacters,
}

/// One operation with the command name and argument it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub op: Operation,
    pub name: String,
    pub arg: String,
}

impl Command {
    fn new(op: Operation, name: &str, arg: &str) -> Self {
        Self {
            op,
            name: name.to_owned(),
            arg: arg.to_owned(),
        }
    }

    /// The 1-based line number of a `JumpLine` command.
    ///
    /// # Errors
    ///
    /// [`JumpError`] if the name is not a number that fits in `usize`.
    pub fn jump_target(&self) -> Result<usize, JumpError> {
        self.name.parse().map_err(|_| JumpError {
            digits: self.name.clone(),
        })
    }
}

/// A `:N` target that is not a usable line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid line number: {digits}")]
pub struct JumpError {
    pub digits: String,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Commands that take no argument.
fn plain_ops(name: &str) -> Option<&'static [Operation]> {
    Some(match name {
        "q" => &[Operation::Quit],
        "q!" => &[Operation::ForceQuit],
        "w" => &[Operation::Write],
        "wq" => &[Operation::Write, Operation::Quit],
        "colo" | "colorscheme" => &[Operation::PrintColorscheme],
        _ => return None,
    })
}

/// Commands that require an argument.
fn arg_op(name: &str) -> Option<Operation> {
    match name {
        "set" => Some(Operation::Set),
        "echo" => Some(Operation::Echo),
        _ => None,
    }
}

/// A line number: digits only, no leading zero.
fn is_line_number(name: &str) -> bool {
    !name.starts_with('0') && !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a full command line into operations, in order.
///
/// An empty or all-space line gives no operations.
#[must_use]
pub fn get_command(line: &str) -> Vec<Command> {
    split_pipes(line)
        .into_iter()
        .flat_map(parse_single)
        .collect()
}

/// Split on `|` outside quotes.
///
/// Quotes nest as a stack: a quote equal to the innermost open one closes
/// it, any other quote opens a new level. An empty trailing piece is
/// dropped.
fn split_pipes(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quotes: Vec<char> = Vec::new();
    let mut start = 0;

    for (i, ch) in line.char_indices() {
        match ch {
            '|' if quotes.is_empty() => {
                parts.push(&line[start..i]);
                start = i + 1;
            }
            '"' | '\'' => {
                if quotes.last() == Some(&ch) {
                    quotes.pop();
                } else {
                    quotes.push(ch);
                }
            }
            _ => {}
        }
    }

    if start < line.len() {
        parts.push(&line[start..]);
    }
    parts
}

/// Parse one `|`-free command.
fn parse_single(part: &str) -> Vec<Command> {
    let trimmed = part.trim_matches(' ');
    let (name, arg) = trimmed.split_once(' ').unwrap_or((trimmed, ""));

    if name.is_empty() {
        return Vec::new();
    }

    let has_arg = !arg.is_empty();

    if !has_arg && is_line_number(name) {
        return vec![Command::new(Operation::JumpLine, name, arg)];
    }

    let plain = plain_ops(name);
    let with_arg = arg_op(name).filter(|_| has_arg);

    match (plain, with_arg) {
        (_, Some(op)) => vec![Command::new(op, name, arg)],
        (Some(_), None) if has_arg => {
            vec![Command::new(Operation::TrailingCharacters, name, arg)]
        }
        (Some(ops), None) => ops.iter().map(|&op| Command::new(op, name, arg)).collect(),
        (None, None) => vec![Command::new(Operation::InvalidCommand, name, arg)],
    }
}

// ---------------------------------------------------------------------------
// CommandLine
// ---------------------------------------------------------------------------

/// The text typed after `:`. Typing appends; backspace removes the last char.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    input: String,
}

impl CommandLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push(&mut self, ch: char) {
        self.input.push(ch);
    }

    /// Remove the last char. Returns `false` when already empty.
    pub fn backspace(&mut self) -> bool {
        self.input.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    /// Take the text, leaving the line empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.input)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ops(line: &str) -> Vec<Operation> {
        get_command(line).into_iter().map(|c| c.op).collect()
    }

    // ── Single commands ──────────────────────────────────────────────────

    #[test]
    fn empty_line_has_no_operations() {
        assert_eq!(ops(""), vec![]);
        assert_eq!(ops("   "), vec![]);
    }

    #[test]
    fn quit_variants() {
        assert_eq!(ops("q"), vec![Operation::Quit]);
        assert_eq!(ops("q!"), vec![Operation::ForceQuit]);
    }

    #[test]
    fn write_and_quit() {
        assert_eq!(ops("w"), vec![Operation::Write]);
        assert_eq!(ops("wq"), vec![Operation::Write, Operation::Quit]);
    }

    #[test]
    fn colorscheme_aliases() {
        assert_eq!(ops("colo"), vec![Operation::PrintColorscheme]);
        assert_eq!(ops("colorscheme"), vec![Operation::PrintColorscheme]);
    }

    #[test]
    fn surrounding_spaces_are_trimmed() {
        assert_eq!(ops("  wq  "), vec![Operation::Write, Operation::Quit]);
    }

    #[test]
    fn tabs_are_not_trimmed() {
        assert_eq!(ops("\tq"), vec![Operation::InvalidCommand]);
    }

    #[test]
    fn unknown_name_is_invalid() {
        let cmds = get_command("bogus");
        assert_eq!(cmds, vec![Command::new(Operation::InvalidCommand, "bogus", "")]);
    }

    #[test]
    fn plain_command_with_arg_is_trailing_characters() {
        assert_eq!(ops("q extra"), vec![Operation::TrailingCharacters]);
        assert_eq!(ops("w file.txt"), vec![Operation::TrailingCharacters]);
    }

    #[test]
    fn arg_command_without_arg_is_invalid() {
        assert_eq!(ops("set"), vec![Operation::InvalidCommand]);
        assert_eq!(ops("echo"), vec![Operation::InvalidCommand]);
    }

    #[test]
    fn set_keeps_argument() {
        assert_eq!(
            get_command("set tabsize=8"),
            vec![Command::new(Operation::Set, "set", "tabsize=8")]
        );
    }

    #[test]
    fn argument_splits_on_first_space_only() {
        assert_eq!(
            get_command("echo 'a b c'"),
            vec![Command::new(Operation::Echo, "echo", "'a b c'")]
        );
    }

    // ── Line numbers ─────────────────────────────────────────────────────

    #[test]
    fn number_is_jump_line() {
        assert_eq!(
            get_command("10"),
            vec![Command::new(Operation::JumpLine, "10", "")]
        );
    }

    #[test]
    fn leading_zero_is_not_a_line_number() {
        assert_eq!(ops("010"), vec![Operation::InvalidCommand]);
        assert_eq!(ops("0"), vec![Operation::InvalidCommand]);
    }

    #[test]
    fn number_with_arg_is_invalid() {
        assert_eq!(ops("10 x"), vec![Operation::InvalidCommand]);
    }

    #[test]
    fn jump_target_parses() {
        let cmd = &get_command("42")[0];
        assert_eq!(cmd.jump_target(), Ok(42));
    }

    #[test]
    fn oversized_jump_target_is_an_error() {
        let cmd = &get_command("99999999999999999999999999")[0];
        assert_eq!(cmd.op, Operation::JumpLine);
        let err = cmd.jump_target().unwrap_err();
        assert_eq!(err.to_string(), "Invalid line number: 99999999999999999999999999");
    }

    // ── Pipes ────────────────────────────────────────────────────────────

    #[test]
    fn pipes_chain_commands() {
        let cmds = get_command("set tabs | set number | 10 | wq");
        assert_eq!(
            cmds,
            vec![
                Command::new(Operation::Set, "set", "tabs"),
                Command::new(Operation::Set, "set", "number"),
                Command::new(Operation::JumpLine, "10", ""),
                Command::new(Operation::Write, "wq", ""),
                Command::new(Operation::Quit, "wq", ""),
            ]
        );
    }

    #[test]
    fn quoted_pipe_is_part_of_argument() {
        assert_eq!(
            get_command("echo \"a | b\""),
            vec![Command::new(Operation::Echo, "echo", "\"a | b\"")]
        );
    }

    #[test]
    fn nested_quotes_protect_pipe() {
        assert_eq!(
            get_command("echo \"it's | fine\""),
            vec![Command::new(Operation::Echo, "echo", "\"it's | fine\"")]
        );
    }

    #[test]
    fn empty_pieces_are_skipped() {
        assert_eq!(ops("w||q"), vec![Operation::Write, Operation::Quit]);
        assert_eq!(ops("w|"), vec![Operation::Write]);
    }

    #[test]
    fn split_pipes_keeps_raw_pieces() {
        assert_eq!(split_pipes("a|b c| d"), vec!["a", "b c", " d"]);
        assert_eq!(split_pipes(""), Vec::<&str>::new());
    }

    // ── CommandLine ──────────────────────────────────────────────────────

    #[test]
    fn command_line_push_and_backspace() {
        let mut cl = CommandLine::new();
        assert!(cl.input().is_empty());
        cl.push('w');
        cl.push('q');
        assert_eq!(cl.input(), "wq");
        assert!(cl.backspace());
        assert_eq!(cl.input(), "w");
        assert!(cl.backspace());
        assert!(!cl.backspace());
    }

    #[test]
    fn command_line_take_empties() {
        let mut cl = CommandLine::new();
        cl.push('q');
        assert_eq!(cl.take(), "q");
        assert!(cl.input().is_empty());
    }
}
