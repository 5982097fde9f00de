//! Where quill looks for its configuration, and reading `quillrc`.
//!
//! ```text
//! <config dir>/quill/
//! ├── quillrc          :set commands run at startup
//! └── colors/
//!     └── *.clad       colorschemes
//! ```
//!
//! `QUILL_CONFIG_DIR` replaces `<config dir>/quill` entirely.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "QUILL_CONFIG_DIR";

const APP_DIR: &str = "quill";
const RC_FILE: &str = "quillrc";
const COLORS_DIR: &str = "colors";

/// The config directory, or `None` when no home directory can be found.
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join(APP_DIR))
}

/// The cache directory, used for the log file.
#[must_use]
pub fn cache_dir() -> Option<PathBuf> {
    let strategy = choose_base_strategy().ok()?;
    Some(strategy.cache_dir().join(APP_DIR))
}

#[must_use]
pub fn rc_file(config_dir: &Path) -> PathBuf {
    config_dir.join(RC_FILE)
}

#[must_use]
pub fn colors_dir(config_dir: &Path) -> PathBuf {
    config_dir.join(COLORS_DIR)
}

/// Read the command lines of an rc file.
///
/// `//` starts a comment. Lines are trimmed at the end and blank ones are
/// dropped. A missing file has no lines.
///
/// # Errors
///
/// Any I/O error other than "not found".
pub fn read_rc(path: &Path) -> io::Result<Vec<String>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("no rc file at {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split_once("//").map_or(line, |(code, _)| code).trim_end())
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn comments_and_blanks_are_dropped() {
        let text = "// header\nset tabs\n\n   \nset tabsize=2 // two\n  // indented\n";
        assert_eq!(parse_rc(text), vec!["set tabs", "set tabsize=2"]);
    }

    #[test]
    fn leading_whitespace_is_kept() {
        assert_eq!(parse_rc("  set number\t\n"), vec!["  set number"]);
    }

    #[test]
    fn rc_file_lines_feed_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = rc_file(dir.path());
        fs::write(&path, "set notabs\nset colorscheme=nord // theme\n").unwrap();
        let lines = read_rc(&path).unwrap();

        let mut options = crate::options::Options::new();
        assert_eq!(options.apply_rc(lines.iter().map(String::as_str)), 2);
        assert_eq!(options.get_string("colorscheme"), Ok("nord"));
    }

    #[test]
    fn missing_rc_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_rc(&dir.path().join("quillrc")).unwrap().is_empty());
    }

    #[test]
    fn layout_under_config_dir() {
        let base = Path::new("/cfg");
        assert_eq!(rc_file(base), PathBuf::from("/cfg/quillrc"));
        assert_eq!(colors_dir(base), PathBuf::from("/cfg/colors"));
    }
}
