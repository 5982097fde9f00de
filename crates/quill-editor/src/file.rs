//! Reading and writing files as lists of lines.
//!
//! Lines are separated by `\n` only. A `\r` before the newline stays part of
//! the line.

use std::fs;
use std::io;
use std::path::Path;

/// Read `path` into lines.
///
/// A trailing newline does not produce an extra empty line. A missing file
/// reads as no lines at all, so editing a new file starts empty.
///
/// # Errors
///
/// Any I/O error other than "not found", or invalid UTF-8.
pub fn load_lines(path: &Path) -> io::Result<Vec<String>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("{} does not exist yet, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mut lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    log::info!("loaded {} ({} lines)", path.display(), lines.len());
    Ok(lines)
}

/// Write each line followed by `\n`.
///
/// An empty slice truncates an existing file to zero bytes and does not
/// create a missing one.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn save_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    if lines.is_empty() {
        if path.exists() {
            fs::write(path, "")?;
            log::info!("truncated {}", path.display());
        } else {
            log::debug!("nothing to write to {}", path.display());
        }
        return Ok(());
    }

    let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(path, content)?;
    log::info!("wrote {} ({} lines)", path.display(), lines.len());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
