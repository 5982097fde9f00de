// SPDX-License-Identifier: MIT
//
// quill: a modal terminal text editor.
//
// This is the binary that wires the crates together:
//
//   quill-term   → raw terminal, ANSI output, key parsing
//   quill-theme  → colorschemes and color pairs
//   quill-editor → buffer, modes, commands, drawing
//
// Startup order:
//
//   logging → load file → quillrc → colors/*.clad → terminal
//     → activate colorscheme → -c command → edit until :q
//
// The log goes to a file; the terminal is in raw mode the whole time.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use quill_editor::editor::{Editor, EditorContext};
use quill_editor::file;
use quill_editor::options::Options;
use quill_editor::runtime;
use quill_term::surface::TermSurface;
use quill_theme::ColorschemeRegistry;

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "quill", about, version)]
struct Cli {
    /// File to edit; created on the first write if it does not exist
    file: PathBuf,

    /// Command line to run at startup, as typed after `:`
    #[arg(short = 'c', long = "cmd", value_name = "COMMAND", default_value = "")]
    cmd: String,

    /// Increase logging verbosity (repeat for more detail)
    #[arg(short = 'v', action = ArgAction::Count)]
    verbosity: u8,

    /// Write the log here instead of the cache directory
    #[arg(long = "log", value_name = "FILE")]
    log: Option<PathBuf>,
}

// ─── Logging ────────────────────────────────────────────────────────────────

const fn level_for(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn default_log_file() -> Option<PathBuf> {
    runtime::cache_dir().map(|dir| dir.join("quill.log"))
}

fn setup_logging(path: &Path, verbosity: u8) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let target = fern::log_file(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message));
        })
        .level(level_for(verbosity))
        .chain(target)
        .apply()
        .context("installing logger")?;
    Ok(())
}

// ─── Configuration ──────────────────────────────────────────────────────────

/// Options from `quillrc` and every colorscheme under `colors/`.
fn load_config() -> (Options, ColorschemeRegistry) {
    let mut options = Options::new();
    let mut colorschemes = ColorschemeRegistry::new();

    let Some(dir) = runtime::config_dir() else {
        log::warn!("no config directory, using defaults");
        return (options, colorschemes);
    };
    log::info!("config directory {}", dir.display());

    let rc = runtime::rc_file(&dir);
    match runtime::read_rc(&rc) {
        Ok(lines) => {
            let applied = options.apply_rc(lines.iter().map(String::as_str));
            log::info!("{applied} option(s) from {}", rc.display());
        }
        Err(err) => log::warn!("cannot read {}: {err}", rc.display()),
    }

    let found = colorschemes.fetch_available(&runtime::colors_dir(&dir));
    log::info!("{found} colorscheme(s) available");

    (options, colorschemes)
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.log.clone().or_else(default_log_file) {
        setup_logging(&path, cli.verbosity)?;
    }

    let lines = file::load_lines(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    let (options, colorschemes) = load_config();
    for option in options.iter_display() {
        log::debug!("option {option}");
    }

    let surface = TermSurface::new().context("initializing terminal")?;
    let ctx = EditorContext {
        surface,
        options,
        colorschemes,
    };
    let mut editor = Editor::new(ctx, &cli.file, &lines);
    editor.run(&cli.cmd).context("terminal I/O")?;

    log::info!("exiting");
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_requires_a_file() {
        assert!(Cli::try_parse_from(["quill"]).is_err());
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["quill", "notes.txt"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("notes.txt"));
        assert_eq!(cli.cmd, "");
        assert_eq!(cli.verbosity, 0);
        assert_eq!(cli.log, None);
    }

    #[test]
    fn cli_all_flags() {
        let cli = Cli::try_parse_from([
            "quill", "-vv", "-c", "set tabs | 10", "--log", "/tmp/q.log", "a.txt",
        ])
        .unwrap();
        assert_eq!(cli.cmd, "set tabs | 10");
        assert_eq!(cli.verbosity, 2);
        assert_eq!(cli.log, Some(PathBuf::from("/tmp/q.log")));
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), log::LevelFilter::Warn);
        assert_eq!(level_for(1), log::LevelFilter::Info);
        assert_eq!(level_for(2), log::LevelFilter::Debug);
        assert_eq!(level_for(7), log::LevelFilter::Trace);
    }
}
