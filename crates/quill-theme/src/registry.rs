//! Colorscheme registry: every scheme found on disk, and which one is live.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use quill_term::surface::Surface;

use crate::colorscheme::Colorscheme;
use crate::pair;

/// File extension of colorscheme files.
pub const EXTENSION: &str = "clad";

/// Named colorschemes plus the active one.
#[derive(Debug, Default)]
pub struct ColorschemeRegistry {
    schemes: BTreeMap<String, Colorscheme>,
    current: Option<String>,
}

impl ColorschemeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `<name>.clad` file in `dir`, returning how many were added.
    ///
    /// A missing directory adds nothing. Unreadable files are skipped with
    /// a warning.
    pub fn fetch_available(&mut self, dir: &Path) -> usize {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::debug!("no colorschemes in {}: {err}", dir.display());
                return 0;
            }
        };

        let mut added = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            match fs::read_to_string(&path) {
                Ok(source) => {
                    self.add(name, Colorscheme::parse(&source));
                    added += 1;
                }
                Err(err) => log::warn!("skipping colorscheme {}: {err}", path.display()),
            }
        }

        log::debug!("loaded {added} colorschemes from {}", dir.display());
        added
    }

    /// Register `scheme` under `name`, replacing any earlier one.
    pub fn add(&mut self, name: impl Into<String>, scheme: Colorscheme) {
        self.schemes.insert(name.into(), scheme);
    }

    /// Make `name` the active scheme and register its pairs on `surface`.
    ///
    /// Returns `false`, changing nothing, if no such scheme exists.
    pub fn activate<S: Surface + ?Sized>(&mut self, name: &str, surface: &mut S) -> bool {
        let Some(scheme) = self.schemes.get(name) else {
            return false;
        };

        pair::install_pairs(scheme, surface);
        self.current = Some(name.to_owned());
        log::info!("colorscheme '{name}' activated");
        true
    }

    /// Name of the active scheme, if any.
    #[must_use]
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Whether a scheme is active.
    #[must_use]
    pub const fn has_active(&self) -> bool {
        self.current.is_some()
    }

    /// The active scheme.
    #[must_use]
    pub fn active(&self) -> Option<&Colorscheme> {
        self.current.as_ref().and_then(|name| self.schemes.get(name))
    }

    /// Names of every known scheme, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
