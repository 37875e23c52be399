use std::{
    cell::Cell,
    path::{Path, PathBuf},
};

use colored::Colorize;
use regex::Regex;
use walkdir::{DirEntry, WalkDir};

/// Recursive, restartable walk over source files whose name matches a regex.
///
/// Each call to [`SourceCollector::iter`] starts a fresh walk. Entries are
/// yielded in lexical order so repeated runs see the same sequence.
pub struct SourceCollector {
    root: PathBuf,
    pattern: Regex,
    verbose: bool,
    skipped: Cell<usize>,
}

impl SourceCollector {
    pub fn new(root: impl Into<PathBuf>, pattern: Regex, verbose: bool) -> Self {
        Self {
            root: root.into(),
            pattern,
            verbose,
            skipped: Cell::new(0),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.skipped.set(0);
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry))
            .filter_map(move |entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    self.skipped.set(self.skipped.get() + 1);
                    if self.verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(move |entry| self.is_match(entry.path()))
            .map(DirEntry::into_path)
    }

    /// Number of paths the most recent walk could not access.
    pub fn skipped_count(&self) -> usize {
        self.skipped.get()
    }

    fn is_match(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.pattern.is_match(name))
    }
}

/// Hidden directories and existing `.lproj` bundles are never descended into.
fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.ends_with(".lproj")
}
