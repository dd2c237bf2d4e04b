//! Recursive notebook discovery

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::notebook::cleaner;
use crate::{NbtidyError, Result};

/// File name suffix that marks a notebook document.
pub const NOTEBOOK_EXTENSION: &str = ".ipynb";

/// What to do when one notebook fails to clean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failure and return it
    #[default]
    Abort,
    /// Log the failure, keep walking, and report it at the end
    KeepGoing,
}

/// Outcome of a directory run
#[derive(Debug, Default)]
pub struct CleanReport {
    /// Notebooks that were cleaned (or were already clean)
    pub cleaned: Vec<PathBuf>,

    /// Notebooks that failed, only populated under [`ErrorPolicy::KeepGoing`]
    pub failed: Vec<NbtidyError>,
}

impl CleanReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Yield every notebook file under `root`, sorted by name within each
/// directory. Symlinks to files are yielded; symlinked directories are not
/// descended into.
pub fn find_notebooks(root: &Path) -> impl Iterator<Item = Result<PathBuf>> + '_ {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                let is_notebook = is_file_or_file_link(&entry)
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| name.ends_with(NOTEBOOK_EXTENSION));
                is_notebook.then(|| Ok(entry.into_path()))
            }
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                Some(Err(NbtidyError::Io {
                    path,
                    source: err.into(),
                }))
            }
        })
}

fn is_file_or_file_link(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    // Dangling links are skipped.
    entry.file_type().is_symlink()
        && entry
            .path()
            .metadata()
            .is_ok_and(|metadata| metadata.is_file())
}

/// Clean every notebook under `root`, calling `on_cleaned` as soon as each
/// one has been written so progress is reported even if a later file fails.
pub fn discover_and_clean<F>(
    root: &Path,
    policy: ErrorPolicy,
    mut on_cleaned: F,
) -> Result<CleanReport>
where
    F: FnMut(&Path),
{
    let mut report = CleanReport::default();

    for found in find_notebooks(root) {
        let outcome = found.and_then(|path| cleaner::clean(&path).map(|()| path));

        match outcome {
            Ok(path) => {
                debug!("Cleaned {}", path.display());
                on_cleaned(&path);
                report.cleaned.push(path);
            }
            Err(err) if policy == ErrorPolicy::KeepGoing => {
                warn!("Skipping {}: {}", err.path().display(), err);
                report.failed.push(err);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(report)
}

/// List notebooks under `root` that are not in cleaned form. Never writes.
pub fn discover_dirty(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirty = Vec::new();

    for found in find_notebooks(root) {
        let path = found?;
        if cleaner::needs_cleaning(&path)? {
            dirty.push(path);
        }
    }

    Ok(dirty)
}
