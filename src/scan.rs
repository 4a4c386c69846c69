//! Gallery discovery.
//!
//! Walks the immediate subdirectories of the gallery root, building one
//! [`GalleryEntry`] per directory and validating it for the requested
//! [`Mode`]. Hidden directories (name starting with `.`) and plain files are
//! skipped. Directories are visited in name order so the rendered document
//! is deterministic.
//!
//! Invalid entries are not errors: each one yields a `(name, reason)` pair
//! surfaced later as a warning. The only hard failures are a missing root
//! and a root that is not a directory.

use crate::entry::{GalleryEntry, Mode};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("gallery directory does not exist: {0}")]
    MissingRoot(PathBuf),
    #[error("gallery path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Everything one scan of the gallery root produced.
///
/// Rebuilt wholesale on every call to [`scan`]; there is no incremental
/// update.
#[derive(Debug)]
pub struct Gallery {
    /// The scanned root.
    pub root: PathBuf,
    /// Valid entries in directory-name order.
    pub entries: Vec<GalleryEntry>,
    /// `(name, reason)` for each subdirectory that failed validation.
    pub rejected: Vec<(String, String)>,
}

/// Scan the gallery root and validate each immediate subdirectory.
pub fn scan(root: &Path, mode: Mode) -> Result<Gallery, ScanError> {
    if !root.exists() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            let hidden = p
                .file_name()
                .map(|n| n.to_string_lossy().starts_with('.'))
                .unwrap_or(true);
            p.is_dir() && !hidden
        })
        .collect();
    dirs.sort();

    let mut entries = Vec::new();
    let mut rejected = Vec::new();
    for dir in &dirs {
        let entry = GalleryEntry::from_directory(dir);
        match entry.validate(mode) {
            Ok(()) => entries.push(entry),
            Err(reason) => rejected.push((entry.name, reason)),
        }
    }

    Ok(Gallery {
        root: root.to_path_buf(),
        entries,
        rejected,
    })
}
