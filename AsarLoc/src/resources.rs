//! Unpacked resource handling
//!
//! An Electron build ships `app.asar` next to `app.asar.unpacked/`, which holds
//! files that must live outside the archive (native modules, licenses). Those
//! files are merged back into the extracted tree before repacking, and the
//! repack has to be told to leave them unpacked again.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// What to do when an unpacked file already exists in the extracted tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// The unpacked copy replaces the extracted one
    #[default]
    Overwrite,
    /// The extracted copy is kept
    KeepExisting,
}

/// Counters from [`copy_tree`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files_copied: usize,
    pub files_skipped: usize,
    pub dirs_created: usize,
}

/// Recursively copy the contents of `src` into `dest`.
///
/// Symlinks are followed. Existing files in `dest` are handled per `policy`.
///
/// # Errors
/// Returns an error if `src` cannot be walked or a file cannot be copied.
pub fn copy_tree(src: &Path, dest: &Path, policy: ConflictPolicy) -> Result<CopyStats> {
    let mut stats = CopyStats::default();

    if !dest.exists() {
        fs::create_dir_all(dest).map_err(Error::io_at("create", dest))?;
        stats.dirs_created += 1;
    }

    for entry in WalkDir::new(src).follow_links(true).min_depth(1) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            if !target.is_dir() {
                fs::create_dir_all(&target).map_err(Error::io_at("create", &target))?;
                stats.dirs_created += 1;
            }
            continue;
        }

        if target.exists() && policy == ConflictPolicy::KeepExisting {
            tracing::debug!("Keeping existing {:?}", relative);
            stats.files_skipped += 1;
            continue;
        }

        fs::copy(entry.path(), &target).map_err(Error::io_at("copy", entry.path()))?;
        stats.files_copied += 1;
    }

    tracing::debug!(
        "Copied {} files ({} skipped) from {:?}",
        stats.files_copied,
        stats.files_skipped,
        src
    );
    Ok(stats)
}

/// A top-level entry of the unpacked directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnpackEntry {
    Dir(String),
    File(String),
}

impl UnpackEntry {
    /// The archive tool flag selecting this entry
    #[must_use]
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Dir(_) => "--unpack-dir",
            Self::File(_) => "--unpack",
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Dir(name) | Self::File(name) => name,
        }
    }
}

impl fmt::Display for UnpackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.flag(), self.name())
    }
}

/// List the immediate children of `dir`: directories first, then files,
/// each group sorted by name.
///
/// # Errors
/// Returns an error if `dir` cannot be read.
pub fn unpack_entries(dir: &Path) -> Result<Vec<UnpackEntry>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).min_depth(1).max_depth(1) {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().is_dir() {
            dirs.push(name);
        } else if entry.file_type().is_file() {
            files.push(name);
        }
    }

    dirs.sort();
    files.sort();

    Ok(dirs
        .into_iter()
        .map(UnpackEntry::Dir)
        .chain(files.into_iter().map(UnpackEntry::File))
        .collect())
}

/// Flatten entries into archive tool arguments (`--unpack-dir natives --unpack lic.txt`)
#[must_use]
pub fn unpack_flags(entries: &[UnpackEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|e| [e.flag().to_string(), e.name().to_string()])
        .collect()
}
