//! Preload script discovery inside an extracted archive

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Conventional name of the Electron preload script
pub const PRELOAD_FILE_NAME: &str = "preload.js";

/// How to find the preload script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    /// Search the whole tree; exactly one file with the name must exist
    #[default]
    Walk,
    /// Use the first of these root-relative paths that is a file
    Candidates(Vec<PathBuf>),
}

/// All files under `root` named `file_name`, sorted.
///
/// # Errors
/// Returns an error if the tree cannot be walked.
pub fn find_files_named(root: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name() == file_name {
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}

/// Locate the single preload script under `root`.
///
/// # Errors
/// Returns [`Error::Discovery`] unless exactly one file is selected.
pub fn locate_preload(root: &Path, strategy: &DiscoveryStrategy, file_name: &str) -> Result<PathBuf> {
    match strategy {
        DiscoveryStrategy::Walk => {
            let mut found = find_files_named(root, file_name)?;
            if found.len() == 1 {
                let path = found.remove(0);
                tracing::debug!("Found preload at {:?}", path);
                return Ok(path);
            }
            Err(Error::Discovery {
                file_name: file_name.to_string(),
                count: found.len(),
                paths: found,
            })
        }
        DiscoveryStrategy::Candidates(candidates) => candidates
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.is_file())
            .ok_or_else(|| Error::Discovery {
                file_name: file_name.to_string(),
                count: 0,
                paths: Vec::new(),
            }),
    }
}
