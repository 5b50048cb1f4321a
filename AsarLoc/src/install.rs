//! Install a prepared archive into an Electron application

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::prepare::ARCHIVE_FILE_NAME;

/// Directory of an Electron app holding `app.asar`
pub const RESOURCES_DIR_NAME: &str = "resources";
/// Name of the backup written next to the replaced archive
pub const BACKUP_FILE_NAME: &str = "app.asar.backup";

/// Result of [`install_archive`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub target: PathBuf,
    /// Set when an existing archive was backed up
    pub backup: Option<PathBuf>,
    pub bytes_written: u64,
}

/// Copy `source` to `<app_dir>/resources/app.asar`, backing up any archive
/// already there to `app.asar.backup`.
///
/// # Errors
/// Returns [`Error::MissingInput`] if `source` or the resources directory is
/// missing, or an IO error if the backup or copy fails. A failed backup
/// leaves the target untouched.
pub fn install_archive(source: &Path, app_dir: &Path) -> Result<InstallReport> {
    if !source.is_file() {
        return Err(Error::MissingInput {
            what: "archive",
            path: source.to_path_buf(),
        });
    }
    let resources = app_dir.join(RESOURCES_DIR_NAME);
    if !resources.is_dir() {
        return Err(Error::MissingInput {
            what: "resources directory",
            path: resources,
        });
    }

    let target = resources.join(ARCHIVE_FILE_NAME);
    let backup = if target.is_file() {
        let backup = resources.join(BACKUP_FILE_NAME);
        fs::copy(&target, &backup).map_err(Error::io_at("back up", &target))?;
        tracing::info!("Backed up {:?} to {:?}", target, backup);
        Some(backup)
    } else {
        None
    };

    let bytes_written = fs::copy(source, &target).map_err(Error::io_at("write", &target))?;
    tracing::info!("Installed {} bytes to {:?}", bytes_written, target);

    Ok(InstallReport {
        target,
        backup,
        bytes_written,
    })
}
