//! Temporary work directory for a prepare run
//!
//! The directory lives inside the project root (`asar-work-XXXXXX`) and holds
//! `extracted/` and `output/`. It is removed when the [`Workspace`] is dropped,
//! so an error anywhere in the pipeline still cleans up.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Error, Result};

/// Scoped work directory
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    extracted: PathBuf,
    output: PathBuf,
}

impl Workspace {
    /// Create a fresh uniquely named work directory under `parent`.
    ///
    /// # Errors
    /// Returns an error if the directories cannot be created.
    pub fn create_in(parent: &Path, prefix: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(parent)
            .map_err(Error::io_at("create work directory in", parent))?;

        let extracted = dir.path().join("extracted");
        let output = dir.path().join("output");
        for sub in [&extracted, &output] {
            std::fs::create_dir(sub).map_err(Error::io_at("create", sub.as_path()))?;
        }

        tracing::debug!("Created workspace {:?}", dir.path());
        Ok(Self {
            dir,
            extracted,
            output,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the original archive is extracted
    #[must_use]
    pub fn extracted(&self) -> &Path {
        &self.extracted
    }

    /// Where the new archive is packed
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Remove the work directory, reporting failure instead of ignoring it.
    ///
    /// # Errors
    /// Returns the removal error; the directory may be left behind.
    pub fn close(self) -> std::io::Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        tracing::debug!("Removed workspace {:?}", path);
        Ok(())
    }
}
