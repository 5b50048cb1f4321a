//! CLI command for installing a prepared archive

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::install::install_archive;

pub fn execute(source: &Path, app_dir: Option<&Path>) -> anyhow::Result<()> {
    let app_dir = match app_dir {
        Some(dir) => dir.to_path_buf(),
        None => program_dir()?,
    };

    let report = install_archive(source, &app_dir)
        .with_context(|| format!("Failed to install into {}", app_dir.display()))?;

    if let Some(backup) = &report.backup {
        println!("Backed up original archive: {}", backup.display());
    }
    println!("Wrote {} bytes to {}", report.bytes_written, report.target.display());

    Ok(())
}

/// Directory of the running executable
fn program_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to get program path")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("Failed to get program directory")
}
