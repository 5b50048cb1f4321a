//! Archive round trip: extract, merge translations, repack
//!
//! ```text
//! <root>/
//!   inputs/<version>/app.asar
//!   inputs/<version>/app.asar.unpacked/
//!   preload.js                 translation overlay
//!   app.asar                   output, overwritten each run
//! ```

use std::path::{Path, PathBuf};

use litmerge::merge::{MergeOptions, merge_files};

use crate::config::Config;
use crate::discovery::{DiscoveryStrategy, locate_preload};
use crate::error::{Error, Result};
use crate::resources::{ConflictPolicy, CopyStats, UnpackEntry, copy_tree, unpack_entries};
use crate::tool::ArchiveTool;
use crate::types::{PreparePhase, PrepareProgress, PrepareProgressCallback};
use crate::workspace::Workspace;

/// Name of the archive inside each version directory and in the workspace
pub const ARCHIVE_FILE_NAME: &str = "app.asar";
/// Name of the unpacked resources directory next to the archive
pub const UNPACKED_DIR_NAME: &str = "app.asar.unpacked";

/// Options for a prepare run
#[derive(Debug, Clone)]
pub struct PrepareOptions {
    /// Project root; relative paths below resolve against it
    pub root: PathBuf,
    /// Version directory name under `inputs`
    pub version: String,
    pub tool: ArchiveTool,
    /// Translation table variable name
    pub identifier: String,
    pub conflict_policy: ConflictPolicy,
    pub discovery: DiscoveryStrategy,
    /// File name searched for by [`DiscoveryStrategy::Walk`]
    pub preload_name: String,
    pub inputs_dir: PathBuf,
    pub overlay: PathBuf,
    pub output: PathBuf,
    pub work_prefix: String,
}

impl PrepareOptions {
    /// Options with built-in defaults
    pub fn new(root: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self::from_config(root, version, &Config::default())
    }

    /// Options from a loaded settings file
    pub fn from_config(root: impl Into<PathBuf>, version: impl Into<String>, config: &Config) -> Self {
        Self {
            root: root.into(),
            version: version.into(),
            tool: ArchiveTool::from_settings(&config.tool),
            identifier: config.prepare.identifier.clone(),
            conflict_policy: config.prepare.conflict_policy,
            discovery: config.prepare.discovery_strategy(),
            preload_name: config.prepare.preload_name.clone(),
            inputs_dir: PathBuf::from(&config.paths.inputs),
            overlay: PathBuf::from(&config.paths.overlay),
            output: PathBuf::from(&config.paths.output),
            work_prefix: config.paths.work_prefix.clone(),
        }
    }

    #[must_use]
    pub fn with_tool(mut self, tool: ArchiveTool) -> Self {
        self.tool = tool;
        self
    }

    #[must_use]
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    #[must_use]
    pub fn with_discovery(mut self, discovery: DiscoveryStrategy) -> Self {
        self.discovery = discovery;
        self
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// `<root>/<inputs>/<version>`
    #[must_use]
    pub fn version_dir(&self) -> PathBuf {
        self.root.join(&self.inputs_dir).join(&self.version)
    }

    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        self.version_dir().join(ARCHIVE_FILE_NAME)
    }

    #[must_use]
    pub fn unpacked_path(&self) -> PathBuf {
        self.version_dir().join(UNPACKED_DIR_NAME)
    }

    #[must_use]
    pub fn overlay_path(&self) -> PathBuf {
        self.root.join(&self.overlay)
    }

    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output)
    }
}

/// Result of a successful prepare run
#[derive(Debug, Clone)]
pub struct PrepareReport {
    /// The archive written to the project root
    pub output: PathBuf,
    /// Preload location relative to the archive root
    pub preload: PathBuf,
    /// Translation keys appended to the preload
    pub added_keys: Vec<String>,
    pub copy: CopyStats,
    pub unpack: Vec<UnpackEntry>,
    /// False when the workspace could not be deleted
    pub workspace_removed: bool,
}

/// Run the full pipeline without progress reporting.
///
/// # Errors
/// See [`prepare_with_progress`].
pub fn prepare(options: &PrepareOptions) -> Result<PrepareReport> {
    prepare_with_progress(options, &|_| {})
}

/// Run the full pipeline, reporting each phase to `progress`.
///
/// Inputs are validated before the workspace is created. The workspace is
/// removed on every path; only a failed removal after success is reported,
/// as a warning.
///
/// # Errors
/// Returns the first failure: missing inputs, archive tool failures,
/// preload discovery, or translation merge errors.
pub fn prepare_with_progress(
    options: &PrepareOptions,
    progress: PrepareProgressCallback,
) -> Result<PrepareReport> {
    progress(&PrepareProgress::with_file(PreparePhase::Validating, &options.version));
    let inputs = Inputs::resolve(options)?;

    let workspace = Workspace::create_in(&options.root, &options.work_prefix)?;
    tracing::info!("Working in {:?}", workspace.path());

    // On error the workspace is dropped here, which deletes it
    let mut report = run_pipeline(options, &inputs, &workspace, progress)?;

    progress(&PrepareProgress::new(PreparePhase::CleaningUp));
    let work_path = workspace.path().to_path_buf();
    match workspace.close() {
        Ok(()) => report.workspace_removed = true,
        Err(e) => tracing::warn!("Failed to remove workspace {:?}: {}", work_path, e),
    }

    progress(&PrepareProgress::new(PreparePhase::Complete));
    tracing::info!("Wrote {:?}", report.output);
    Ok(report)
}

/// Validated input locations
struct Inputs {
    archive: PathBuf,
    unpacked: PathBuf,
    overlay: PathBuf,
}

impl Inputs {
    fn resolve(options: &PrepareOptions) -> Result<Self> {
        validate_version(&options.version)?;

        let archive = options.archive_path();
        if !archive.is_file() {
            return Err(Error::MissingInput {
                what: "archive",
                path: archive,
            });
        }
        let unpacked = options.unpacked_path();
        if !unpacked.is_dir() {
            return Err(Error::MissingInput {
                what: "unpacked resources",
                path: unpacked,
            });
        }
        let overlay = options.overlay_path();
        if !overlay.is_file() {
            return Err(Error::MissingInput {
                what: "translation overlay",
                path: overlay,
            });
        }

        Ok(Self {
            archive,
            unpacked,
            overlay,
        })
    }
}

/// The version names a single directory under `inputs`
fn validate_version(version: &str) -> Result<()> {
    let trimmed = version.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || version.contains(['/', '\\'])
    {
        return Err(Error::InvalidVersion(version.to_string()));
    }
    Ok(())
}

fn run_pipeline(
    options: &PrepareOptions,
    inputs: &Inputs,
    workspace: &Workspace,
    progress: PrepareProgressCallback,
) -> Result<PrepareReport> {
    let extracted = workspace.extracted();

    progress(&PrepareProgress::with_file(PreparePhase::Extracting, display_name(&inputs.archive)));
    options.tool.extract(&inputs.archive, extracted)?;

    progress(&PrepareProgress::with_file(
        PreparePhase::CopyingResources,
        display_name(&inputs.unpacked),
    ));
    let copy = copy_tree(&inputs.unpacked, extracted, options.conflict_policy)?;

    progress(&PrepareProgress::new(PreparePhase::LocatingPreload));
    let preload = locate_preload(extracted, &options.discovery, &options.preload_name)?;
    let relative = preload.strip_prefix(extracted).unwrap_or(&preload).to_path_buf();
    tracing::info!("Preload script: {:?}", relative);

    progress(&PrepareProgress::with_file(
        PreparePhase::MergingTranslations,
        relative.to_string_lossy(),
    ));
    let merge_options = MergeOptions::default().with_identifier(options.identifier.clone());
    let outcome = merge_files(&preload, &inputs.overlay, &merge_options)?;
    let added_keys: Vec<String> = outcome.added_keys().map(str::to_string).collect();
    tracing::info!("Added {} translation(s)", added_keys.len());

    let unpack = unpack_entries(&inputs.unpacked)?;
    for entry in &unpack {
        tracing::info!("Keeping unpacked: {}", entry);
    }

    let packed = workspace.output().join(ARCHIVE_FILE_NAME);
    progress(&PrepareProgress::with_file(PreparePhase::Packing, ARCHIVE_FILE_NAME));
    options.tool.pack(extracted, &packed, &unpack)?;

    let output = options.output_path();
    progress(&PrepareProgress::with_file(PreparePhase::Finalizing, display_name(&output)));
    std::fs::copy(&packed, &output).map_err(Error::io_at("copy archive to", &output))?;

    Ok(PrepareReport {
        output,
        preload: relative,
        added_keys,
        copy,
        unpack,
        workspace_removed: false,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::PRELOAD_FILE_NAME;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_layout() {
        let options = PrepareOptions::new("/project", "1.2.3");
        assert_eq!(options.archive_path(), Path::new("/project/inputs/1.2.3/app.asar"));
        assert_eq!(
            options.unpacked_path(),
            Path::new("/project/inputs/1.2.3/app.asar.unpacked")
        );
        assert_eq!(options.overlay_path(), Path::new("/project/preload.js"));
        assert_eq!(options.output_path(), Path::new("/project/app.asar"));
        assert_eq!(options.preload_name, PRELOAD_FILE_NAME);
        assert_eq!(options.work_prefix, "asar-work-");
    }

    #[test]
    fn test_version_validation() {
        for bad in ["", "  ", ".", "..", "1.0/../..", "a\\b"] {
            assert!(
                matches!(validate_version(bad), Err(Error::InvalidVersion(_))),
                "{bad:?} should be rejected"
            );
        }
        for good in ["1.0.0", "v2.3.4-beta.1", "2024-01"] {
            assert!(validate_version(good).is_ok());
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/a/b/app.asar")), "app.asar");
    }
}
