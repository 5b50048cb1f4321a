//! # AsarLoc
//!
//! Repack an Electron `app.asar` with localized preload translations.
//!
//! A prepare run extracts the archive for one version, merges the unpacked
//! resources back in, appends missing entries from the project's
//! translation overlay to the bundled `preload.js`, and packs a new
//! `app.asar` into the project root. The installer then drops that archive
//! into an application's `resources/` directory.
//!
//! ## Components
//!
//! - **prepare** - The extract → merge → repack pipeline
//! - **tool** - External archive tool (`npx asar` by default)
//! - **resources** - Unpacked resource copying and unpack flags
//! - **discovery** - Finding the preload script in the extracted tree
//! - **workspace** - Scoped temporary work directory
//! - **install** - Replacing an installed archive with a backup
//! - **config** - Optional `asarloc.toml` settings
//!
//! ## Quick Start
//!
//! ```no_run
//! use asarloc::prelude::*;
//!
//! let report = prepare(&PrepareOptions::new(".", "1.4.2"))?;
//! println!("Added {} translations", report.added_keys.len());
//! # Ok::<(), asarloc::Error>(())
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod install;
pub mod prepare;
pub mod resources;
pub mod tool;
pub mod types;
pub mod workspace;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export the translation engine
pub use litmerge;

pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{CONFIG_FILE_NAME, Config};
    pub use crate::discovery::{DiscoveryStrategy, PRELOAD_FILE_NAME, locate_preload};
    pub use crate::error::{Error, Result};
    pub use crate::install::{InstallReport, install_archive};
    pub use crate::prepare::{PrepareOptions, PrepareReport, prepare, prepare_with_progress};
    pub use crate::resources::{ConflictPolicy, CopyStats, UnpackEntry, copy_tree, unpack_entries};
    pub use crate::tool::ArchiveTool;
    pub use crate::types::{PreparePhase, PrepareProgress, PrepareProgressCallback};
    pub use crate::workspace::Workspace;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
