//! Settings file types for asarloc.toml
//!
//! Every field has a default, so the file is optional and may be partial:
//!
//! ```toml
//! [tool]
//! program = "npx"
//! args = ["--yes", "asar"]
//!
//! [prepare]
//! conflict_policy = "keep-existing"
//! discovery = "candidates"
//! candidates = ["dist/preload.js", "preload.js"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discovery::{DiscoveryStrategy, PRELOAD_FILE_NAME};
use crate::error::{Error, Result};
use crate::resources::ConflictPolicy;

/// Name of the settings file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "asarloc.toml";

fn default_program() -> String {
    let program = if cfg!(windows) { "npx.cmd" } else { "npx" };
    program.to_string()
}

fn default_tool_args() -> Vec<String> {
    vec!["--yes".to_string(), "asar".to_string()]
}

fn default_inputs() -> String {
    "inputs".to_string()
}

fn default_overlay() -> String {
    PRELOAD_FILE_NAME.to_string()
}

fn default_output() -> String {
    "app.asar".to_string()
}

fn default_work_prefix() -> String {
    "asar-work-".to_string()
}

fn default_identifier() -> String {
    litmerge::DEFAULT_IDENTIFIER.to_string()
}

fn default_preload_name() -> String {
    PRELOAD_FILE_NAME.to_string()
}

/// The full settings file (asarloc.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tool: ToolSettings,
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub prepare: PrepareSettings,
}

/// External archive tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Program to spawn
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments placed before `extract`/`pack`
    #[serde(default = "default_tool_args")]
    pub args: Vec<String>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_tool_args(),
        }
    }
}

/// Project-relative locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSettings {
    /// Directory holding one subdirectory per version
    #[serde(default = "default_inputs")]
    pub inputs: String,
    /// Project translation overlay
    #[serde(default = "default_overlay")]
    pub overlay: String,
    /// Final archive
    #[serde(default = "default_output")]
    pub output: String,
    /// Prefix of the temporary work directory
    #[serde(default = "default_work_prefix")]
    pub work_prefix: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            inputs: default_inputs(),
            overlay: default_overlay(),
            output: default_output(),
            work_prefix: default_work_prefix(),
        }
    }
}

/// How the preload file is found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryMode {
    /// Walk the whole extracted tree, require exactly one match
    #[default]
    Walk,
    /// First existing path from `candidates`
    Candidates,
}

/// Translation merge settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareSettings {
    /// Name of the translation table variable
    #[serde(default = "default_identifier")]
    pub identifier: String,
    /// What to do when an unpacked file already exists in the archive
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    #[serde(default)]
    pub discovery: DiscoveryMode,
    /// Relative paths checked in order by the `candidates` mode
    #[serde(default)]
    pub candidates: Vec<String>,
    /// File name searched for by the `walk` mode
    #[serde(default = "default_preload_name")]
    pub preload_name: String,
}

impl Default for PrepareSettings {
    fn default() -> Self {
        Self {
            identifier: default_identifier(),
            conflict_policy: ConflictPolicy::default(),
            discovery: DiscoveryMode::default(),
            candidates: Vec::new(),
            preload_name: default_preload_name(),
        }
    }
}

impl PrepareSettings {
    pub fn discovery_strategy(&self) -> DiscoveryStrategy {
        match self.discovery {
            DiscoveryMode::Walk => DiscoveryStrategy::Walk,
            DiscoveryMode::Candidates => {
                DiscoveryStrategy::Candidates(self.candidates.iter().map(PathBuf::from).collect())
            }
        }
    }
}

impl Config {
    /// Load `asarloc.toml` from `root`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE_NAME, root);
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load an explicit settings file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::MissingInput {
                what: "config file",
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(Error::io_at("read", path))?;
        let config = Self::parse(&text).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })?;
        tracing::debug!("Loaded settings from {:?}", path);
        Ok(config)
    }

    fn parse(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }
}
