//! External archive tool
//!
//! The tool is invoked as `<program> <args..> extract <archive> <dir>` and
//! `<program> <args..> pack <dir> <archive> [--unpack-dir D].. [--unpack F]..`,
//! which is the command line of the `asar` package. Its stdout and stderr are
//! passed through to the terminal.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::ToolSettings;
use crate::error::{Error, Result};
use crate::resources::{UnpackEntry, unpack_flags};

/// A configured archive tool command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveTool {
    program: String,
    args: Vec<String>,
}

impl Default for ArchiveTool {
    fn default() -> Self {
        Self::from_settings(&ToolSettings::default())
    }
}

impl ArchiveTool {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &ToolSettings) -> Self {
        Self::new(settings.program.clone(), settings.args.iter().cloned())
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for extracting `archive` into `dest`
    #[must_use]
    pub fn extract_args(&self, archive: &Path, dest: &Path) -> Vec<OsString> {
        let mut args = self.prefix_args();
        args.push("extract".into());
        args.push(archive.into());
        args.push(dest.into());
        args
    }

    /// Arguments for packing `src` into `archive`
    #[must_use]
    pub fn pack_args(&self, src: &Path, archive: &Path, unpack: &[UnpackEntry]) -> Vec<OsString> {
        let mut args = self.prefix_args();
        args.push("pack".into());
        args.push(src.into());
        args.push(archive.into());
        args.extend(unpack_flags(unpack).into_iter().map(OsString::from));
        args
    }

    /// Extract `archive` into the existing directory `dest`.
    ///
    /// # Errors
    /// Returns an error if the tool cannot be started or exits unsuccessfully.
    pub fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        self.run(&self.extract_args(archive, dest))
    }

    /// Pack `src` into `archive`, keeping `unpack` entries outside it.
    ///
    /// # Errors
    /// Returns an error if the tool cannot be started, exits unsuccessfully,
    /// or exits successfully without writing `archive`.
    pub fn pack(&self, src: &Path, archive: &Path, unpack: &[UnpackEntry]) -> Result<()> {
        let args = self.pack_args(src, archive, unpack);
        self.run(&args)?;
        if !archive.is_file() {
            return Err(Error::ToolOutputMissing {
                command: command_line(&self.program, &args),
                path: archive.to_path_buf(),
            });
        }
        Ok(())
    }

    fn prefix_args(&self) -> Vec<OsString> {
        self.args.iter().map(OsString::from).collect()
    }

    fn run(&self, args: &[OsString]) -> Result<()> {
        let command = command_line(&self.program, args);
        tracing::info!("Running {}", command);

        let status = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| Error::ToolSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(Error::ToolFailed { command, status });
        }
        Ok(())
    }
}

/// Render a command for display, quoting arguments that contain spaces
#[must_use]
pub fn command_line(program: &str, args: &[OsString]) -> String {
    std::iter::once(OsStr::new(program))
        .chain(args.iter().map(OsString::as_os_str))
        .map(|arg| {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("\"{arg}\"")
            } else {
                arg.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
