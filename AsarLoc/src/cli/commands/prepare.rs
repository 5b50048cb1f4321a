//! CLI command for the prepare pipeline

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;

use crate::cli::progress::{print_done, print_prepare_step};
use crate::config::Config;
use crate::discovery::DiscoveryStrategy;
use crate::prepare::{PrepareOptions, prepare_with_progress};
use crate::resources::ConflictPolicy;
use crate::types::PrepareProgress;

/// Settings given on the command line, applied over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// --keep-existing
    pub keep_existing: bool,
    /// --candidate (repeatable)
    pub candidates: Vec<PathBuf>,
    /// --identifier
    pub identifier: Option<String>,
}

impl Overrides {
    fn apply(self, mut options: PrepareOptions) -> PrepareOptions {
        if self.keep_existing {
            options = options.with_conflict_policy(ConflictPolicy::KeepExisting);
        }
        if !self.candidates.is_empty() {
            options = options.with_discovery(DiscoveryStrategy::Candidates(self.candidates));
        }
        if let Some(identifier) = self.identifier {
            options = options.with_identifier(identifier);
        }
        options
    }
}

pub fn execute(
    version: &str,
    root: &Path,
    config: Option<&Path>,
    overrides: Overrides,
    show_progress: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();

    let settings = match config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(root)?,
    };
    let options = overrides.apply(PrepareOptions::from_config(root, version, &settings));

    let report_step = move |progress: &PrepareProgress| {
        if show_progress {
            print_prepare_step(progress);
        }
    };
    let report = prepare_with_progress(&options, &report_step)
        .with_context(|| format!("Failed to prepare version {version}"))?;

    if show_progress {
        println!();
        println!("Preload: {}", report.preload.display());
        if report.added_keys.is_empty() {
            println!("No new translations");
        } else {
            println!("Added {} translation(s):", report.added_keys.len());
            for key in &report.added_keys {
                println!("  + {key}");
            }
        }
        println!(
            "Unpacked resources: {} copied, {} kept",
            report.copy.files_copied, report.copy.files_skipped
        );
        println!("Output: {}", report.output.display());
        if !report.workspace_removed {
            println!("Warning: the work directory could not be removed");
        }
        print_done(started.elapsed());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiscoveryMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let options = Overrides::default().apply(PrepareOptions::new("root", "1.0.0"));
        assert_eq!(options.conflict_policy, ConflictPolicy::Overwrite);
        assert_eq!(options.discovery, DiscoveryStrategy::Walk);
        assert_eq!(options.identifier, litmerge::DEFAULT_IDENTIFIER);
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let overrides = Overrides {
            keep_existing: true,
            candidates: vec![PathBuf::from("dist/preload.js")],
            identifier: Some("messages".to_string()),
        };
        let options = overrides.apply(PrepareOptions::new("root", "1.0.0"));

        assert_eq!(options.conflict_policy, ConflictPolicy::KeepExisting);
        assert_eq!(
            options.discovery,
            DiscoveryStrategy::Candidates(vec![PathBuf::from("dist/preload.js")])
        );
        assert_eq!(options.identifier, "messages");
    }

    #[test]
    fn test_overrides_win_over_config() {
        let mut config = Config::default();
        config.prepare.identifier = "fromConfig".to_string();
        config.prepare.discovery = DiscoveryMode::Candidates;
        config.prepare.candidates = vec!["a/preload.js".to_string()];

        let overrides = Overrides {
            candidates: vec![PathBuf::from("b/preload.js")],
            identifier: Some("fromFlag".to_string()),
            ..Overrides::default()
        };
        let options = overrides.apply(PrepareOptions::from_config("root", "1.0.0", &config));

        assert_eq!(options.identifier, "fromFlag");
        assert_eq!(
            options.discovery,
            DiscoveryStrategy::Candidates(vec![PathBuf::from("b/preload.js")])
        );
        assert_eq!(options.conflict_policy, ConflictPolicy::Overwrite);
    }

    #[test]
    fn test_unset_overrides_keep_config() {
        let mut config = Config::default();
        config.prepare.identifier = "fromConfig".to_string();
        config.prepare.conflict_policy = ConflictPolicy::KeepExisting;

        let options = Overrides::default().apply(PrepareOptions::from_config("root", "1.0.0", &config));

        assert_eq!(options.identifier, "fromConfig");
        assert_eq!(options.conflict_policy, ConflictPolicy::KeepExisting);
    }
}
