use clap::Subcommand;
use std::path::PathBuf;

pub mod install;
pub mod merge;
pub mod prepare;

#[derive(Subcommand)]
pub enum Commands {
    /// Build a localized app.asar for one version
    Prepare {
        /// Version directory under inputs/ (e.g. 1.4.2)
        version: String,

        /// Project root containing inputs/ and preload.js
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Settings file (defaults to <root>/asarloc.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep files already in the archive instead of overwriting them with unpacked copies
        #[arg(long)]
        keep_existing: bool,

        /// Look for the preload at this archive-relative path (repeatable, first match wins)
        #[arg(long = "candidate", value_name = "PATH")]
        candidates: Vec<PathBuf>,

        /// Translation table variable name
        #[arg(long)]
        identifier: Option<String>,

        /// Suppress step output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Append overlay translations missing from a preload script
    Merge {
        /// Preload script to update in place
        base: PathBuf,

        /// Script providing the translations
        overlay: PathBuf,

        /// Translation table variable name
        #[arg(long, default_value = litmerge::DEFAULT_IDENTIFIER)]
        identifier: String,

        /// Report what would be added without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Install a prepared app.asar into an Electron application
    Install {
        /// Archive to install
        #[arg(short, long, default_value = "app.asar")]
        source: PathBuf,

        /// Application directory containing resources/ (defaults to this program's directory)
        #[arg(short, long)]
        app_dir: Option<PathBuf>,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Prepare {
                version,
                root,
                config,
                keep_existing,
                candidates,
                identifier,
                quiet,
            } => prepare::execute(
                version,
                root,
                config.as_deref(),
                prepare::Overrides {
                    keep_existing: *keep_existing,
                    candidates: candidates.clone(),
                    identifier: identifier.clone(),
                },
                !*quiet,
            ),
            Commands::Merge {
                base,
                overlay,
                identifier,
                dry_run,
            } => merge::execute(base, overlay, identifier, *dry_run),
            Commands::Install { source, app_dir } => install::execute(source, app_dir.as_deref()),
        }
    }
}
