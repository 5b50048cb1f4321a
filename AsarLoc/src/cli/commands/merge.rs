//! CLI command for a standalone translation merge

use std::path::Path;

use litmerge::merge::{MergeOptions, merge_files};

pub fn execute(base: &Path, overlay: &Path, identifier: &str, dry_run: bool) -> anyhow::Result<()> {
    let options = MergeOptions::default()
        .with_identifier(identifier)
        .with_dry_run(dry_run);

    let outcome = merge_files(base, overlay, &options)?;

    if outcome.is_unchanged() {
        println!("{} already has every overlay translation", base.display());
        return Ok(());
    }

    for key in outcome.added_keys() {
        println!("  + {key}");
    }
    if dry_run {
        println!("Would add {} translation(s) to {}", outcome.added.len(), base.display());
    } else {
        println!("Added {} translation(s) to {}", outcome.added.len(), base.display());
    }

    Ok(())
}
