//! CLI progress display utilities
//!
//! Step-style output for the prepare pipeline: `[3/8] 📦 Copying unpacked resources`.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::HumanDuration;

use crate::types::{PreparePhase, PrepareProgress};

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for validation/discovery
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Package - for extraction/packing
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Truck - for copying resources
pub static TRUCK: Emoji<'_, '_> = Emoji("🚚 ", "");
/// Globe - for translation merging
pub static GLOBE: Emoji<'_, '_> = Emoji("🌐 ", "");
/// Floppy disk - for writing output
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Broom - for cleanup
pub static BROOM: Emoji<'_, '_> = Emoji("🧹 ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", ":-) ");

/// Print a step indicator: `[1/3] 📦 Message...`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Emoji shown for a pipeline phase
#[must_use]
pub fn phase_emoji(phase: PreparePhase) -> Emoji<'static, 'static> {
    match phase {
        PreparePhase::Validating | PreparePhase::LocatingPreload => LOOKING_GLASS,
        PreparePhase::Extracting | PreparePhase::Packing => PACKAGE,
        PreparePhase::CopyingResources => TRUCK,
        PreparePhase::MergingTranslations => GLOBE,
        PreparePhase::Finalizing => DISK,
        PreparePhase::CleaningUp => BROOM,
        PreparePhase::Complete => SPARKLE,
    }
}

/// Print a step line for a prepare progress update (`Complete` prints nothing)
pub fn print_prepare_step(progress: &PrepareProgress) {
    if progress.phase == PreparePhase::Complete {
        return;
    }
    let msg = match &progress.current_file {
        Some(file) => format!("{} ({})...", progress.phase.as_str(), style(file).cyan()),
        None => format!("{}...", progress.phase.as_str()),
    };
    print_step(progress.current, progress.total, phase_emoji(progress.phase), &msg);
}
