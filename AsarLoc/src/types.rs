//! Types for prepare progress tracking

/// Progress callback type for the prepare pipeline
pub type PrepareProgressCallback<'a> = &'a (dyn Fn(&PrepareProgress) + Sync + Send);

/// Progress information during a prepare run
#[derive(Debug, Clone)]
pub struct PrepareProgress {
    /// Current pipeline phase
    pub phase: PreparePhase,
    /// Current step number (1-indexed)
    pub current: usize,
    /// Total number of steps
    pub total: usize,
    /// File or directory the step works on (if applicable)
    pub current_file: Option<String>,
}

impl PrepareProgress {
    /// Create a new progress update for `phase`
    #[must_use]
    pub fn new(phase: PreparePhase) -> Self {
        Self {
            phase,
            current: phase.step(),
            total: PreparePhase::STEPS,
            current_file: None,
        }
    }

    /// Create a progress update naming the file being worked on
    #[must_use]
    pub fn with_file(phase: PreparePhase, file: impl Into<String>) -> Self {
        Self {
            current_file: Some(file.into()),
            ..Self::new(phase)
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Phase of the prepare pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreparePhase {
    /// Checking that the version inputs and overlay exist
    Validating,
    /// Unpacking the original archive into the workspace
    Extracting,
    /// Copying the unpacked resources over the extracted tree
    CopyingResources,
    /// Finding the preload script
    LocatingPreload,
    /// Merging overlay translations into the preload
    MergingTranslations,
    /// Repacking the archive
    Packing,
    /// Copying the archive to the project root
    Finalizing,
    /// Removing the workspace
    CleaningUp,
    /// Pipeline complete
    Complete,
}

impl PreparePhase {
    /// Number of numbered steps (`Complete` is not counted)
    pub const STEPS: usize = 8;

    /// 1-based step number of this phase
    #[must_use]
    pub fn step(self) -> usize {
        match self {
            Self::Validating => 1,
            Self::Extracting => 2,
            Self::CopyingResources => 3,
            Self::LocatingPreload => 4,
            Self::MergingTranslations => 5,
            Self::Packing => 6,
            Self::Finalizing => 7,
            Self::CleaningUp | Self::Complete => 8,
        }
    }

    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "Validating inputs",
            Self::Extracting => "Extracting archive",
            Self::CopyingResources => "Copying unpacked resources",
            Self::LocatingPreload => "Locating preload script",
            Self::MergingTranslations => "Merging translations",
            Self::Packing => "Packing archive",
            Self::Finalizing => "Writing output archive",
            Self::CleaningUp => "Cleaning up workspace",
            Self::Complete => "Complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_ordered() {
        let phases = [
            PreparePhase::Validating,
            PreparePhase::Extracting,
            PreparePhase::CopyingResources,
            PreparePhase::LocatingPreload,
            PreparePhase::MergingTranslations,
            PreparePhase::Packing,
            PreparePhase::Finalizing,
            PreparePhase::CleaningUp,
        ];
        for (i, phase) in phases.iter().enumerate() {
            assert_eq!(phase.step(), i + 1);
        }
        assert_eq!(PreparePhase::CleaningUp.step(), PreparePhase::STEPS);
    }

    #[test]
    fn test_percentage() {
        let progress = PrepareProgress::with_file(PreparePhase::Packing, "app.asar");
        assert_eq!(progress.current, 6);
        assert!((progress.percentage() - 0.75).abs() < f32::EPSILON);
        assert_eq!(progress.current_file.as_deref(), Some("app.asar"));
    }
}
