//! Application layer errors.
//!
//! These errors represent failures while driving the lifecycle, not
//! violations of recipe rules. Rule violations are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during lifecycle orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The build tool reported failure for a configure/build/install step.
    #[error("{step} step failed: {reason}")]
    BuildToolFailed { step: BuildStep, reason: String },

    /// A build step was requested before the step it depends on succeeded.
    #[error("cannot run {requested} before {missing} has succeeded")]
    StepOutOfOrder {
        requested: BuildStep,
        missing: BuildStep,
    },

    /// A build step was requested again after the sequence moved past it.
    #[error("{step} step cannot run again")]
    StepRepeated { step: BuildStep },

    /// A build step was requested after an earlier step failed.
    #[error("cannot run {requested}: a previous build step failed")]
    BuildAborted { requested: BuildStep },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Adapter state access failed (lock poisoned, etc.).
    #[error("adapter state is unavailable")]
    StoreLockError,

    /// A recipe could not be located or loaded.
    #[error("recipe '{name}' not found")]
    RecipeNotFound { name: String },
}

/// One step of the configure → build → install sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStep {
    Configure,
    Build,
    Install,
}

impl std::fmt::Display for BuildStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configure => f.write_str("configure"),
            Self::Build => f.write_str("build"),
            Self::Install => f.write_str("install"),
        }
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::BuildToolFailed { step, .. } => vec![
                format!("The {step} step of the build tool failed"),
                "Re-run with -vv to see the build tool's output".into(),
                "Check that the tool requirements (e.g. cmake) are installed".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
            Self::RecipeNotFound { name } => vec![
                format!("No built-in recipe or recipe.toml found for '{name}'"),
                "Pass a built-in recipe name or a path to a recipe.toml".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BuildToolFailed { .. } | Self::BuildAborted { .. } => ErrorCategory::BuildTool,
            Self::StepOutOfOrder { .. } | Self::StepRepeated { .. } => ErrorCategory::Internal,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
            Self::RecipeNotFound { .. } => ErrorCategory::NotFound,
        }
    }
}
