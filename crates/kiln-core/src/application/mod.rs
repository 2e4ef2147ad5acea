//! Application layer for Kiln.
//!
//! This layer contains:
//! - **Recipe**: the hook contract every recipe implements
//! - **Services**: Use case orchestration (Lifecycle, PackageService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer sequences the domain layer but contains no
//! recipe rules itself. All rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod recipe;
pub mod services;

// Re-export main services
pub use services::{
    BuildExecutor, BuildOutcome, Lifecycle, MANIFEST_FILE, PackageManifest, PackageService,
    Packager, Plan, Stage, copy_files,
};

pub use recipe::Recipe;

// Re-export port traits (for adapter implementation)
pub use ports::{BuildContext, BuildTool, Filesystem};

pub use error::{ApplicationError, BuildStep};
