//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "run every recipe hook" or "build and package".

pub mod executor;
pub mod lifecycle;
pub mod package_service;
pub mod packager;

#[cfg(test)]
pub(crate) mod testing;

pub use executor::BuildExecutor;
pub use lifecycle::{BuildOutcome, Lifecycle, Plan, Stage};
pub use package_service::{MANIFEST_FILE, PackageManifest, PackageService};
pub use packager::{Packager, copy_files};
