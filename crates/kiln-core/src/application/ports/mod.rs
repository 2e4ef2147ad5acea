//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `kiln-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `BuildTool`: configure/build/install against a build system
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - `Recipe` hooks, driven by `Lifecycle`

pub mod output;

pub use output::{BuildContext, BuildTool, Filesystem};

#[cfg(test)]
pub use output::MockFilesystem;
