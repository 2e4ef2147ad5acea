//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `kiln-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{Layout, Options, RequirementSet, Settings};
use crate::error::KilnResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kiln_adapters::filesystem::LocalFilesystem` (production)
/// - `kiln_adapters::filesystem::MemoryFilesystem` (testing, dry runs)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KilnResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()>;

    /// Copy a single file. The destination's parent must exist.
    fn copy_file(&self, from: &Path, to: &Path) -> KilnResult<()>;

    /// Every file below `root`, as paths relative to `root`, sorted.
    ///
    /// A missing `root` yields an empty list.
    fn list_files(&self, root: &Path) -> KilnResult<Vec<PathBuf>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> KilnResult<()>;
}

/// Everything a build tool needs to act on one recipe configuration.
///
/// Built by the lifecycle after `layout` and both requirement hooks have
/// run, so every field is final by the time `build` starts.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildContext {
    /// `name/version` of the recipe being built.
    pub reference: String,
    pub layout: Layout,
    pub settings: Settings,
    pub options: Options,
    /// Generator names, in declaration order.
    pub generators: Vec<String>,
    pub tool_requirements: RequirementSet,
    pub requirements: RequirementSet,
}

impl BuildContext {
    pub fn has_generator(&self, name: &str) -> bool {
        self.generators.iter().any(|g| g == name)
    }
}

/// Port for the external build-invocation tool.
///
/// Implemented by:
/// - `kiln_adapters::build_tool::CMakeTool` (shells out to `cmake`)
/// - `kiln_adapters::build_tool::RecordingBuildTool` (testing)
///
/// Callers go through `BuildExecutor`, which enforces
/// configure → build → install.
pub trait BuildTool: Send + Sync {
    /// Generate the build tree for `ctx.layout.build_folder`.
    fn configure(&self, ctx: &BuildContext) -> KilnResult<()>;

    /// Build `target`, or everything when `None`.
    fn build(&self, ctx: &BuildContext, target: Option<&str>) -> KilnResult<()>;

    /// Install build outputs into `ctx.layout.package_folder`.
    fn install(&self, ctx: &BuildContext) -> KilnResult<()>;
}
