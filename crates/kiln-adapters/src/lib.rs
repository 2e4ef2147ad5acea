//! Infrastructure adapters for Kiln.
//!
//! This crate implements the ports defined in `kiln-core::application::ports`
//! and ships the recipes Kiln knows how to build. It contains all external
//! dependencies and I/O operations.

pub mod build_tool;
pub mod filesystem;
pub mod recipe_loader;
pub mod recipes;

// Re-export commonly used adapters
pub use build_tool::{CMakeTool, RecordingBuildTool};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use recipe_loader::{DeclarativeRecipe, RECIPE_FILE, RecipeLoadError};
pub use recipes::{BUILTIN_RECIPES, DawgLoggerRecipe};
