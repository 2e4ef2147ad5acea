//! Kiln Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Kiln, a runner
//! for native-library build recipes, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            kiln-cli (CLI)               │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │      (Lifecycle, PackageService)        │
//! │   Runs recipe hooks in a fixed order    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │     (Driven: BuildTool, Filesystem)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     kiln-adapters (Infrastructure)      │
//! │  (CMakeTool, LocalFilesystem, recipes)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (Settings, Layout, Requirements, ...)  │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Recipe lifecycle
//!
//! ```text
//! settings ─► layout ─► build_requirements ─► requirements
//!          ─► build (configure → build → install) ─► package ─► package_info
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kiln_core::prelude::*;
//!
//! # fn run(recipe: Box<dyn Recipe>, tool: Box<dyn BuildTool>, fs: Box<dyn Filesystem>) -> KilnResult<()> {
//! let settings = Settings::detect()?.apply(["build_type=Release"])?;
//! let roots = LayoutRoots::new("./dawg-logger", "./.kiln");
//!
//! let service = PackageService::new(tool, fs);
//! let outcome = service.create(recipe, settings, &[], &roots)?;
//! println!("packaged {} as {}", outcome.reference, outcome.package_id);
//! # Ok(())
//! # }
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BuildContext, BuildExecutor, BuildOutcome, Lifecycle, PackageService, Packager, Recipe,
        Stage,
        ports::{BuildTool, Filesystem},
    };
    pub use crate::domain::{
        Arch, BuildType, Compiler, Layout, LayoutRoots, LayoutStyle, OptionDecl, Options, Os,
        PackageId, PackageInfo, RecipeDescriptor, RequirementKind, RequirementSet, Settings,
        SettingsAxis,
    };
    pub use crate::error::{KilnError, KilnResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
