//! Package Service - runs a full build and publishes the package.
//!
//! This service wraps the lifecycle for a real build:
//! 1. Prepare build, generators and package folders
//! 2. Run every recipe hook
//! 3. Publish `kiln-package.json` into the package folder
//!
//! A package folder without the manifest is incomplete. On failure the
//! partial package folder is removed (best effort).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{BuildTool, Filesystem},
        recipe::Recipe,
        services::{BuildOutcome, Lifecycle},
    },
    domain::{Layout, LayoutRoots, Options, PackageInfo, Settings},
    error::KilnResult,
};

/// File name of the manifest marking a complete package.
pub const MANIFEST_FILE: &str = "kiln-package.json";

/// What `kiln-package.json` records about a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub reference: String,
    pub package_id: String,
    pub settings: Settings,
    pub options: Options,
    pub tool_requirements: Vec<String>,
    pub requirements: Vec<String>,
    pub package_info: PackageInfo,
    /// Packaged extra files, relative to the package folder.
    pub files: Vec<PathBuf>,
}

impl PackageManifest {
    pub fn from_outcome(outcome: &BuildOutcome) -> Self {
        let package_folder = &outcome.layout.package_folder;
        Self {
            reference: outcome.reference.clone(),
            package_id: outcome.package_id.to_string(),
            settings: outcome.settings.clone(),
            options: outcome.options.clone(),
            tool_requirements: outcome
                .tool_requirements
                .iter()
                .map(ToString::to_string)
                .collect(),
            requirements: outcome.requirements.iter().map(ToString::to_string).collect(),
            package_info: outcome.package_info.clone(),
            files: outcome
                .packaged_files
                .iter()
                .map(|f| f.strip_prefix(package_folder).unwrap_or(f).to_path_buf())
                .collect(),
        }
    }

    pub fn to_json(&self) -> KilnResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ApplicationError::FilesystemError {
                path: PathBuf::from(MANIFEST_FILE),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Main build-and-package service.
pub struct PackageService {
    tool: Box<dyn BuildTool>,
    filesystem: Box<dyn Filesystem>,
}

impl PackageService {
    /// Create a new package service with the given adapters.
    pub fn new(tool: Box<dyn BuildTool>, filesystem: Box<dyn Filesystem>) -> Self {
        Self { tool, filesystem }
    }

    /// Build and package `recipe` for `settings`.
    #[instrument(
        skip_all,
        fields(
            recipe = %recipe.descriptor().reference(),
            workspace = %roots.workspace_root.display()
        )
    )]
    pub fn create<R: Recipe>(
        &self,
        recipe: R,
        settings: Settings,
        options: &[String],
        roots: &LayoutRoots,
    ) -> KilnResult<BuildOutcome> {
        info!("Creating package for {}", settings);

        let lifecycle = Lifecycle::new(self.tool.as_ref(), self.filesystem.as_ref());
        let mut prepared: Option<PathBuf> = None;

        let result = lifecycle
            .run_with(recipe, settings, options, roots, |layout| {
                self.prepare_folders(layout)?;
                prepared = Some(layout.package_folder.clone());
                Ok(())
            })
            .and_then(|outcome| {
                self.publish(&outcome)?;
                Ok(outcome)
            });

        match result {
            Ok(outcome) => {
                info!(package_id = %outcome.package_id, "Package created");
                Ok(outcome)
            }
            Err(e) => {
                if let Some(package_folder) = prepared {
                    warn!("Build failed, removing partial package");
                    self.rollback(&package_folder);
                }
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Create the folders the build tool writes into. A stale package folder
    /// is cleared first.
    fn prepare_folders(&self, layout: &Layout) -> KilnResult<()> {
        if self.filesystem.exists(&layout.package_folder) {
            warn!(path = %layout.package_folder.display(), "Replacing existing package folder");
            self.filesystem.remove_dir_all(&layout.package_folder)?;
        }
        self.filesystem.create_dir_all(&layout.build_folder)?;
        self.filesystem.create_dir_all(&layout.generators_folder)?;
        self.filesystem.create_dir_all(&layout.package_folder)?;
        Ok(())
    }

    fn publish(&self, outcome: &BuildOutcome) -> KilnResult<()> {
        let manifest = PackageManifest::from_outcome(outcome);
        let path = outcome.layout.in_package(MANIFEST_FILE);
        self.filesystem.write_file(&path, &manifest.to_json()?)?;
        info!(path = %path.display(), "Manifest written");
        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}
