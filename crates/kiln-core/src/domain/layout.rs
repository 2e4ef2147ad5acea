//! Layout resolution: where sources live, where the build happens, where the
//! package is installed.
//!
//! Resolution is a pure function of its inputs. Hooks that run after
//! `layout()` address folders only through the resolved [`Layout`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::descriptor::RecipeDescriptor;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::options::Options;
use crate::domain::package_id::PackageId;
use crate::domain::settings::Settings;

/// Folder name for generator output inside the build folder.
pub const GENERATORS_DIR: &str = "generators";

/// Roots owned by whoever drives the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutRoots {
    /// The library's source tree.
    pub source_root: PathBuf,
    /// Scratch space for build trees and package folders.
    pub workspace_root: PathBuf,
}

impl LayoutRoots {
    pub fn new(source_root: impl Into<PathBuf>, workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            workspace_root: workspace_root.into(),
        }
    }
}

/// How build folders are derived from settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStyle {
    /// One `build/` tree regardless of settings.
    #[default]
    Basic,
    /// `build/<build_type>` for single-config generators, `build/` for
    /// multi-config ones.
    CMake,
}

/// Resolved folder roles for one build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layout {
    pub source_folder: PathBuf,
    pub build_folder: PathBuf,
    pub generators_folder: PathBuf,
    pub package_folder: PathBuf,
}

impl Layout {
    /// Resolve the layout for `descriptor` under `settings` and `options`.
    ///
    /// # Errors
    ///
    /// [`DomainError::OverlappingLayout`] if the source, build or package
    /// folder would be nested inside one of the others.
    pub fn resolve(
        style: LayoutStyle,
        descriptor: &RecipeDescriptor,
        settings: &Settings,
        options: &Options,
        roots: &LayoutRoots,
    ) -> DomainResult<Self> {
        let build_root = roots.workspace_root.join("build");
        let build_folder = match style {
            LayoutStyle::Basic => build_root,
            LayoutStyle::CMake if settings.compiler.is_multi_config() => build_root,
            LayoutStyle::CMake => build_root.join(settings.build_type.folder_name()),
        };

        let package_id = PackageId::compute(descriptor, settings, options);
        let layout = Self {
            source_folder: roots.source_root.clone(),
            generators_folder: build_folder.join(GENERATORS_DIR),
            build_folder,
            package_folder: roots.workspace_root.join("package").join(package_id.as_str()),
        };

        layout.ensure_disjoint()?;
        Ok(layout)
    }

    /// Source, build and package folders must not contain one another.
    pub fn ensure_disjoint(&self) -> DomainResult<()> {
        let roles = [
            &self.source_folder,
            &self.build_folder,
            &self.package_folder,
        ];
        for (i, outer) in roles.iter().enumerate() {
            for (j, inner) in roles.iter().enumerate() {
                if i != j && inner.starts_with(outer) {
                    return Err(DomainError::OverlappingLayout {
                        outer: outer.display().to_string(),
                        inner: inner.display().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Path of `relative` inside the package folder.
    pub fn in_package(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.package_folder.join(relative)
    }
}
