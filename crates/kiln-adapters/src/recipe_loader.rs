//! Declarative recipes loaded from `recipe.toml`.
//!
//! # `recipe.toml` format
//!
//! ```toml
//! [recipe]
//! name    = "dawg-logger"
//! version = "1.1.0"
//! generators = ["CMakeToolchain", "CMakeDeps"]
//! layout  = "cmake"                # basic | cmake (default basic)
//!
//! [settings]
//! axes = ["os", "compiler", "build_type", "arch"]
//!
//! [[options]]
//! name    = "shared"
//! values  = ["True", "False"]
//! default = "False"
//!
//! [requirements]
//! tool = ["cmake/3.16.9"]
//! host = ["fmt/*", "nlohmann_json/3.12.0"]
//!
//! [build]                          # omit to skip the build tool entirely
//! targets = ["dawg-logger"]        # empty builds everything
//! install = true
//!
//! [[package.copy]]
//! pattern   = "LICENSE*"
//! from      = "source"             # source | build
//! keep_path = false
//!
//! [package_info]
//! libs = ["dawg-logger"]
//! [package_info.properties]
//! cmake_target_name = "DawgLog::dawg-logger"
//! ```
//!
//! Options, copy patterns and both requirement sets (including conflicts
//! within a set and names shared between `tool` and `host`) are validated
//! at load time. Settings and option values are only known at run time and
//! are checked then.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use kiln_core::{
    application::{ApplicationError, BuildExecutor, Packager, Recipe},
    domain::{
        DomainError, Layout, LayoutRoots, LayoutStyle, OptionDecl, Options, PackageInfo,
        RecipeDescriptor, RequirementKind, RequirementSet, Settings, SettingsAxis,
    },
    error::{KilnError, KilnResult},
};

/// Manifest file name looked up inside a recipe directory.
pub const RECIPE_FILE: &str = "recipe.toml";

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RecipeLoadError {
    #[error("no recipe.toml at '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid recipe '{}': {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: DomainError,
    },
}

impl From<RecipeLoadError> for KilnError {
    fn from(e: RecipeLoadError) -> Self {
        match e {
            RecipeLoadError::NotFound { path } => ApplicationError::RecipeNotFound {
                name: path.display().to_string(),
            }
            .into(),
            other => KilnError::configuration(other.to_string()),
        }
    }
}

// ── Manifest types ───────────────────────────────────────────────────────────

/// Deserialised representation of a `recipe.toml` file.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct RecipeManifest {
    pub recipe: RecipeSection,
    #[serde(default)]
    pub settings: SettingsSection,
    #[serde(default)]
    pub options: Vec<OptionEntry>,
    #[serde(default)]
    pub requirements: RequirementsSection,
    pub build: Option<BuildSection>,
    #[serde(default)]
    pub package: PackageSection,
    #[serde(default)]
    pub package_info: Option<PackageInfoSection>,
}

/// `[recipe]` section: identity and static metadata.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct RecipeSection {
    pub name: String,
    pub version: String,
    pub author: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub exports_sources: Vec<String>,
    #[serde(default)]
    pub generators: Vec<String>,
    #[serde(default)]
    pub layout: LayoutStyle,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct SettingsSection {
    #[serde(default)]
    pub axes: Vec<String>,
}

/// One entry under `[[options]]`.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct OptionEntry {
    pub name: String,
    pub values: Vec<String>,
    pub default: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct RequirementsSection {
    #[serde(default)]
    pub tool: Vec<String>,
    #[serde(default)]
    pub host: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default = "default_true")]
    pub install: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    #[serde(default)]
    pub copy: Vec<CopyEntry>,
}

/// One entry under `[[package.copy]]`.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CopyEntry {
    pub pattern: String,
    #[serde(default)]
    pub from: CopySource,
    #[serde(default)]
    pub keep_path: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CopySource {
    #[default]
    Source,
    Build,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct PackageInfoSection {
    #[serde(default)]
    pub libs: Vec<String>,
    pub include_dirs: Option<Vec<String>>,
    pub lib_dirs: Option<Vec<String>>,
    pub bin_dirs: Option<Vec<String>>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

// ── Recipe ───────────────────────────────────────────────────────────────────

/// A [`Recipe`] whose hooks are driven by a parsed [`RecipeManifest`].
#[derive(Debug, Clone)]
pub struct DeclarativeRecipe {
    descriptor: RecipeDescriptor,
    manifest: RecipeManifest,
    origin: PathBuf,
}

impl DeclarativeRecipe {
    /// Load from a `recipe.toml` path or a directory containing one.
    #[instrument(fields(path = %path.as_ref().display()), skip_all)]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecipeLoadError> {
        let path = path.as_ref();
        let file = if path.is_dir() {
            path.join(RECIPE_FILE)
        } else {
            path.to_path_buf()
        };
        if !file.is_file() {
            return Err(RecipeLoadError::NotFound { path: file });
        }

        let raw = fs::read_to_string(&file).map_err(|source| RecipeLoadError::Io {
            path: file.clone(),
            source,
        })?;
        let recipe = Self::from_toml_str(&raw, &file)?;
        debug!(reference = %recipe.descriptor.reference(), "loaded recipe");
        Ok(recipe)
    }

    /// Parse manifest text. `origin` is only used in error messages.
    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, RecipeLoadError> {
        let manifest: RecipeManifest =
            toml::from_str(raw).map_err(|source| RecipeLoadError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;
        let descriptor = descriptor_from(&manifest).map_err(|source| RecipeLoadError::Invalid {
            path: origin.to_path_buf(),
            source,
        })?;

        Ok(Self {
            descriptor,
            manifest,
            origin: origin.to_path_buf(),
        })
    }

    pub fn manifest(&self) -> &RecipeManifest {
        &self.manifest
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }
}

fn descriptor_from(manifest: &RecipeManifest) -> Result<RecipeDescriptor, DomainError> {
    let section = &manifest.recipe;
    let mut builder = RecipeDescriptor::builder(&section.name, &section.version)
        .topics(section.topics.iter().cloned())
        .exports_sources(section.exports_sources.iter().cloned())
        .generators(section.generators.iter().cloned());

    if let Some(author) = &section.author {
        builder = builder.author(author);
    }
    if let Some(url) = &section.url {
        builder = builder.url(url);
    }
    if let Some(description) = &section.description {
        builder = builder.description(description);
    }
    if let Some(license) = &section.license {
        builder = builder.license(license);
    }

    let axes = manifest
        .settings
        .axes
        .iter()
        .map(|a| a.parse::<SettingsAxis>())
        .collect::<Result<Vec<_>, _>>()?;
    builder = builder.settings(axes);

    for option in &manifest.options {
        builder = builder.option(OptionDecl::new(
            &option.name,
            option.values.iter().cloned(),
            &option.default,
        )?);
    }

    // Requirement sets and copy patterns fail here rather than mid-run.
    let reqs = &manifest.requirements;
    let mut tools = RequirementSet::new(RequirementKind::Build);
    for reference in &reqs.tool {
        tools.add(reference)?;
    }
    let mut host = RequirementSet::new(RequirementKind::Host);
    for reference in &reqs.host {
        host.add(reference)?;
    }
    RequirementSet::ensure_disjoint(&tools, &host)?;
    for copy in &manifest.package.copy {
        glob::Pattern::new(&copy.pattern).map_err(|e| {
            DomainError::InvalidDescriptor(format!("invalid copy pattern '{}': {e}", copy.pattern))
        })?;
    }

    builder.build()
}

impl Recipe for DeclarativeRecipe {
    fn descriptor(&self) -> &RecipeDescriptor {
        &self.descriptor
    }

    fn layout(
        &self,
        settings: &Settings,
        options: &Options,
        roots: &LayoutRoots,
    ) -> KilnResult<Layout> {
        Ok(Layout::resolve(
            self.manifest.recipe.layout,
            &self.descriptor,
            settings,
            options,
            roots,
        )?)
    }

    fn build_requirements(&self, requirements: &mut RequirementSet) -> KilnResult<()> {
        for reference in &self.manifest.requirements.tool {
            requirements.add(reference)?;
        }
        Ok(())
    }

    fn requirements(&self, requirements: &mut RequirementSet) -> KilnResult<()> {
        for reference in &self.manifest.requirements.host {
            requirements.add(reference)?;
        }
        Ok(())
    }

    fn build(&self, build: &mut BuildExecutor<'_>) -> KilnResult<()> {
        let Some(section) = &self.manifest.build else {
            return Ok(());
        };

        build.configure()?;
        if section.targets.is_empty() {
            build.build(None)?;
        } else {
            for target in &section.targets {
                build.build(Some(target))?;
            }
        }
        if section.install {
            build.install()?;
        }
        Ok(())
    }

    fn package(&self, packager: &mut Packager<'_>) -> KilnResult<()> {
        for copy in &self.manifest.package.copy {
            match copy.from {
                CopySource::Source => packager.copy_from_source(&copy.pattern, copy.keep_path)?,
                CopySource::Build => packager.copy_from_build(&copy.pattern, copy.keep_path)?,
            };
        }
        Ok(())
    }

    fn package_info(&self, info: &mut PackageInfo) {
        let Some(section) = &self.manifest.package_info else {
            return;
        };

        info.libs = section.libs.clone();
        if let Some(dirs) = &section.include_dirs {
            info.include_dirs = dirs.clone();
        }
        if let Some(dirs) = &section.lib_dirs {
            info.lib_dirs = dirs.clone();
        }
        if let Some(dirs) = &section.bin_dirs {
            info.bin_dirs = dirs.clone();
        }
        for (key, value) in &section.properties {
            info.set_property(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_tool::{RecordedCall, RecordingBuildTool};
    use crate::filesystem::MemoryFilesystem;
    use crate::recipes::DawgLoggerRecipe;
    use kiln_core::application::Lifecycle;
    use kiln_core::domain::{Arch, BuildType, Compiler, Os};
    use tempfile::TempDir;

    const DAWG: &str = include_str!("../assets/dawg-logger/recipe.toml");

    fn settings() -> Settings {
        Settings::new(Os::Linux, Compiler::Gcc, BuildType::Release, Arch::X86_64).unwrap()
    }

    fn roots() -> LayoutRoots {
        LayoutRoots::new("/src/dawg-logger", "/var/kiln")
    }

    fn parse(raw: &str) -> Result<DeclarativeRecipe, RecipeLoadError> {
        DeclarativeRecipe::from_toml_str(raw, Path::new("recipe.toml"))
    }

    #[test]
    fn bundled_manifest_matches_builtin_recipe() {
        let declarative = parse(DAWG).unwrap();
        let builtin = DawgLoggerRecipe::new().unwrap();

        assert_eq!(declarative.descriptor(), builtin.descriptor());

        let a = Lifecycle::plan(&declarative, settings(), &[], &roots()).unwrap();
        let b = Lifecycle::plan(&builtin, settings(), &[], &roots()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn declarative_run_mirrors_builtin_calls() {
        let tool = RecordingBuildTool::new();
        let fs = MemoryFilesystem::new().with_file("/src/dawg-logger/LICENSE", "MIT");

        let outcome = Lifecycle::new(&tool, &fs)
            .run(parse(DAWG).unwrap(), settings(), &[], &roots())
            .unwrap();

        assert_eq!(
            tool.calls(),
            [
                RecordedCall::configure(),
                RecordedCall::build(Some("dawg-logger")),
                RecordedCall::install(),
            ]
        );
        assert_eq!(
            outcome.package_info.cmake_target_name(),
            Some("DawgLog::dawg-logger")
        );
        assert_eq!(outcome.packaged_files.len(), 1);
    }

    #[test]
    fn minimal_manifest_uses_defaults() {
        let recipe = parse("[recipe]\nname = \"zlib\"\nversion = \"1.3\"\n").unwrap();
        let tool = RecordingBuildTool::new();
        let fs = MemoryFilesystem::new();

        let outcome = Lifecycle::new(&tool, &fs)
            .run(recipe, settings(), &[], &roots())
            .unwrap();

        assert!(tool.calls().is_empty());
        assert_eq!(outcome.layout.build_folder, PathBuf::from("/var/kiln/build"));
        assert!(outcome.package_info.libs.is_empty());
    }

    #[test]
    fn empty_targets_build_everything() {
        let raw = "[recipe]\nname = \"zlib\"\nversion = \"1.3\"\n[build]\ninstall = false\n";
        let tool = RecordingBuildTool::new();
        let fs = MemoryFilesystem::new();

        Lifecycle::new(&tool, &fs)
            .run(parse(raw).unwrap(), settings(), &[], &roots())
            .unwrap();

        assert_eq!(
            tool.calls(),
            [RecordedCall::configure(), RecordedCall::build(None)]
        );
    }

    #[test]
    fn bad_requirement_is_rejected_at_load() {
        let raw = "[recipe]\nname = \"zlib\"\nversion = \"1.3\"\n[requirements]\nhost = [\"fmt\"]\n";
        let err = parse(raw).unwrap_err();
        assert!(matches!(
            err,
            RecipeLoadError::Invalid {
                source: DomainError::InvalidRequirement { .. },
                ..
            }
        ));
    }

    #[test]
    fn conflicting_or_overlapping_requirements_are_rejected_at_load() {
        let conflict = "[recipe]\nname = \"zlib\"\nversion = \"1.3\"\n\
                        [requirements]\ntool = [\"cmake/3.16.9\", \"cmake/3.20\"]\n";
        assert!(matches!(
            parse(conflict),
            Err(RecipeLoadError::Invalid {
                source: DomainError::ConflictingRequirement { .. },
                ..
            })
        ));

        let overlap = "[recipe]\nname = \"zlib\"\nversion = \"1.3\"\n\
                       [requirements]\ntool = [\"cmake/3.16.9\"]\nhost = [\"cmake/3.16.9\"]\n";
        assert!(matches!(
            parse(overlap),
            Err(RecipeLoadError::Invalid {
                source: DomainError::RequirementKindOverlap { .. },
                ..
            })
        ));
    }

    #[test]
    fn unknown_axis_and_fields_are_rejected() {
        let axis = "[recipe]\nname = \"zlib\"\nversion = \"1.3\"\n[settings]\naxes = [\"libc\"]\n";
        assert!(matches!(parse(axis), Err(RecipeLoadError::Invalid { .. })));

        let field = "[recipe]\nname = \"zlib\"\nversion = \"1.3\"\nflavour = \"x\"\n";
        assert!(matches!(parse(field), Err(RecipeLoadError::Parse { .. })));
    }

    #[test]
    fn load_accepts_directory_and_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = DeclarativeRecipe::load(dir.path()).unwrap_err();
        assert!(matches!(err, RecipeLoadError::NotFound { .. }));
        let kiln: KilnError = err.into();
        assert_eq!(kiln.category(), kiln_core::error::ErrorCategory::NotFound);

        std::fs::write(dir.path().join(RECIPE_FILE), DAWG).unwrap();
        let recipe = DeclarativeRecipe::load(dir.path()).unwrap();
        assert_eq!(recipe.descriptor().name(), "dawg-logger");
        assert_eq!(recipe.origin(), dir.path().join(RECIPE_FILE));
    }

    #[test]
    fn load_errors_become_configuration_errors() {
        let err: KilnError = parse("not toml [").unwrap_err().into();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("recipe.toml"));
    }
}
