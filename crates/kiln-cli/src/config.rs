//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `KILN_<SECTION>__<KEY>`, e.g. `KILN_BUILD__JOBS=8`
//! 3. Config file (`--config` or the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Component, Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use kiln_core::domain::{DomainResult, Settings};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default build profile.
    pub profile: ProfileConfig,
    /// Build tool and workspace settings.
    pub build: BuildConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// Settings applied before any `-s` flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// `key=value` assignments layered over the detected host settings.
    pub settings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build workspace, relative to the current directory unless absolute.
    /// Must not sit inside the source tree.
    pub workspace: PathBuf,
    /// `cmake` executable.
    pub cmake: PathBuf,
    /// Parallel jobs; unset lets the native build tool decide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            workspace: default_workspace(),
            cmake: PathBuf::from("cmake"),
            jobs: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

/// The platform cache dir, falling back to `.kiln` in the current directory.
fn default_workspace() -> PathBuf {
    directories::ProjectDirs::from("dev", "kiln", "kiln")
        .map(|d| d.cache_dir().join("workspace"))
        .unwrap_or_else(|| PathBuf::from(".kiln"))
}

impl AppConfig {
    /// Load configuration, layering file and environment over defaults.
    ///
    /// A file passed with `--config` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };

        let defaults = ::config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        ::config::Config::builder()
            .add_source(defaults)
            .add_source(
                ::config::File::from(path.as_path())
                    .format(::config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                ::config::Environment::with_prefix("KILN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from '{}'", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.kiln.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "kiln", "kiln")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".kiln.toml"))
    }

    /// Host settings with the profile and then `overrides` applied.
    ///
    /// An unsupported host only seeds [`Settings::fallback`]; the profile and
    /// overrides are applied as one batch and validated together.
    pub fn settings(&self, overrides: &[String]) -> DomainResult<Settings> {
        let base = Settings::detect().unwrap_or_else(|e| {
            debug!(error = %e, "Host is not a supported target, using fallback settings");
            Settings::fallback()
        });
        self.settings_from(base, overrides)
    }

    fn settings_from(&self, base: Settings, overrides: &[String]) -> DomainResult<Settings> {
        base.apply(self.profile.settings.iter().chain(overrides))
    }

    /// Workspace root: the flag if given, else the configured one, resolved
    /// against `cwd` with `.` and `..` folded away.
    pub fn workspace(&self, flag: Option<&Path>, cwd: &Path) -> PathBuf {
        let workspace = flag.unwrap_or(&self.build.workspace);
        let mut resolved = PathBuf::new();
        for component in cwd.join(workspace).components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                other => resolved.push(other),
            }
        }
        resolved
    }
}
