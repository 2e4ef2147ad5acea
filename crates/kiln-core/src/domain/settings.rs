//! Settings value objects: the axes of build variation.
//!
//! # Design
//!
//! Each axis is a closed, `Copy` enum with a canonical spelling (`as_str`) and
//! a forgiving `FromStr` parser. A [`Settings`] tuple is supplied by whoever
//! drives the lifecycle; recipes only ever read it.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. If the variant constrains another axis, extend [`Settings::validate`]

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

// ── Os ───────────────────────────────────────────────────────────────────────

/// Target operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Os {
    Linux,
    Windows,
    Macos,
    FreeBsd,
}

impl Os {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::Macos => "Macos",
            Self::FreeBsd => "FreeBSD",
        }
    }

    /// Operating system of the running host, if supported.
    pub fn host() -> Option<Self> {
        match std::env::consts::OS {
            "linux" => Some(Self::Linux),
            "windows" => Some(Self::Windows),
            "macos" => Some(Self::Macos),
            "freebsd" => Some(Self::FreeBsd),
            _ => None,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "windows" | "win" => Ok(Self::Windows),
            "macos" | "darwin" | "osx" => Ok(Self::Macos),
            "freebsd" => Ok(Self::FreeBsd),
            _ => Err(invalid("os", s)),
        }
    }
}

// ── Compiler ─────────────────────────────────────────────────────────────────

/// Compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Compiler {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
}

impl Compiler {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::AppleClang => "apple-clang",
            Self::Msvc => "msvc",
        }
    }

    /// Whether the native generator for this compiler builds every
    /// configuration from one build tree (Visual Studio).
    pub const fn is_multi_config(&self) -> bool {
        matches!(self, Self::Msvc)
    }

    /// The compiler a host of `os` ships by default.
    pub const fn default_for(os: Os) -> Self {
        match os {
            Os::Linux => Self::Gcc,
            Os::Windows => Self::Msvc,
            Os::Macos => Self::AppleClang,
            Os::FreeBsd => Self::Clang,
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compiler {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gcc" | "gnu" => Ok(Self::Gcc),
            "clang" | "llvm" => Ok(Self::Clang),
            "apple-clang" | "appleclang" => Ok(Self::AppleClang),
            "msvc" | "visual studio" | "cl" => Ok(Self::Msvc),
            _ => Err(invalid("compiler", s)),
        }
    }
}

// ── BuildType ────────────────────────────────────────────────────────────────

/// Build configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }

    /// Lowercase folder name used by per-configuration build trees.
    pub fn folder_name(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            "relwithdebinfo" => Ok(Self::RelWithDebInfo),
            "minsizerel" => Ok(Self::MinSizeRel),
            _ => Err(invalid("build_type", s)),
        }
    }
}

// ── Arch ─────────────────────────────────────────────────────────────────────

/// Target CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Arch {
    X86,
    X86_64,
    Armv7,
    Armv8,
}

impl Arch {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Armv7 => "armv7",
            Self::Armv8 => "armv8",
        }
    }

    /// Architecture of the running host, if supported.
    pub fn host() -> Option<Self> {
        match std::env::consts::ARCH {
            "x86" => Some(Self::X86),
            "x86_64" => Some(Self::X86_64),
            "arm" => Some(Self::Armv7),
            "aarch64" => Some(Self::Armv8),
            _ => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "i686" | "i386" => Ok(Self::X86),
            "x86_64" | "amd64" | "x64" => Ok(Self::X86_64),
            "armv7" | "arm" => Ok(Self::Armv7),
            "armv8" | "aarch64" | "arm64" => Ok(Self::Armv8),
            _ => Err(invalid("arch", s)),
        }
    }
}

fn invalid(axis: &str, value: &str) -> DomainError {
    DomainError::InvalidSetting {
        axis: axis.into(),
        value: value.into(),
    }
}

// ── SettingsAxis ─────────────────────────────────────────────────────────────

/// Name of one settings axis a recipe can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsAxis {
    Os,
    Compiler,
    BuildType,
    Arch,
}

impl SettingsAxis {
    /// All axes in canonical order.
    pub const ALL: [SettingsAxis; 4] = [Self::Os, Self::Compiler, Self::BuildType, Self::Arch];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Os => "os",
            Self::Compiler => "compiler",
            Self::BuildType => "build_type",
            Self::Arch => "arch",
        }
    }
}

impl fmt::Display for SettingsAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsAxis {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "os" => Ok(Self::Os),
            "compiler" => Ok(Self::Compiler),
            "build_type" => Ok(Self::BuildType),
            "arch" => Ok(Self::Arch),
            other => Err(DomainError::UnknownSettingsAxis(other.into())),
        }
    }
}

// ── Settings ─────────────────────────────────────────────────────────────────

/// The settings tuple for one build invocation.
///
/// [`Settings::new`] and [`Settings::apply`] both end in
/// [`Settings::validate`]. Fields are public and deserialization does not
/// validate, so call [`Settings::validate`] on values built any other way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    pub compiler: Compiler,
    pub build_type: BuildType,
    pub arch: Arch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cppstd: Option<String>,
}

impl Settings {
    pub fn new(os: Os, compiler: Compiler, build_type: BuildType, arch: Arch) -> DomainResult<Self> {
        let settings = Self {
            os,
            compiler,
            build_type,
            arch,
            compiler_version: None,
            cppstd: None,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Settings describing the running host, `Release` build type.
    pub fn detect() -> DomainResult<Self> {
        let os = Os::host().ok_or_else(|| invalid("os", std::env::consts::OS))?;
        let arch = Arch::host().ok_or_else(|| invalid("arch", std::env::consts::ARCH))?;
        Self::new(os, Compiler::default_for(os), BuildType::Release, arch)
    }

    /// `Linux/gcc/Release/x86_64`, the base profile when the host is not a
    /// supported target.
    pub fn fallback() -> Self {
        Self {
            os: Os::Linux,
            compiler: Compiler::Gcc,
            build_type: BuildType::Release,
            arch: Arch::X86_64,
            compiler_version: None,
            cppstd: None,
        }
    }

    pub fn with_compiler_version(mut self, version: impl Into<String>) -> DomainResult<Self> {
        self.compiler_version = Some(version.into());
        self.validate()?;
        Ok(self)
    }

    pub fn with_cppstd(mut self, cppstd: impl Into<String>) -> DomainResult<Self> {
        self.cppstd = Some(cppstd.into());
        self.validate()?;
        Ok(self)
    }

    /// Apply `key=value` assignments on top of these settings.
    ///
    /// Keys are `os`, `compiler`, `compiler.version`, `compiler.cppstd`,
    /// `build_type` and `arch`. Changing the compiler family drops a
    /// previously set compiler version. Changing `os` without naming a
    /// compiler in the same batch switches to that OS's default compiler.
    /// Only the final combination is validated.
    pub fn apply<I, S>(mut self, assignments: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let original_os = self.os;
        let mut compiler_named = false;
        for raw in assignments {
            let (key, value) = split_assignment(raw.as_ref())?;
            match key {
                "os" => self.os = value.parse()?,
                "compiler" => {
                    let compiler = value.parse()?;
                    self.set_compiler(compiler);
                    compiler_named = true;
                }
                "compiler.version" => self.compiler_version = Some(value.to_string()),
                "compiler.cppstd" => self.cppstd = Some(value.to_string()),
                "build_type" => self.build_type = value.parse()?,
                "arch" => self.arch = value.parse()?,
                other => return Err(DomainError::UnknownSettingsAxis(other.into())),
            }
        }
        if self.os != original_os && !compiler_named {
            self.set_compiler(Compiler::default_for(self.os));
        }
        self.validate()?;
        Ok(self)
    }

    fn set_compiler(&mut self, compiler: Compiler) {
        if compiler != self.compiler {
            self.compiler_version = None;
        }
        self.compiler = compiler;
    }

    /// Check cross-axis invariants.
    pub fn validate(&self) -> DomainResult<()> {
        match (self.compiler, self.os) {
            (Compiler::Msvc, os) if os != Os::Windows => {
                return Err(DomainError::IncompatibleSettings {
                    reason: format!("compiler msvc is only available on Windows, not {os}"),
                });
            }
            (Compiler::AppleClang, os) if os != Os::Macos => {
                return Err(DomainError::IncompatibleSettings {
                    reason: format!("compiler apple-clang is only available on Macos, not {os}"),
                });
            }
            _ => {}
        }

        if let Some(version) = &self.compiler_version {
            let well_formed = !version.is_empty()
                && version
                    .split('.')
                    .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
            if !well_formed {
                return Err(invalid("compiler.version", version));
            }
        }

        if let Some(cppstd) = &self.cppstd {
            let digits = cppstd.strip_prefix("gnu").unwrap_or(cppstd);
            if !matches!(digits, "98" | "11" | "14" | "17" | "20" | "23" | "26") {
                return Err(invalid("compiler.cppstd", cppstd));
            }
        }

        Ok(())
    }

    /// Canonical `key → value` view of the axes in `axes`, including compiler
    /// sub-settings when the compiler axis is present.
    pub fn values_for(&self, axes: &[SettingsAxis]) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        for axis in axes {
            match axis {
                SettingsAxis::Os => {
                    values.insert("os".into(), self.os.to_string());
                }
                SettingsAxis::Compiler => {
                    values.insert("compiler".into(), self.compiler.to_string());
                    if let Some(version) = &self.compiler_version {
                        values.insert("compiler.version".into(), version.clone());
                    }
                    if let Some(cppstd) = &self.cppstd {
                        values.insert("compiler.cppstd".into(), cppstd.clone());
                    }
                }
                SettingsAxis::BuildType => {
                    values.insert("build_type".into(), self.build_type.to_string());
                }
                SettingsAxis::Arch => {
                    values.insert("arch".into(), self.arch.to_string());
                }
            }
        }
        values
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "os={} compiler={}", self.os, self.compiler)?;
        if let Some(version) = &self.compiler_version {
            write!(f, "-{version}")?;
        }
        write!(f, " build_type={} arch={}", self.build_type, self.arch)
    }
}

/// Split `key=value`, trimming whitespace around both halves.
pub(crate) fn split_assignment(raw: &str) -> DomainResult<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
            Ok((key.trim(), value.trim()))
        }
        _ => Err(DomainError::MalformedAssignment(raw.into())),
    }
}
