// ============================================================================
// domain/error.rs - RECIPE DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant is a configuration error in the recipe sense: it is raised
/// before any build-tool invocation and aborts the lifecycle immediately.
/// All errors are:
/// - Cloneable (so the orchestrator can report them after logging)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Settings & options
    // ========================================================================
    #[error("invalid value '{value}' for setting '{axis}'")]
    InvalidSetting { axis: String, value: String },

    #[error("unknown settings axis '{0}'")]
    UnknownSettingsAxis(String),

    #[error("incompatible settings: {reason}")]
    IncompatibleSettings { reason: String },

    #[error("recipe does not declare option '{name}'")]
    UnknownOption { name: String },

    #[error("invalid value '{value}' for option '{name}' (allowed: {allowed})")]
    InvalidOptionValue {
        name: String,
        value: String,
        allowed: String,
    },

    #[error("malformed assignment '{0}', expected key=value")]
    MalformedAssignment(String),

    // ========================================================================
    // Descriptor
    // ========================================================================
    #[error("invalid recipe descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    // ========================================================================
    // Requirements
    // ========================================================================
    #[error("invalid requirement '{reference}': {reason}")]
    InvalidRequirement { reference: String, reason: String },

    #[error("requirement '{name}' declared twice with different constraints: '{existing}' vs '{requested}'")]
    ConflictingRequirement {
        name: String,
        existing: String,
        requested: String,
    },

    #[error("'{name}' is declared both as a tool requirement and as a regular requirement")]
    RequirementKindOverlap { name: String },

    // ========================================================================
    // Layout
    // ========================================================================
    #[error("layout folders overlap: '{outer}' contains '{inner}'")]
    OverlappingLayout { outer: String, inner: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidSetting { axis, .. } => vec![
                format!("Supported values for '{axis}':"),
                match axis.as_str() {
                    "os" => "  • Linux, Windows, Macos, FreeBSD".into(),
                    "compiler" => "  • gcc, clang, apple-clang, msvc".into(),
                    "build_type" => "  • Debug, Release, RelWithDebInfo, MinSizeRel".into(),
                    "arch" => "  • x86, x86_64, armv7, armv8".into(),
                    _ => "  • Check documentation for supported values".into(),
                },
            ],
            Self::UnknownSettingsAxis(_) => vec![
                "Settings axes are: os, compiler, compiler.version, compiler.cppstd, build_type, arch"
                    .into(),
            ],
            Self::IncompatibleSettings { reason } => vec![
                format!("Details: {reason}"),
                "msvc requires os=Windows; apple-clang requires os=Macos".into(),
            ],
            Self::UnknownOption { name } => vec![
                format!("Remove '-o {name}=…' or use an option the recipe declares"),
                "Try: kiln inspect <RECIPE> to list declared options".into(),
            ],
            Self::InvalidOptionValue { allowed, .. } => {
                vec![format!("Allowed values: {allowed}")]
            }
            Self::MalformedAssignment(_) => vec!["Example: -s build_type=Release".into()],
            Self::ConflictingRequirement { name, .. } => vec![
                format!("Declare '{name}' exactly once"),
                "Conflicting constraints are resolved by the dependency resolver, not the recipe"
                    .into(),
            ],
            Self::OverlappingLayout { .. } => vec![
                "Use a workspace directory outside the source tree".into(),
                "Example: kiln create dawg-logger --source . --workspace ../kiln-ws".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDescriptor(_)
            | Self::MissingRequiredField { .. }
            | Self::InvalidRequirement { .. } => ErrorCategory::Validation,
            Self::IncompatibleSettings { .. }
            | Self::ConflictingRequirement { .. }
            | Self::RequirementKindOverlap { .. } => ErrorCategory::Compatibility,
            _ => ErrorCategory::Configuration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Configuration,
}

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
