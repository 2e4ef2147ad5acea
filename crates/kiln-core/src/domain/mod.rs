// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Kiln.
//!
//! Pure data and rules for recipes: what a recipe is called, which settings
//! and options it varies over, where its folders live, what it requires and
//! what it publishes to consumers. All I/O (filesystem, build tools) is
//! reached through ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or process calls
//! - **No logging**: observability belongs to the application and CLI layers
//! - **Immutable values**: Descriptor, Settings, Layout are Clone + PartialEq
//!
// Public API - what the world sees
pub mod descriptor;
pub mod error;
pub mod layout;
pub mod options;
pub mod package_id;
pub mod package_info;
pub mod requirement;
pub mod settings;

mod validation;

// Re-exports for convenience
pub use descriptor::{RecipeDescriptor, RecipeDescriptorBuilder};
pub use error::{DomainError, DomainResult, ErrorCategory};
pub use layout::{Layout, LayoutRoots, LayoutStyle};
pub use options::{OptionDecl, Options};
pub use package_id::PackageId;
pub use package_info::{CMAKE_FILE_NAME, CMAKE_TARGET_NAME, PackageInfo};
pub use requirement::{Requirement, RequirementKind, RequirementSet, VersionConstraint};
pub use settings::{Arch, BuildType, Compiler, Os, Settings, SettingsAxis};
pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use super::*;

    fn dawg() -> RecipeDescriptor {
        RecipeDescriptor::builder("dawg-logger", "1.1.0")
            .settings(SettingsAxis::ALL)
            .option(OptionDecl::boolean("shared", false).unwrap())
            .build()
            .unwrap()
    }

    // ========================================================================
    // Settings → Layout
    // ========================================================================

    #[test]
    fn profile_text_resolves_to_layout() {
        let settings = Settings::new(Os::Linux, Compiler::Gcc, BuildType::Debug, Arch::X86_64)
            .unwrap()
            .apply(["build_type=Release", "compiler.cppstd=17"])
            .unwrap();
        let options = dawg().resolve_options(["shared=True"]).unwrap();
        let roots = LayoutRoots::new("/work/dawg", "/work/.kiln");

        let layout = Layout::resolve(LayoutStyle::CMake, &dawg(), &settings, &options, &roots)
            .unwrap();

        let id = PackageId::compute(&dawg(), &settings, &options);
        assert_eq!(layout.package_folder, roots.workspace_root.join("package").join(id.as_str()));
        assert!(layout.generators_folder.starts_with(&layout.build_folder));
    }

    #[test]
    fn invalid_settings_never_reach_layout() {
        let err = Settings::new(Os::Linux, Compiler::Gcc, BuildType::Release, Arch::X86_64)
            .unwrap()
            .apply(["arch=mips"])
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    // ========================================================================
    // Error categories
    // ========================================================================

    #[test]
    fn error_categories() {
        assert_eq!(
            DomainError::InvalidDescriptor("x".into()).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            DomainError::RequirementKindOverlap { name: "x".into() }.category(),
            ErrorCategory::Compatibility
        );
        assert_eq!(
            DomainError::UnknownOption { name: "x".into() }.category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn suggestions_are_never_empty() {
        let errors = [
            DomainError::InvalidSetting {
                axis: "arch".into(),
                value: "mips".into(),
            },
            DomainError::OverlappingLayout {
                outer: "/a".into(),
                inner: "/a/b".into(),
            },
            DomainError::MissingRequiredField { field: "name" },
        ];
        for err in errors {
            assert!(!err.suggestions().is_empty(), "{err}");
        }
    }
}
