//! Built-in recipe for the dawg-logger C++ logging library.

use kiln_core::{
    application::{BuildExecutor, Packager, Recipe},
    domain::{
        CMAKE_FILE_NAME, CMAKE_TARGET_NAME, DomainResult, Layout, LayoutRoots, LayoutStyle,
        OptionDecl, Options, PackageInfo, RecipeDescriptor, RequirementSet, Settings,
        SettingsAxis,
    },
    error::KilnResult,
};

pub const NAME: &str = "dawg-logger";
pub const VERSION: &str = "1.1.0";

/// The single library target the CMake project defines.
const LIBRARY_TARGET: &str = "dawg-logger";

pub struct DawgLoggerRecipe {
    descriptor: RecipeDescriptor,
}

impl DawgLoggerRecipe {
    pub fn new() -> DomainResult<Self> {
        let descriptor = RecipeDescriptor::builder(NAME, VERSION)
            .author("eyaljoseph")
            .url("https://github.com/eyaljoseph/dawg-logger")
            .description("A lightweight and flexible C++ logging library")
            .topics(["logging", "logger", "file sink"])
            .settings(SettingsAxis::ALL)
            .exports_sources([
                "CMakeLists.txt",
                "src/*",
                "include/*",
                "README.md",
                "recipe.toml",
            ])
            .generators(["CMakeToolchain", "CMakeDeps"])
            .option(OptionDecl::boolean("shared", false)?)
            .build()?;
        Ok(Self { descriptor })
    }
}

impl Recipe for DawgLoggerRecipe {
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
            LayoutStyle::CMake,
            &self.descriptor,
            settings,
            options,
            roots,
        )?)
    }

    fn build_requirements(&self, requirements: &mut RequirementSet) -> KilnResult<()> {
        requirements.add("cmake/3.16.9")?;
        Ok(())
    }

    fn requirements(&self, requirements: &mut RequirementSet) -> KilnResult<()> {
        requirements.add("fmt/*")?;
        requirements.add("nlohmann_json/3.12.0")?;
        Ok(())
    }

    fn build(&self, build: &mut BuildExecutor<'_>) -> KilnResult<()> {
        build.configure()?;
        build.build(Some(LIBRARY_TARGET))?;
        // install places artifacts into the package folder
        build.install()
    }

    fn package(&self, packager: &mut Packager<'_>) -> KilnResult<()> {
        packager.copy_from_source("LICENSE*", false)?;
        Ok(())
    }

    fn package_info(&self, info: &mut PackageInfo) {
        info.libs = vec![LIBRARY_TARGET.into()];
        info.set_property(CMAKE_FILE_NAME, "dawg-logger");
        info.set_property(CMAKE_TARGET_NAME, "DawgLog::dawg-logger");
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::build_tool::{RecordedCall, RecordingBuildTool};
    use crate::filesystem::MemoryFilesystem;
    use kiln_core::application::{BuildStep, Lifecycle, ports::Filesystem};
    use kiln_core::domain::{Arch, BuildType, Compiler, Os, RequirementKind};

    fn settings() -> Settings {
        Settings::new(Os::Linux, Compiler::Gcc, BuildType::Release, Arch::X86_64).unwrap()
    }

    fn roots() -> LayoutRoots {
        LayoutRoots::new("/src/dawg-logger", "/var/kiln")
    }

    fn recipe() -> DawgLoggerRecipe {
        DawgLoggerRecipe::new().unwrap()
    }

    #[test]
    fn descriptor_matches_upstream_metadata() {
        let r = recipe();
        let d = r.descriptor();
        assert_eq!(d.reference(), "dawg-logger/1.1.0");
        assert_eq!(d.author(), Some("eyaljoseph"));
        assert_eq!(d.settings(), SettingsAxis::ALL);
        assert_eq!(d.generators(), ["CMakeToolchain", "CMakeDeps"]);
        assert!(d.topics().contains("file sink"));
    }

    #[test]
    fn layout_is_cmake_style() {
        let layout = recipe()
            .layout(&settings(), &Options::default(), &roots())
            .unwrap();
        assert_eq!(layout.source_folder, PathBuf::from("/src/dawg-logger"));
        assert_eq!(layout.build_folder, PathBuf::from("/var/kiln/build/release"));
        assert_eq!(
            layout.generators_folder,
            PathBuf::from("/var/kiln/build/release/generators")
        );
    }

    #[test]
    fn requirements_are_stable_and_disjoint() {
        let r = recipe();
        let declare = || {
            let mut tools = RequirementSet::new(RequirementKind::Build);
            let mut host = RequirementSet::new(RequirementKind::Host);
            r.build_requirements(&mut tools).unwrap();
            r.requirements(&mut host).unwrap();
            (tools, host)
        };

        let (tools, host) = declare();
        assert_eq!(declare(), (tools.clone(), host.clone()));
        assert!(RequirementSet::ensure_disjoint(&tools, &host).is_ok());
        assert_eq!(
            tools.iter().map(ToString::to_string).collect::<Vec<_>>(),
            ["cmake/3.16.9"]
        );
        assert_eq!(
            host.iter().map(ToString::to_string).collect::<Vec<_>>(),
            ["fmt/*", "nlohmann_json/3.12.0"]
        );
    }

    #[test]
    fn full_run_calls_tool_in_order() {
        let tool = RecordingBuildTool::new();
        let fs = MemoryFilesystem::new().with_file("/src/dawg-logger/LICENSE", "MIT");

        let outcome = Lifecycle::new(&tool, &fs)
            .run(recipe(), settings(), &[], &roots())
            .unwrap();

        assert_eq!(
            tool.calls(),
            [
                RecordedCall::configure(),
                RecordedCall::build(Some("dawg-logger")),
                RecordedCall::install(),
            ]
        );
        assert!(fs.exists(&outcome.layout.package_folder.join("LICENSE")));
    }

    #[test]
    fn package_hook_never_touches_the_tool() {
        let tool = RecordingBuildTool::new();
        let fs = MemoryFilesystem::new().with_file("/src/dawg-logger/LICENSE.txt", "MIT");
        let layout = recipe()
            .layout(&settings(), &Options::default(), &roots())
            .unwrap();

        let mut packager = Packager::new(&fs, &layout);
        recipe().package(&mut packager).unwrap();

        assert!(tool.calls().is_empty());
        assert_eq!(
            packager.into_copied(),
            [layout.package_folder.join("LICENSE.txt")]
        );
    }

    #[test]
    fn vendored_licenses_do_not_replace_the_library_license() {
        let tool = RecordingBuildTool::new();
        let fs = MemoryFilesystem::new()
            .with_file("/src/dawg-logger/LICENSE", "MIT dawg-logger")
            .with_file("/src/dawg-logger/third_party/fmt/LICENSE.rst", "fmt license")
            .with_file("/src/dawg-logger/vendor/json/LICENSE", "nlohmann license");

        let outcome = Lifecycle::new(&tool, &fs)
            .run(recipe(), settings(), &[], &roots())
            .unwrap();

        let license = outcome.layout.package_folder.join("LICENSE");
        assert_eq!(outcome.packaged_files, [license.clone()]);
        assert_eq!(fs.read_file(&license).as_deref(), Some("MIT dawg-logger"));
        assert!(!fs.exists(&outcome.layout.package_folder.join("LICENSE.rst")));
    }

    #[test]
    fn repeated_copy_lists_destination_once() {
        let fs = MemoryFilesystem::new().with_file("/src/dawg-logger/LICENSE", "MIT");
        let layout = recipe()
            .layout(&settings(), &Options::default(), &roots())
            .unwrap();

        let mut packager = Packager::new(&fs, &layout);
        assert_eq!(packager.copy_from_source("LICENSE*", false).unwrap(), 1);
        assert_eq!(packager.copy_from_source("LICENSE", false).unwrap(), 1);
        assert_eq!(
            packager.into_copied(),
            [layout.package_folder.join("LICENSE")]
        );
    }

    #[test]
    fn missing_license_packages_nothing() {
        let tool = RecordingBuildTool::new();
        let fs = MemoryFilesystem::new().with_file("/src/dawg-logger/README.md", "");

        let outcome = Lifecycle::new(&tool, &fs)
            .run(recipe(), settings(), &[], &roots())
            .unwrap();

        assert!(outcome.packaged_files.is_empty());
        assert!(!fs.exists(&outcome.layout.package_folder.join("LICENSE")));
    }

    #[test]
    fn failed_build_skips_install_and_package_info() {
        let tool = RecordingBuildTool::failing_at(BuildStep::Build);
        let fs = MemoryFilesystem::new();

        let err = Lifecycle::new(&tool, &fs)
            .run(recipe(), settings(), &[], &roots())
            .unwrap_err();

        assert!(err.is_build_tool_error());
        assert_eq!(
            tool.calls(),
            [
                RecordedCall::configure(),
                RecordedCall::build(Some("dawg-logger")),
            ]
        );
        assert!(!fs.exists(Path::new("/var/kiln/package")));
    }

    #[test]
    fn package_info_is_independent_of_settings() {
        let mut release = PackageInfo::default();
        recipe().package_info(&mut release);

        assert_eq!(release.libs, ["dawg-logger"]);
        assert_eq!(release.cmake_file_name(), Some("dawg-logger"));
        assert_eq!(release.cmake_target_name(), Some("DawgLog::dawg-logger"));

        let tool = RecordingBuildTool::new();
        let fs = MemoryFilesystem::new();
        let debug = settings().apply(["build_type=Debug"]).unwrap();
        let outcome = Lifecycle::new(&tool, &fs)
            .run(recipe(), debug, &["shared=True".into()], &roots())
            .unwrap();
        assert_eq!(outcome.package_info, release);
    }
}
