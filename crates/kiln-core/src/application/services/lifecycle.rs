//! Lifecycle orchestrator - runs recipe hooks in their fixed order.
//!
//! ```text
//! options ─► layout ─► build_requirements ─► requirements
//!         ─► build ─► package ─► package_info
//! ```
//!
//! Each hook runs once, synchronously, inside a `stage` span. The first
//! failing hook aborts the run and its error is returned unchanged. The
//! orchestrator itself performs no I/O: the build tool and filesystem are
//! only reached from inside hooks.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, info_span, instrument};

use crate::application::{
    ports::{BuildContext, BuildTool, Filesystem},
    recipe::Recipe,
    services::{BuildExecutor, Packager},
};
use crate::domain::{
    Layout, LayoutRoots, Options, PackageId, PackageInfo, RequirementKind, RequirementSet,
    Settings,
};
use crate::error::KilnResult;

/// One recipe hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Layout,
    BuildRequirements,
    Requirements,
    Build,
    Package,
    PackageInfo,
}

impl Stage {
    /// Execution order.
    pub const ORDER: [Stage; 6] = [
        Stage::Layout,
        Stage::BuildRequirements,
        Stage::Requirements,
        Stage::Build,
        Stage::Package,
        Stage::PackageInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::BuildRequirements => "build_requirements",
            Self::Requirements => "requirements",
            Self::Build => "build",
            Self::Package => "package",
            Self::PackageInfo => "package_info",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the hooks that need no build tool: options, layout and both
/// requirement sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub reference: String,
    pub package_id: PackageId,
    pub settings: Settings,
    pub options: Options,
    pub layout: Layout,
    pub tool_requirements: RequirementSet,
    pub requirements: RequirementSet,
}

/// Everything one lifecycle run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildOutcome {
    pub reference: String,
    pub package_id: PackageId,
    pub settings: Settings,
    pub options: Options,
    pub layout: Layout,
    pub tool_requirements: RequirementSet,
    pub requirements: RequirementSet,
    pub package_info: PackageInfo,
    /// Files copied by the `package` hook.
    pub packaged_files: Vec<PathBuf>,
    /// Hooks that ran, in order.
    pub stages: Vec<Stage>,
}

/// Runs one recipe through every hook.
pub struct Lifecycle<'a> {
    tool: &'a dyn BuildTool,
    fs: &'a dyn Filesystem,
}

impl<'a> Lifecycle<'a> {
    pub fn new(tool: &'a dyn BuildTool, fs: &'a dyn Filesystem) -> Self {
        Self { tool, fs }
    }

    /// Run every hook. The recipe is consumed: one instance per build.
    pub fn run<R: Recipe>(
        &self,
        recipe: R,
        settings: Settings,
        options: &[String],
        roots: &LayoutRoots,
    ) -> KilnResult<BuildOutcome> {
        self.run_with(recipe, settings, options, roots, |_| Ok(()))
    }

    /// Like [`Self::run`], calling `on_layout` once the layout is known and
    /// before any requirement hook runs.
    #[instrument(skip_all, fields(recipe = %recipe.descriptor().reference(), settings = %settings))]
    pub fn run_with<R, F>(
        &self,
        recipe: R,
        settings: Settings,
        options: &[String],
        roots: &LayoutRoots,
        on_layout: F,
    ) -> KilnResult<BuildOutcome>
    where
        R: Recipe,
        F: FnOnce(&Layout) -> KilnResult<()>,
    {
        let mut stages = Vec::with_capacity(Stage::ORDER.len());
        let plan = plan_stages(&recipe, settings, options, roots, &mut stages, on_layout)?;

        let ctx = BuildContext {
            reference: plan.reference.clone(),
            layout: plan.layout.clone(),
            settings: plan.settings.clone(),
            options: plan.options.clone(),
            generators: recipe.descriptor().generators().to_vec(),
            tool_requirements: plan.tool_requirements.clone(),
            requirements: plan.requirements.clone(),
        };

        run_stage(Stage::Build, &mut stages, || {
            let mut executor = BuildExecutor::new(self.tool, &ctx);
            recipe.build(&mut executor)?;
            debug!(steps = ?executor.completed_steps(), "Build hook finished");
            Ok(())
        })?;

        let packaged_files = run_stage(Stage::Package, &mut stages, || {
            let mut packager = Packager::new(self.fs, &plan.layout);
            recipe.package(&mut packager)?;
            Ok(packager.into_copied())
        })?;

        let package_info = run_stage(Stage::PackageInfo, &mut stages, || {
            let mut info = PackageInfo::default();
            recipe.package_info(&mut info);
            Ok(info)
        })?;

        info!(
            package_id = %plan.package_id.short(),
            files = packaged_files.len(),
            "Lifecycle completed"
        );

        Ok(BuildOutcome {
            reference: plan.reference,
            package_id: plan.package_id,
            settings: plan.settings,
            options: plan.options,
            layout: plan.layout,
            tool_requirements: plan.tool_requirements,
            requirements: plan.requirements,
            package_info,
            packaged_files,
            stages,
        })
    }

    /// Resolve options, layout and requirements without touching any port.
    pub fn plan<R: Recipe + ?Sized>(
        recipe: &R,
        settings: Settings,
        options: &[String],
        roots: &LayoutRoots,
    ) -> KilnResult<Plan> {
        plan_stages(recipe, settings, options, roots, &mut Vec::new(), |_| Ok(()))
    }
}

fn plan_stages<R, F>(
    recipe: &R,
    settings: Settings,
    options: &[String],
    roots: &LayoutRoots,
    stages: &mut Vec<Stage>,
    on_layout: F,
) -> KilnResult<Plan>
where
    R: Recipe + ?Sized,
    F: FnOnce(&Layout) -> KilnResult<()>,
{
    let descriptor = recipe.descriptor();
    let options = descriptor.resolve_options(options)?;
    let package_id = PackageId::compute(descriptor, &settings, &options);

    let layout = run_stage(Stage::Layout, stages, || {
        recipe.layout(&settings, &options, roots)
    })?;
    on_layout(&layout)?;

    let tool_requirements = run_stage(Stage::BuildRequirements, stages, || {
        let mut set = RequirementSet::new(RequirementKind::Build);
        recipe.build_requirements(&mut set)?;
        Ok(set)
    })?;

    let requirements = run_stage(Stage::Requirements, stages, || {
        let mut set = RequirementSet::new(RequirementKind::Host);
        recipe.requirements(&mut set)?;
        Ok(set)
    })?;
    RequirementSet::ensure_disjoint(&tool_requirements, &requirements)?;

    Ok(Plan {
        reference: descriptor.reference(),
        package_id,
        settings,
        options,
        layout,
        tool_requirements,
        requirements,
    })
}

fn run_stage<T>(
    stage: Stage,
    stages: &mut Vec<Stage>,
    hook: impl FnOnce() -> KilnResult<T>,
) -> KilnResult<T> {
    let _span = info_span!("stage", name = stage.as_str()).entered();
    debug!("Entering stage");
    stages.push(stage);
    hook()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    use super::*;
    use crate::application::BuildStep;
    use crate::application::ports::MockFilesystem;
    use crate::application::services::testing::{ScriptedTool, linux_release};
    use crate::domain::{
        CMAKE_FILE_NAME, CMAKE_TARGET_NAME, DomainError, LayoutStyle, OptionDecl,
        RecipeDescriptor, SettingsAxis,
    };
    use crate::error::KilnError;

    type Journal = Rc<RefCell<Vec<&'static str>>>;

    /// Mirrors the dawg-logger recipe and journals every hook call.
    struct JournalRecipe {
        descriptor: RecipeDescriptor,
        journal: Journal,
        tool_requirement: &'static str,
    }

    impl JournalRecipe {
        fn new() -> (Self, Journal) {
            let journal = Journal::default();
            let descriptor = RecipeDescriptor::builder("dawg-logger", "1.1.0")
                .settings(SettingsAxis::ALL)
                .generators(["CMakeToolchain", "CMakeDeps"])
                .option(OptionDecl::boolean("shared", false).unwrap())
                .build()
                .unwrap();
            let recipe = Self {
                descriptor,
                journal: journal.clone(),
                tool_requirement: "cmake/3.16.9",
            };
            (recipe, journal)
        }

        fn log(&self, hook: &'static str) {
            self.journal.borrow_mut().push(hook);
        }
    }

    impl Recipe for JournalRecipe {
        fn descriptor(&self) -> &RecipeDescriptor {
            &self.descriptor
        }

        fn layout(
            &self,
            settings: &Settings,
            options: &Options,
            roots: &LayoutRoots,
        ) -> KilnResult<Layout> {
            self.log("layout");
            Ok(Layout::resolve(
                LayoutStyle::CMake,
                &self.descriptor,
                settings,
                options,
                roots,
            )?)
        }

        fn build_requirements(&self, requirements: &mut RequirementSet) -> KilnResult<()> {
            self.log("build_requirements");
            Ok(requirements.add(self.tool_requirement)?)
        }

        fn requirements(&self, requirements: &mut RequirementSet) -> KilnResult<()> {
            self.log("requirements");
            requirements.add("fmt/*")?;
            Ok(requirements.add("nlohmann_json/3.12.0")?)
        }

        fn build(&self, build: &mut BuildExecutor<'_>) -> KilnResult<()> {
            self.log("build");
            build.configure()?;
            build.build(Some("dawg-logger"))?;
            build.install()
        }

        fn package(&self, packager: &mut Packager<'_>) -> KilnResult<()> {
            self.log("package");
            packager.copy_from_source("LICENSE*", false)?;
            Ok(())
        }

        fn package_info(&self, info: &mut PackageInfo) {
            self.log("package_info");
            info.libs = vec!["dawg-logger".into()];
            info.set_property(CMAKE_FILE_NAME, "dawg-logger");
            info.set_property(CMAKE_TARGET_NAME, "DawgLog::dawg-logger");
        }
    }

    fn roots() -> LayoutRoots {
        LayoutRoots::new("/src/dawg-logger", "/var/kiln")
    }

    fn fs_with(files: &'static [&'static str]) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_list_files()
            .returning(move |_| Ok(files.iter().map(PathBuf::from).collect()));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_copy_file().returning(|_, _| Ok(()));
        fs
    }

    #[test]
    fn hooks_run_once_in_fixed_order() {
        let (recipe, journal) = JournalRecipe::new();
        let tool = ScriptedTool::default();
        let fs = fs_with(&["LICENSE", "src/logger.cpp"]);

        let outcome = Lifecycle::new(&tool, &fs)
            .run(recipe, linux_release(), &[], &roots())
            .unwrap();

        assert_eq!(
            *journal.borrow(),
            [
                "layout",
                "build_requirements",
                "requirements",
                "build",
                "package",
                "package_info"
            ]
        );
        assert_eq!(outcome.stages, Stage::ORDER);
        assert_eq!(tool.calls(), ["configure", "build:dawg-logger", "install"]);
    }

    #[test]
    fn outcome_carries_every_hook_output() {
        let (recipe, _) = JournalRecipe::new();
        let tool = ScriptedTool::default();
        let fs = fs_with(&["LICENSE"]);

        let outcome = Lifecycle::new(&tool, &fs)
            .run(recipe, linux_release(), &["shared=True".into()], &roots())
            .unwrap();

        assert_eq!(outcome.reference, "dawg-logger/1.1.0");
        assert_eq!(outcome.options.get("shared"), Some("True"));
        assert!(outcome.tool_requirements.contains("cmake"));
        assert_eq!(outcome.requirements.len(), 2);
        assert_eq!(outcome.package_info.libs, ["dawg-logger"]);
        assert_eq!(
            outcome.package_info.cmake_target_name(),
            Some("DawgLog::dawg-logger")
        );
        assert_eq!(
            outcome.packaged_files,
            [outcome.layout.package_folder.join("LICENSE")]
        );
    }

    #[test]
    fn build_failure_stops_before_install_and_package_info() {
        let (recipe, journal) = JournalRecipe::new();
        let tool = ScriptedTool::failing_at(BuildStep::Build);
        let fs = MockFilesystem::new();

        let err = Lifecycle::new(&tool, &fs)
            .run(recipe, linux_release(), &[], &roots())
            .unwrap_err();

        assert!(err.is_build_tool_error());
        assert_eq!(tool.calls(), ["configure", "build:dawg-logger"]);
        assert!(!journal.borrow().contains(&"package"));
        assert!(!journal.borrow().contains(&"package_info"));
    }

    #[test]
    fn missing_license_is_not_an_error() {
        let (recipe, _) = JournalRecipe::new();
        let tool = ScriptedTool::default();
        let mut fs = MockFilesystem::new();
        fs.expect_list_files().returning(|_| Ok(Vec::new()));
        fs.expect_copy_file().never();

        let outcome = Lifecycle::new(&tool, &fs)
            .run(recipe, linux_release(), &[], &roots())
            .unwrap();
        assert!(outcome.packaged_files.is_empty());
    }

    #[test]
    fn unknown_option_aborts_before_any_hook() {
        let (recipe, journal) = JournalRecipe::new();
        let tool = ScriptedTool::default();
        let fs = MockFilesystem::new();

        let err = Lifecycle::new(&tool, &fs)
            .run(recipe, linux_release(), &["fPIC=True".into()], &roots())
            .unwrap_err();

        assert!(matches!(
            err,
            KilnError::Domain(DomainError::UnknownOption { .. })
        ));
        assert!(journal.borrow().is_empty());
        assert!(tool.calls().is_empty());
    }

    #[test]
    fn overlapping_requirement_kinds_abort_before_build() {
        let (mut recipe, journal) = JournalRecipe::new();
        recipe.tool_requirement = "fmt/10.2.1";
        let tool = ScriptedTool::default();
        let fs = MockFilesystem::new();

        let err = Lifecycle::new(&tool, &fs)
            .run(recipe, linux_release(), &[], &roots())
            .unwrap_err();

        assert!(matches!(
            err,
            KilnError::Domain(DomainError::RequirementKindOverlap { .. })
        ));
        assert!(!journal.borrow().contains(&"build"));
        assert!(tool.calls().is_empty());
    }

    #[test]
    fn on_layout_failure_stops_the_run() {
        let (recipe, journal) = JournalRecipe::new();
        let tool = ScriptedTool::default();
        let fs = MockFilesystem::new();

        let err = Lifecycle::new(&tool, &fs)
            .run_with(recipe, linux_release(), &[], &roots(), |layout| {
                assert!(layout.build_folder.starts_with(Path::new("/var/kiln/build")));
                Err(KilnError::configuration("workspace is read-only"))
            })
            .unwrap_err();

        assert!(err.is_configuration_error());
        assert_eq!(*journal.borrow(), ["layout"]);
    }

    #[test]
    fn plan_is_stable_across_calls() {
        let (recipe, _) = JournalRecipe::new();
        let first = Lifecycle::plan(&recipe, linux_release(), &[], &roots()).unwrap();
        let second = Lifecycle::plan(&recipe, linux_release(), &[], &roots()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.requirements.iter().map(|r| r.to_string()).collect::<Vec<_>>(),
            ["fmt/*", "nlohmann_json/3.12.0"]
        );
    }

    #[test]
    fn default_hooks_use_basic_layout_and_do_nothing() {
        struct Bare(RecipeDescriptor);
        impl Recipe for Bare {
            fn descriptor(&self) -> &RecipeDescriptor {
                &self.0
            }
        }

        let recipe = Bare(RecipeDescriptor::builder("bare", "0.1.0").build().unwrap());
        let tool = ScriptedTool::default();
        let fs = MockFilesystem::new();

        let outcome = Lifecycle::new(&tool, &fs)
            .run(recipe, linux_release(), &[], &roots())
            .unwrap();

        assert_eq!(outcome.layout.build_folder, PathBuf::from("/var/kiln/build"));
        assert!(outcome.tool_requirements.is_empty());
        assert!(outcome.package_info.libs.is_empty());
        assert!(tool.calls().is_empty());
    }
}
