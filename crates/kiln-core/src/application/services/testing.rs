//! Shared doubles for service tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::{
    ApplicationError, BuildStep,
    ports::{BuildContext, BuildTool, Filesystem},
};
use crate::domain::{
    Arch, BuildType, Compiler, Layout, LayoutRoots, LayoutStyle, Options, Os, RecipeDescriptor,
    RequirementKind, RequirementSet, Settings,
};
use crate::error::KilnResult;

/// Build tool that records calls and can fail at one step.
#[derive(Default)]
pub struct ScriptedTool {
    calls: Mutex<Vec<String>>,
    fail_at: Option<BuildStep>,
}

impl ScriptedTool {
    pub fn failing_at(step: BuildStep) -> Self {
        Self {
            calls: Mutex::default(),
            fail_at: Some(step),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, step: BuildStep, call: String) -> KilnResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_at == Some(step) {
            return Err(ApplicationError::BuildToolFailed {
                step,
                reason: "scripted failure".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl BuildTool for ScriptedTool {
    fn configure(&self, _ctx: &BuildContext) -> KilnResult<()> {
        self.record(BuildStep::Configure, "configure".into())
    }

    fn build(&self, _ctx: &BuildContext, target: Option<&str>) -> KilnResult<()> {
        let call = match target {
            Some(t) => format!("build:{t}"),
            None => "build".into(),
        };
        self.record(BuildStep::Build, call)
    }

    fn install(&self, _ctx: &BuildContext) -> KilnResult<()> {
        self.record(BuildStep::Install, "install".into())
    }
}

pub fn linux_release() -> Settings {
    Settings::new(Os::Linux, Compiler::Gcc, BuildType::Release, Arch::X86_64).unwrap()
}

pub fn build_context() -> BuildContext {
    let descriptor = RecipeDescriptor::builder("dawg-logger", "1.1.0")
        .build()
        .unwrap();
    let roots = LayoutRoots::new("/src/dawg-logger", "/var/kiln");
    let layout = Layout::resolve(
        LayoutStyle::CMake,
        &descriptor,
        &linux_release(),
        &Options::default(),
        &roots,
    )
    .unwrap();

    BuildContext {
        reference: descriptor.reference(),
        layout,
        settings: linux_release(),
        options: Options::default(),
        generators: vec!["CMakeToolchain".into(), "CMakeDeps".into()],
        tool_requirements: RequirementSet::new(RequirementKind::Build),
        requirements: RequirementSet::new(RequirementKind::Host),
    }
}

/// Filesystem double holding files in memory.
#[derive(Default)]
pub struct MemFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    removed: Mutex<Vec<PathBuf>>,
}

impl MemFs {
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let fs = Self::default();
        for (path, content) in files {
            fs.files
                .lock()
                .unwrap()
                .insert(path.into(), (*content).to_string());
        }
        fs
    }

    pub fn read(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn removed(&self) -> Vec<PathBuf> {
        self.removed.lock().unwrap().clone()
    }
}

impl Filesystem for MemFs {
    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        self.dirs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> KilnResult<()> {
        let content = self.read(from).ok_or_else(|| ApplicationError::FilesystemError {
            path: from.to_path_buf(),
            reason: "no such file".into(),
        })?;
        self.write_file(to, &content)
    }

    fn list_files(&self, root: &Path) -> KilnResult<Vec<PathBuf>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter_map(|p| p.strip_prefix(root).ok().map(|r| r.to_path_buf()))
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path)
            || self.files.lock().unwrap().keys().any(|p| p.starts_with(path))
    }

    fn remove_dir_all(&self, path: &Path) -> KilnResult<()> {
        self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
        self.dirs.lock().unwrap().retain(|p| !p.starts_with(path));
        self.removed.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}
