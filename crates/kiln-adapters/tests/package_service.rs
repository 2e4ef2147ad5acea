//! End-to-end package creation against the real filesystem.

use std::path::Path;

use kiln_adapters::{DawgLoggerRecipe, DeclarativeRecipe, LocalFilesystem, RecordingBuildTool};
use kiln_core::application::{BuildStep, MANIFEST_FILE, PackageManifest, PackageService};
use kiln_core::domain::{Arch, BuildType, Compiler, LayoutRoots, Os, Settings};
use tempfile::TempDir;

fn settings() -> Settings {
    Settings::new(Os::Linux, Compiler::Gcc, BuildType::Release, Arch::X86_64).unwrap()
}

fn sandbox() -> (TempDir, LayoutRoots) {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("dawg-logger");
    std::fs::create_dir_all(source.join("include")).unwrap();
    std::fs::write(source.join("LICENSE"), "MIT License").unwrap();
    std::fs::write(source.join("include/logger.hpp"), "#pragma once").unwrap();
    let roots = LayoutRoots::new(source, dir.path().join("workspace"));
    (dir, roots)
}

fn service(tool: &RecordingBuildTool) -> PackageService {
    PackageService::new(Box::new(tool.clone()), Box::new(LocalFilesystem::new()))
}

fn read_manifest(package_folder: &Path) -> PackageManifest {
    let raw = std::fs::read_to_string(package_folder.join(MANIFEST_FILE)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn create_publishes_manifest_and_license() {
    let (_dir, roots) = sandbox();
    let tool = RecordingBuildTool::new();

    let outcome = service(&tool)
        .create(DawgLoggerRecipe::new().unwrap(), settings(), &[], &roots)
        .unwrap();

    let package = &outcome.layout.package_folder;
    assert!(outcome.layout.build_folder.is_dir());
    assert!(outcome.layout.generators_folder.is_dir());
    assert_eq!(
        std::fs::read_to_string(package.join("LICENSE")).unwrap(),
        "MIT License"
    );

    let manifest = read_manifest(package);
    assert_eq!(manifest.reference, "dawg-logger/1.1.0");
    assert_eq!(manifest.package_id, outcome.package_id.to_string());
    assert_eq!(manifest.tool_requirements, ["cmake/3.16.9"]);
    assert_eq!(manifest.requirements, ["fmt/*", "nlohmann_json/3.12.0"]);
    assert_eq!(manifest.files, [Path::new("LICENSE")]);
    assert_eq!(manifest.package_info.libs, ["dawg-logger"]);
}

#[test]
fn failed_build_leaves_no_package_folder() {
    let (_dir, roots) = sandbox();
    let tool = RecordingBuildTool::failing_at(BuildStep::Build);

    let err = service(&tool)
        .create(DawgLoggerRecipe::new().unwrap(), settings(), &[], &roots)
        .unwrap_err();

    assert!(err.is_build_tool_error());
    let packages = roots.workspace_root.join("package");
    let leftover = std::fs::read_dir(&packages)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftover, 0);
}

#[test]
fn rerun_replaces_stale_package() {
    let (_dir, roots) = sandbox();
    let tool = RecordingBuildTool::new();
    let svc = service(&tool);

    let first = svc
        .create(DawgLoggerRecipe::new().unwrap(), settings(), &[], &roots)
        .unwrap();
    let stale = first.layout.package_folder.join("stale.txt");
    std::fs::write(&stale, "old").unwrap();

    let second = svc
        .create(DawgLoggerRecipe::new().unwrap(), settings(), &[], &roots)
        .unwrap();

    assert_eq!(first.package_id, second.package_id);
    assert!(!stale.exists());
    assert!(second.layout.package_folder.join(MANIFEST_FILE).exists());
}

#[test]
fn declarative_recipe_keeps_relative_paths() {
    let (dir, roots) = sandbox();
    let recipe_path = dir.path().join("recipe.toml");
    std::fs::write(
        &recipe_path,
        r#"
[recipe]
name = "logger-headers"
version = "0.1.0"

[[package.copy]]
pattern = "include/*.hpp"
from = "source"
keep_path = true
"#,
    )
    .unwrap();

    let recipe = DeclarativeRecipe::load(&recipe_path).unwrap();
    let outcome = service(&RecordingBuildTool::new())
        .create(recipe, settings(), &[], &roots)
        .unwrap();

    let header = outcome.layout.package_folder.join("include/logger.hpp");
    assert!(header.is_file());
    assert_eq!(
        read_manifest(&outcome.layout.package_folder).files,
        [Path::new("include/logger.hpp")]
    );
}
