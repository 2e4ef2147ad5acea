//! `kiln_toolchain.cmake` rendering for the `CMakeToolchain` generator.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use kiln_core::application::ports::BuildContext;
use kiln_core::domain::{Arch, Compiler, Os};

/// Name of the generator that asks for a toolchain file.
pub const TOOLCHAIN_GENERATOR: &str = "CMakeToolchain";
/// Name of the generator that puts the generators folder on the prefix path.
pub const DEPS_GENERATOR: &str = "CMakeDeps";
/// File written into the generators folder.
pub const TOOLCHAIN_FILE: &str = "kiln_toolchain.cmake";

pub fn toolchain_path(ctx: &BuildContext) -> PathBuf {
    ctx.layout.generators_folder.join(TOOLCHAIN_FILE)
}

/// Render the toolchain file for `ctx`.
///
/// Output depends only on `ctx`, so re-running configure with the same
/// context rewrites an identical file.
pub fn render(ctx: &BuildContext) -> String {
    let mut out = String::new();
    let settings = &ctx.settings;

    // `write!` to a String cannot fail.
    let _ = writeln!(out, "# Generated by kiln for {}", ctx.reference);
    let _ = writeln!(out, "# {settings}");
    out.push('\n');

    if !settings.compiler.is_multi_config() {
        let _ = writeln!(
            out,
            "set(CMAKE_BUILD_TYPE \"{}\" CACHE STRING \"\" FORCE)",
            settings.build_type
        );
    }

    let (cc, cxx) = compiler_programs(settings.compiler);
    let _ = writeln!(out, "set(CMAKE_C_COMPILER {cc})");
    let _ = writeln!(out, "set(CMAKE_CXX_COMPILER {cxx})");

    if let Some(cppstd) = &settings.cppstd {
        let (extensions, level) = match cppstd.strip_prefix("gnu") {
            Some(level) => ("ON", level),
            None => ("OFF", cppstd.as_str()),
        };
        let _ = writeln!(out, "set(CMAKE_CXX_STANDARD {level})");
        let _ = writeln!(out, "set(CMAKE_CXX_EXTENSIONS {extensions})");
        out.push_str("set(CMAKE_CXX_STANDARD_REQUIRED ON)\n");
    }

    if let Some(shared) = ctx.options.get_bool("shared") {
        let _ = writeln!(
            out,
            "set(BUILD_SHARED_LIBS {} CACHE BOOL \"\" FORCE)",
            on_off(shared)
        );
    }
    if let Some(pic) = ctx.options.get_bool("fPIC") {
        let _ = writeln!(out, "set(CMAKE_POSITION_INDEPENDENT_CODE {})", on_off(pic));
    }

    if let Some(arch) = osx_architecture(settings.os, settings.arch) {
        let _ = writeln!(out, "set(CMAKE_OSX_ARCHITECTURES {arch} CACHE STRING \"\" FORCE)");
    }

    if ctx.has_generator(DEPS_GENERATOR) {
        let _ = writeln!(
            out,
            "list(PREPEND CMAKE_PREFIX_PATH \"{}\")",
            cmake_path(&ctx.layout.generators_folder)
        );
    }

    out
}

pub(crate) fn on_off(value: bool) -> &'static str {
    if value { "ON" } else { "OFF" }
}

/// CMake accepts forward slashes on every platform.
pub(crate) fn cmake_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

fn compiler_programs(compiler: Compiler) -> (&'static str, &'static str) {
    match compiler {
        Compiler::Gcc => ("gcc", "g++"),
        Compiler::Clang | Compiler::AppleClang => ("clang", "clang++"),
        Compiler::Msvc => ("cl", "cl"),
    }
}

fn osx_architecture(os: Os, arch: Arch) -> Option<&'static str> {
    match (os, arch) {
        (Os::Macos, Arch::Armv8) => Some("arm64"),
        (Os::Macos, Arch::X86_64) => Some("x86_64"),
        _ => None,
    }
}
