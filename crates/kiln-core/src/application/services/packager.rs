//! Packager - copies auxiliary files into the package folder.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, instrument};

use crate::application::ports::Filesystem;
use crate::domain::Layout;
use crate::error::{KilnError, KilnResult};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Copy files under `src` whose path relative to `src` matches `pattern`
/// into `dst`.
///
/// `*` does not cross `/`, so `LICENSE*` only matches files directly in
/// `src`. With `keep_path` the relative path is reproduced under `dst`;
/// without it every match lands directly in `dst`, and two matches sharing a
/// file name are rejected before anything is copied. No match yields an
/// empty list.
///
/// Returns the destination paths, in source order.
#[instrument(skip_all, fields(pattern = %pattern, src = %src.display(), dst = %dst.display(), keep_path = keep_path))]
pub fn copy_files(
    fs: &dyn Filesystem,
    pattern: &str,
    src: &Path,
    dst: &Path,
    keep_path: bool,
) -> KilnResult<Vec<PathBuf>> {
    let compiled = Pattern::new(pattern)
        .map_err(|e| KilnError::configuration(format!("invalid copy pattern '{pattern}': {e}")))?;

    let mut planned: Vec<(PathBuf, PathBuf)> = Vec::new();
    for relative in fs.list_files(src)? {
        if !compiled.matches_with(&slash_path(&relative), MATCH_OPTIONS) {
            continue;
        }
        let target = if keep_path {
            dst.join(&relative)
        } else {
            match relative.file_name() {
                Some(name) => dst.join(name),
                None => continue,
            }
        };
        if let Some((earlier, _)) = planned.iter().find(|(_, t)| *t == target) {
            return Err(KilnError::configuration(format!(
                "copy pattern '{pattern}' maps both '{}' and '{}' to '{}'; use keep_path or a narrower pattern",
                earlier.display(),
                relative.display(),
                target.display()
            )));
        }
        planned.push((relative, target));
    }

    let mut copied = Vec::with_capacity(planned.len());
    for (relative, target) in planned {
        if let Some(parent) = target.parent() {
            fs.create_dir_all(parent)?;
        }
        fs.copy_file(&src.join(&relative), &target)?;
        debug!(from = %relative.display(), to = %target.display(), "Copied");
        copied.push(target);
    }

    Ok(copied)
}

/// Forward-slash form of a relative path, so patterns are portable.
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// What the `package` hook sees: the layout and a filesystem to copy with.
///
/// It holds no build tool.
pub struct Packager<'a> {
    fs: &'a dyn Filesystem,
    layout: &'a Layout,
    copied: Vec<PathBuf>,
}

impl<'a> Packager<'a> {
    pub fn new(fs: &'a dyn Filesystem, layout: &'a Layout) -> Self {
        Self {
            fs,
            layout,
            copied: Vec::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        self.layout
    }

    /// Copy matches of `pattern` from the source folder into the package
    /// folder. Returns how many files were copied.
    pub fn copy_from_source(&mut self, pattern: &str, keep_path: bool) -> KilnResult<usize> {
        let files = copy_files(
            self.fs,
            pattern,
            &self.layout.source_folder,
            &self.layout.package_folder,
            keep_path,
        )?;
        let count = files.len();
        self.record(files);
        Ok(count)
    }

    /// Same as [`Self::copy_from_source`] but relative to the build folder.
    pub fn copy_from_build(&mut self, pattern: &str, keep_path: bool) -> KilnResult<usize> {
        let files = copy_files(
            self.fs,
            pattern,
            &self.layout.build_folder,
            &self.layout.package_folder,
            keep_path,
        )?;
        let count = files.len();
        self.record(files);
        Ok(count)
    }

    /// A destination written by an earlier copy is listed once.
    fn record(&mut self, files: Vec<PathBuf>) {
        for file in files {
            if !self.copied.contains(&file) {
                self.copied.push(file);
            }
        }
    }

    pub fn into_copied(self) -> Vec<PathBuf> {
        self.copied
    }
}
