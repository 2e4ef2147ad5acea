//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::WalkDir;

use kiln_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{KilnError, KilnResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> KilnResult<()> {
        trace!(from = %from.display(), to = %to.display(), "copy");
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn list_files(&self, root: &Path) -> KilnResult<Vec<PathBuf>> {
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                map_io_error(&path, e.into(), "walk directory")
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(root) {
                files.push(relative.to_path_buf());
            }
        }
        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> KilnResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KilnError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("include/dawg")).unwrap();
        std::fs::write(dir.path().join("LICENSE"), "MIT").unwrap();
        std::fs::write(dir.path().join("include/dawg/logger.hpp"), "#pragma once").unwrap();
        dir
    }

    #[test]
    fn lists_files_relative_and_sorted() {
        let dir = tree();
        let files = LocalFilesystem::new().list_files(dir.path()).unwrap();
        assert_eq!(
            files,
            [
                PathBuf::from("LICENSE"),
                PathBuf::from("include").join("dawg").join("logger.hpp"),
            ]
        );
    }

    #[test]
    fn missing_root_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let files = LocalFilesystem::new()
            .list_files(&dir.path().join("nope"))
            .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn copies_and_removes() {
        let dir = tree();
        let fs = LocalFilesystem::new();
        let pkg = dir.path().join("pkg");

        fs.create_dir_all(&pkg).unwrap();
        fs.copy_file(&dir.path().join("LICENSE"), &pkg.join("LICENSE"))
            .unwrap();
        assert_eq!(std::fs::read_to_string(pkg.join("LICENSE")).unwrap(), "MIT");

        fs.remove_dir_all(&pkg).unwrap();
        assert!(!fs.exists(&pkg));
    }

    #[test]
    fn io_failures_become_filesystem_errors() {
        let dir = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .copy_file(&dir.path().join("missing"), &dir.path().join("out"))
            .unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
