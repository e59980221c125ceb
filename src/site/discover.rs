// src/site/discover.rs
// =============================================================================
// This module finds files in a build directory.
//
// How it works:
// 1. Walk the directory recursively with `walkdir`
// 2. Keep regular files only
// 3. Filter by extension / ignore list
// 4. Normalize separators to '/' and sort, so output is the same on every OS
// =============================================================================

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use super::error::SiteError;

/// Extension used when the caller doesn't pass one.
pub const DEFAULT_EXTENSION: &str = ".html";

/// Extensions picked up by [`get_generate_files`].
const GENERATE_EXTENSIONS: [&str; 2] = ["md", "html"];

/// Every regular file under `dir`.
pub fn get_all_files(dir: &Path) -> Result<Vec<PathBuf>, SiteError> {
    walk(dir, |_| true)
}

/// Files under `dir` with extension `ext` (default `.html`) whose file name
/// is not listed in `ignore`.
///
/// The extension may be given with or without its leading dot.
pub fn get_files(dir: &Path, ext: Option<&str>, ignore: &[String]) -> Result<Vec<PathBuf>, SiteError> {
    let wanted = ext.unwrap_or(DEFAULT_EXTENSION).trim_start_matches('.');

    walk(dir, |path| {
        let ext_matches = path.extension().is_some_and(|e| e == wanted);
        let ignored = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| ignore.iter().any(|i| i == name));
        ext_matches && !ignored
    })
}

/// Source files the generator consumes: markdown and HTML.
pub fn get_generate_files(dir: &Path) -> Result<Vec<PathBuf>, SiteError> {
    walk(dir, |path| {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| GENERATE_EXTENSIONS.contains(&e))
    })
}

pub fn is_file(path: &Path) -> bool {
    path.is_file()
}

/// Creates `path` (and its parent directories) if it doesn't exist.
/// An existing file is left untouched.
pub fn touch(path: &Path) -> Result<(), SiteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SiteError::Io(parent.to_path_buf(), e))?;
    }

    if !is_file(path) {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SiteError::Io(path.to_path_buf(), e))?;
        debug!(path = %path.display(), "created file");
    }

    Ok(())
}

fn walk<F>(dir: &Path, keep: F) -> Result<Vec<PathBuf>, SiteError>
where
    F: Fn(&Path) -> bool,
{
    let mut files = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| SiteError::Walk(dir.to_path_buf(), e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if keep(entry.path()) {
            files.push(normalize(entry.path()));
        }
    }

    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "discovered files");
    Ok(files)
}

// Forward slashes everywhere, so paths compare equal across platforms
fn normalize(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().replace('\\', "/"))
}
