//! Filesystem operations on the upstream, build and project directories.
//!
//! Every listing is flat: only regular files directly inside a directory
//! are considered.

use crate::error::{IoOp, Result, SyncError};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Go source extension, without the dot.
const SOURCE_EXTENSION: &str = "go";

/// Regular files directly inside `dir`, sorted by name.
fn files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            SyncError::io(IoOp::ReadDirectory, path, e.into())
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|name| name.to_str()).unwrap_or_default()
}

fn copy(from: &Path, to: &Path) -> Result<()> {
    std::fs::copy(from, to).map_err(|e| SyncError::io(IoOp::Copy, from, e))?;
    Ok(())
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| SyncError::io(IoOp::CreateDirectory, dir, e))
}

/// Go sources directly inside `dir`, sorted by path.
pub fn list_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(files_in(dir)?
        .into_iter()
        .filter(|path| path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION))
        .collect())
}

/// Files directly inside `dir` whose name matches `pattern`.
pub fn list_matching(dir: &Path, pattern: &Regex) -> Result<Vec<PathBuf>> {
    Ok(files_in(dir)?
        .into_iter()
        .filter(|path| pattern.is_match(file_name(path)))
        .collect())
}

/// Copy the files in `from` whose name matches `pattern` into `to`, creating
/// `to` first. Returns the copied destinations.
pub fn extract_files(pattern: &str, from: &Path, to: &Path) -> Result<Vec<PathBuf>> {
    let pattern = Regex::new(pattern)?;
    create_dir(to)?;

    let mut copied = Vec::new();
    for source in list_matching(from, &pattern)? {
        let target = to.join(file_name(&source));
        copy(&source, &target)?;
        copied.push(target);
    }
    tracing::debug!(
        from = %from.display(),
        to = %to.display(),
        files = copied.len(),
        "extracted {pattern}"
    );
    Ok(copied)
}

/// Copy each of `files`, relative to `from`, into `to` under its file name.
pub fn copy_dependencies(files: &[String], from: &Path, to: &Path) -> Result<Vec<PathBuf>> {
    create_dir(to)?;
    files
        .iter()
        .map(|file| {
            let source = from.join(file);
            let target = to.join(file_name(&source));
            copy(&source, &target)?;
            Ok(target)
        })
        .collect()
}

/// Copy every build artifact into `project` and delete the previously
/// published files the build no longer produces.
///
/// `managed` selects the published files in `project`. Returns the deleted
/// paths.
pub fn promote_build(build: &Path, project: &Path, managed: &Regex) -> Result<Vec<PathBuf>> {
    let published = list_matching(project, managed)?;
    let built = files_in(build)?;
    let built_names: Vec<&str> = built.iter().map(|path| file_name(path)).collect();

    let deprecated: Vec<PathBuf> = published
        .into_iter()
        .filter(|path| !built_names.contains(&file_name(path)))
        .collect();

    create_dir(project)?;
    for artifact in &built {
        copy(artifact, &project.join(file_name(artifact)))?;
    }
    for path in &deprecated {
        std::fs::remove_file(path).map_err(|e| SyncError::io(IoOp::Remove, path, e))?;
        tracing::info!(path = %path.display(), "removed deprecated file");
    }
    Ok(deprecated)
}
