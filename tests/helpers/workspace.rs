//! Temporary directory layouts.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `text` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, text).unwrap();
    path
}

/// Names of the regular files directly inside `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().unwrap().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// An upstream checkout and a project directory under one root.
pub struct SyncLayout {
    pub root: TempDir,
}

impl SyncLayout {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("upstream")).unwrap();
        fs::create_dir_all(root.path().join("project")).unwrap();
        Self { root }
    }

    pub fn upstream(&self) -> PathBuf {
        self.root.path().join("upstream")
    }

    pub fn build(&self) -> PathBuf {
        self.root.path().join("build-tmp")
    }

    pub fn project(&self) -> PathBuf {
        self.root.path().join("project")
    }
}
