//! Configuration for a sync run

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Main sync configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directory layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Generated package settings
    #[serde(default)]
    pub package: PackageConfig,

    /// Declaration and file name patterns
    #[serde(default)]
    pub patterns: PatternConfig,

    /// Package unresolved identifiers are qualified with
    #[serde(default)]
    pub origin: OriginConfig,

    /// Self-healing settings
    #[serde(default)]
    pub repair: RepairConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            package: PackageConfig::default(),
            patterns: PatternConfig::default(),
            origin: OriginConfig::default(),
            repair: RepairConfig::default(),
        }
    }
}

/// Directory layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Checked-out upstream library
    #[serde(default = "default_upstream_dir")]
    pub upstream_dir: PathBuf,

    /// Scratch directory the package is assembled in
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Project the finished package is published to
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            upstream_dir: default_upstream_dir(),
            build_dir: default_build_dir(),
            project_dir: default_project_dir(),
        }
    }
}

/// Generated package settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Package clause written into every transformed file
    #[serde(default = "default_package_name")]
    pub name: String,

    /// Upstream file names to extract
    #[serde(default = "default_export_patterns")]
    pub export_patterns: Vec<String>,

    /// Hand-written files the package depends on, relative to the project
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// File the lookup table is written to
    #[serde(default = "default_mapping_file")]
    pub mapping_file: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: default_package_name(),
            export_patterns: default_export_patterns(),
            dependencies: Vec::new(),
            mapping_file: default_mapping_file(),
        }
    }
}

/// Declaration and file name patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(default = "default_structure_pattern")]
    pub structure: String,

    #[serde(default = "default_function_pattern")]
    pub function: String,

    /// File name prefix of extracted, not yet published files
    #[serde(default = "default_staging_prefix")]
    pub staging_prefix: String,

    #[serde(default = "default_published_prefix")]
    pub published_prefix: String,

    /// Published files owned by the sync; stale ones are deleted
    #[serde(default = "default_managed_files")]
    pub managed_files: String,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            structure: default_structure_pattern(),
            function: default_function_pattern(),
            staging_prefix: default_staging_prefix(),
            published_prefix: default_published_prefix(),
            managed_files: default_managed_files(),
        }
    }
}

/// Package unresolved identifiers are qualified with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginConfig {
    #[serde(default = "default_origin_name")]
    pub name: String,

    #[serde(default = "default_origin_path")]
    pub path: String,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            name: default_origin_name(),
            path: default_origin_path(),
        }
    }
}

/// Self-healing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairConfig {
    /// Verification rounds before giving up
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

impl PathsConfig {
    /// The build directory is removed before every run, so it must not be or
    /// contain the project or the upstream checkout.
    fn check_build_dir(&self) -> Result<()> {
        let build = normalized(&self.build_dir)?;
        for (key, dir) in [("project_dir", &self.project_dir), ("upstream_dir", &self.upstream_dir)] {
            if normalized(dir)?.starts_with(&build) {
                return Err(SyncError::config(format!(
                    "paths.build_dir {} is cleared before every run and must not contain paths.{key} {}",
                    self.build_dir.display(),
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

/// Absolute form of `path` with `.` and `..` folded lexically.
fn normalized(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .map_err(|e| SyncError::config(format!("cannot resolve {}: {e}", path.display())))?;
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

// Default value helpers
fn default_upstream_dir() -> PathBuf {
    PathBuf::from("upstream")
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build-tmp")
}

fn default_project_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_package_name() -> String {
    "aggretastic".to_string()
}

fn default_export_patterns() -> Vec<String> {
    vec![r"^search_aggs_(.*)\.go$".to_string()]
}

fn default_mapping_file() -> String {
    "generated-aggregations-mapping.go".to_string()
}

fn default_structure_pattern() -> String {
    "(.*)Aggregation$".to_string()
}

fn default_function_pattern() -> String {
    "^New(.*)Aggregation$".to_string()
}

fn default_staging_prefix() -> String {
    "search_aggs_".to_string()
}

fn default_published_prefix() -> String {
    "aggs_".to_string()
}

fn default_managed_files() -> String {
    r"^aggs_(.*)\.go$".to_string()
}

fn default_origin_name() -> String {
    "elastic".to_string()
}

fn default_origin_path() -> String {
    "github.com/olivere/elastic".to_string()
}

fn default_max_iterations() -> usize {
    256
}

impl SyncConfig {
    /// Load configuration from a TOML file, or defaults when `path` is
    /// `None` or does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.filter(|p| p.exists()) else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| SyncError::io(crate::error::IoOp::Open, path, e))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SyncError::config(e.to_string()))
    }

    /// Reject configurations a run cannot succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.package.dependencies.iter().all(|d| d.trim().is_empty()) {
            return Err(SyncError::config(
                "the generated package requires its wrapper type files; list them in package.dependencies",
            ));
        }
        if self.package.export_patterns.is_empty() {
            return Err(SyncError::config("no export patterns configured"));
        }
        self.paths.check_build_dir()?;
        if self.repair.max_iterations == 0 {
            return Err(SyncError::config("repair.max_iterations must be positive"));
        }
        for pattern in self
            .package
            .export_patterns
            .iter()
            .chain([&self.patterns.structure, &self.patterns.function, &self.patterns.managed_files])
        {
            regex::Regex::new(pattern)?;
        }
        Ok(())
    }
}
