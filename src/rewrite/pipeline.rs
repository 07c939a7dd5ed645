//! Per-file transformation.

use super::record::SyncRecord;
use super::strategy::Strategy;
use crate::config::SyncConfig;
use crate::error::{IoOp, Result, SyncError};
use crate::model::{PatternLocator, SourceUnit};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Moves one extracted file into the generated package.
///
/// ```text
/// Parsed → NamespaceRenamed → StructureFound → StrategyApplied
///        → FunctionFound → FunctionRewritten → Saved
/// ```
///
/// A file without a matching structure or constructor is still renamed and
/// saved; it just yields no [`SyncRecord`].
#[derive(Debug, Clone)]
pub struct FileTransformPipeline {
    package_name: String,
    structures: PatternLocator,
    functions: PatternLocator,
    staging_prefix: String,
    published_prefix: String,
}

impl FileTransformPipeline {
    pub fn new(package_name: &str, structure_pattern: &str, function_pattern: &str) -> Result<Self> {
        Ok(Self {
            package_name: package_name.to_string(),
            structures: PatternLocator::new(structure_pattern)?,
            functions: PatternLocator::new(function_pattern)?,
            staging_prefix: String::new(),
            published_prefix: String::new(),
        })
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Ok(Self::new(
            &config.package.name,
            &config.patterns.structure,
            &config.patterns.function,
        )?
        .with_staging(&config.patterns.staging_prefix, &config.patterns.published_prefix))
    }

    /// Rename files starting with `staging` to start with `published` on save.
    pub fn with_staging(mut self, staging: &str, published: &str) -> Self {
        self.staging_prefix = staging.to_string();
        self.published_prefix = published.to_string();
        self
    }

    /// Apply every in-memory step to `unit`.
    pub fn transform(&self, unit: &mut SourceUnit) -> Result<Option<SyncRecord>> {
        unit.rename_package(&self.package_name);

        let Some(mut structure) = unit.find_structure(&self.structures) else {
            debug!(path = %unit.path().display(), "no structure matches {}", self.structures.pattern());
            return Ok(None);
        };
        let strategy = Strategy::select(&structure);
        strategy.enrich_structure(&mut structure)?;
        debug!(structure = structure.name(), %strategy, "structure enriched");

        let Some(mut function) = unit.find_function(&self.functions) else {
            debug!(path = %unit.path().display(), "no constructor matches {}", self.functions.pattern());
            return Ok(None);
        };
        strategy.rewrite_constructor(&mut function)?;
        debug!(function = function.name(), "constructor rewritten");

        Ok(Some(SyncRecord::new(strategy, function.name())))
    }

    /// Open, transform and save the file at `path`. A staged file is saved
    /// under its published name and the staged copy removed.
    pub fn run(&self, path: &Path) -> Result<Option<SyncRecord>> {
        let mut unit = SourceUnit::open(path)?;
        let record = self.transform(&mut unit)?;

        let target = self.published_path(path);
        unit.save_to(&target)?;
        if target != path {
            std::fs::remove_file(path).map_err(|e| SyncError::io(IoOp::Remove, path, e))?;
            debug!(from = %path.display(), to = %target.display(), "published");
        }
        if record.is_none() {
            warn!(path = %target.display(), "saved without structural changes");
        }
        Ok(record)
    }

    /// Where `path` is saved: its file name with the staging prefix replaced.
    pub fn published_path(&self, path: &Path) -> PathBuf {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return path.to_path_buf();
        };
        match name.strip_prefix(self.staging_prefix.as_str()) {
            Some(rest) if !self.staging_prefix.is_empty() => {
                path.with_file_name(format!("{}{rest}", self.published_prefix))
            }
            _ => path.to_path_buf(),
        }
    }
}
