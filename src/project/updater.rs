//! The full sync run over one checked-out upstream.

use super::emit::{CodeEmitter, LookupTableEmitter};
use super::workspace::{copy_dependencies, extract_files, list_sources, promote_build};
use crate::check::SelfHealingLoop;
use crate::config::SyncConfig;
use crate::error::{IoOp, Result, SyncError};
use crate::rewrite::{FileTransformPipeline, SyncRecord};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a completed run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Rewritten constructors, in file order.
    pub records: Vec<SyncRecord>,
    /// Identifiers qualified by the healing loop.
    pub repairs: usize,
    /// Generated lookup table, as written to the build directory.
    pub mapping: PathBuf,
    /// Previously published files removed from the project.
    pub deprecated: Vec<PathBuf>,
}

/// Assembles the generated package in the build directory and publishes it:
///
/// 1. extract the exported upstream files
/// 2. transform every extracted file
/// 3. copy the wrapper type dependencies
/// 4. heal the package until it verifies clean
/// 5. emit the lookup table
/// 6. promote the build into the project
///
/// Files already written stay written when a later step fails.
#[derive(Debug, Clone)]
pub struct PackageUpdater {
    config: SyncConfig,
}

impl PackageUpdater {
    /// Validates `config` up front so a run does not fail halfway on a bad
    /// pattern.
    pub fn new(config: SyncConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn run(&self) -> Result<UpdateReport> {
        let paths = &self.config.paths;
        let build = paths.build_dir.as_path();

        self.prepare_build_dir()?;
        for pattern in &self.config.package.export_patterns {
            extract_files(pattern, &paths.upstream_dir, build)?;
        }

        let records = self.transform(build)?;
        info!(records = records.len(), "package transformed");

        copy_dependencies(&self.config.package.dependencies, &paths.project_dir, build)?;

        let healer = SelfHealingLoop::new(self.config.origin.clone(), self.config.repair.max_iterations);
        let repairs = healer.run(build)?;

        let emitter = LookupTableEmitter::new(&self.config.package.name, &self.config.package.mapping_file);
        let mapping = emitter.emit(&records, build)?;

        let managed = Regex::new(&self.config.patterns.managed_files)?;
        let deprecated = promote_build(build, &paths.project_dir, &managed)?;
        info!(
            project = %paths.project_dir.display(),
            deprecated = deprecated.len(),
            "package published"
        );

        Ok(UpdateReport {
            records,
            repairs,
            mapping,
            deprecated,
        })
    }

    /// Remove whatever a previous run left in the build directory.
    fn prepare_build_dir(&self) -> Result<()> {
        let build = &self.config.paths.build_dir;
        if build.exists() {
            std::fs::remove_dir_all(build).map_err(|e| SyncError::io(IoOp::Remove, build, e))?;
        }
        std::fs::create_dir_all(build).map_err(|e| SyncError::io(IoOp::CreateDirectory, build, e))
    }

    fn transform(&self, build: &Path) -> Result<Vec<SyncRecord>> {
        let pipeline = FileTransformPipeline::from_config(&self.config)?;
        let mut records = Vec::new();
        for path in list_sources(build)? {
            if let Some(record) = pipeline.run(&path)? {
                tracing::debug!(%record, "synced");
                records.push(record);
            }
        }
        Ok(records)
    }
}
