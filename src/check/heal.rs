//! Diagnostic-driven repair.

use super::diagnostic::Diagnostic;
use super::verify::{SemanticAnalyzer, SemanticVerifier, UndefinedNameAnalyzer};
use crate::config::OriginConfig;
use crate::error::{Result, SyncError};
use crate::model::SourceUnit;
use crate::project::list_sources;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of one verify-and-repair step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealStep {
    /// Nothing left to report.
    Clean,
    /// The reported identifier was qualified.
    Repaired(Diagnostic),
    /// No identifier starts at the reported position; nothing was edited.
    Unrepaired(Diagnostic),
}

/// Qualifies undefined names with the origin package until the working set
/// verifies clean.
///
/// Each step fixes one diagnostic, since the verifier reports only the
/// first. The loop gives up after `max_iterations` steps.
#[derive(Debug, Clone)]
pub struct SelfHealingLoop<A = UndefinedNameAnalyzer> {
    verifier: SemanticVerifier<A>,
    origin: OriginConfig,
    max_iterations: usize,
}

impl SelfHealingLoop {
    pub fn new(origin: OriginConfig, max_iterations: usize) -> Self {
        Self::with_verifier(SemanticVerifier::new(), origin, max_iterations)
    }
}

impl<A: SemanticAnalyzer> SelfHealingLoop<A> {
    pub fn with_verifier(verifier: SemanticVerifier<A>, origin: OriginConfig, max_iterations: usize) -> Self {
        Self {
            verifier,
            origin,
            max_iterations,
        }
    }

    /// Verify `files` once and repair the reported identifier.
    pub fn heal_once(&self, files: &[PathBuf]) -> Result<HealStep> {
        let Some(diagnostic) = self.verifier.verify(files)? else {
            return Ok(HealStep::Clean);
        };
        if self.repair(&diagnostic)? {
            Ok(HealStep::Repaired(diagnostic))
        } else {
            Ok(HealStep::Unrepaired(diagnostic))
        }
    }

    /// Import the origin package into the reported file and qualify the
    /// identifier at the reported position. Returns whether an edit was made.
    ///
    /// Both edits go through one parse. Identifier positions come from that
    /// parse, so adding the import first does not move the target.
    pub fn repair(&self, diagnostic: &Diagnostic) -> Result<bool> {
        let mut unit = SourceUnit::open(&diagnostic.path)?;
        let imported = unit.add_import(None, &self.origin.path);
        let Some(name) = unit.qualify_ident_at(diagnostic.position, &self.origin.name) else {
            warn!(%diagnostic, "no identifier at the reported position");
            return Ok(false);
        };
        unit.save()?;
        debug!(
            path = %diagnostic.path.display(),
            position = %diagnostic.position,
            %name,
            imported,
            "qualified with {}",
            self.origin.name
        );
        Ok(true)
    }

    /// Heal the sources directly inside `dir` to a fixed point; returns the
    /// number of repairs made.
    pub fn run(&self, dir: &Path) -> Result<usize> {
        let mut repairs = 0;
        let mut last = None;
        for _ in 0..self.max_iterations {
            let files = list_sources(dir)?;
            match self.heal_once(&files)? {
                HealStep::Clean => {
                    info!(dir = %dir.display(), repairs, "sources verify clean");
                    return Ok(repairs);
                }
                HealStep::Repaired(diagnostic) => {
                    repairs += 1;
                    last = Some(diagnostic);
                }
                HealStep::Unrepaired(diagnostic) => last = Some(diagnostic),
            }
        }
        Err(SyncError::NotConverged {
            iterations: self.max_iterations,
            diagnostic: last.map(|d| d.to_string()).unwrap_or_default(),
        })
    }
}
