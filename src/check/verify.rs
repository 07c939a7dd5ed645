//! Batch semantic verification.

use super::diagnostic::Diagnostic;
use super::resolver::first_undefined;
use crate::error::Result;
use crate::model::SourceUnit;
use crate::project::list_sources;
use std::path::{Path, PathBuf};

/// Checks a set of files as one package.
pub trait SemanticAnalyzer {
    /// The first error in `path:line:column: message` form, or `None` when
    /// the package is clean.
    fn analyze(&self, files: &[PathBuf]) -> Result<Option<String>>;
}

/// Reports names that no scope declares.
#[derive(Debug, Clone, Copy, Default)]
pub struct UndefinedNameAnalyzer;

impl SemanticAnalyzer for UndefinedNameAnalyzer {
    fn analyze(&self, files: &[PathBuf]) -> Result<Option<String>> {
        let units = files
            .iter()
            .map(SourceUnit::open)
            .collect::<Result<Vec<_>>>()?;
        Ok(first_undefined(&units).map(|diagnostic| diagnostic.to_string()))
    }
}

/// Runs an analyzer over the whole working set and parses what it reports.
#[derive(Debug, Clone, Default)]
pub struct SemanticVerifier<A = UndefinedNameAnalyzer> {
    analyzer: A,
}

impl SemanticVerifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: SemanticAnalyzer> SemanticVerifier<A> {
    pub fn with_analyzer(analyzer: A) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// The first diagnostic for `files`, if any.
    pub fn verify(&self, files: &[PathBuf]) -> Result<Option<Diagnostic>> {
        self.analyzer
            .analyze(files)?
            .map(|report| report.parse::<Diagnostic>())
            .transpose()
    }

    /// Verify every source file directly inside `dir`.
    pub fn verify_dir(&self, dir: &Path) -> Result<Option<Diagnostic>> {
        let files = list_sources(dir)?;
        tracing::debug!(dir = %dir.display(), files = files.len(), "verifying");
        self.verify(&files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Position;
    use crate::error::SyncError;

    struct Fixed(&'static str);

    impl SemanticAnalyzer for Fixed {
        fn analyze(&self, _files: &[PathBuf]) -> Result<Option<String>> {
            Ok(Some(self.0.to_string()))
        }
    }

    #[test]
    fn test_reported_string_is_parsed() {
        let verifier = SemanticVerifier::with_analyzer(Fixed("pkg/foo.go:10:5: undefined: Bar"));
        let diagnostic = verifier.verify(&[]).unwrap().unwrap();
        assert_eq!(diagnostic.path, PathBuf::from("pkg/foo.go"));
        assert_eq!(diagnostic.position, Position::new(10, 5));
    }

    #[test]
    fn test_malformed_report_is_fatal() {
        let verifier = SemanticVerifier::with_analyzer(Fixed("something went wrong"));
        assert!(matches!(
            verifier.verify(&[]).unwrap_err(),
            SyncError::DiagnosticFormat { .. }
        ));
    }

    #[test]
    fn test_verify_dir_spans_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.go"), "package p\n\nvar a = b\n").unwrap();
        std::fs::write(dir.path().join("b.go"), "package p\n\nvar b = Missing\n").unwrap();
        let diagnostic = SemanticVerifier::new().verify_dir(dir.path()).unwrap().unwrap();
        assert_eq!(diagnostic.path, dir.path().join("b.go"));
        assert_eq!(diagnostic.undefined_name(), Some("Missing"));
    }
}
