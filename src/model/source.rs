//! A parsed Go file with its position index.

use super::declarations::{Function, StructureDeclaration};
use super::locate::PatternLocator;
use crate::base::{LineIndex, Position, TextSize};
use crate::error::{IoOp, Result, SyncError};
use crate::parser::{self, SyntaxKind};
use crate::syntax::ast::*;
use crate::syntax::{make, printer, walk};
use smol_str::SmolStr;
use std::path::{Path, PathBuf};

/// Line/column lookup for one parse.
///
/// Holds the line starts of the parsed text and the sorted start offsets of
/// every identifier token, so a diagnostic position is checked against the
/// text before the tree is searched.
#[derive(Debug, Clone)]
pub struct PositionIndex {
    lines: LineIndex,
    idents: Vec<TextSize>,
}

impl PositionIndex {
    pub fn new(text: &str) -> Self {
        let idents = parser::lex(text)
            .tokens
            .iter()
            .filter(|token| token.kind == SyntaxKind::IDENT)
            .map(|token| token.offset)
            .collect();
        Self {
            lines: LineIndex::new(text),
            idents,
        }
    }

    pub fn position(&self, offset: TextSize) -> Position {
        self.lines.position(offset)
    }

    pub fn offset(&self, position: Position) -> Option<TextSize> {
        self.lines.offset(position)
    }

    /// Offset of the identifier starting exactly at `position`.
    pub fn ident_offset(&self, position: Position) -> Option<TextSize> {
        let offset = self.lines.offset(position)?;
        self.idents.binary_search(&offset).ok().map(|_| offset)
    }

    pub fn ident_count(&self) -> usize {
        self.idents.len()
    }
}

/// One parsed file: its path, tree and position index.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    path: PathBuf,
    file: File,
    index: PositionIndex,
}

impl SourceUnit {
    /// Read and parse the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SyncError::io(IoOp::Open, path, e))?;
        Self::parse(path, &text)
    }

    /// Parse `text` as the contents of `path`.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let path = path.into();
        let index = PositionIndex::new(text);
        let file = parser::parse(text).map_err(|err| {
            let position = index.position(err.offset);
            SyncError::Parse {
                path: path.clone(),
                line: position.line,
                column: position.column,
                message: err.message,
            }
        })?;
        tracing::trace!(path = %path.display(), idents = index.ident_count(), "parsed");
        Ok(Self { path, file, index })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    pub fn package_name(&self) -> &str {
        &self.file.package.name
    }

    pub fn rename_package(&mut self, name: &str) {
        self.file.package.name = name.into();
    }

    pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.file.imports()
    }

    pub fn has_import(&self, path: &str) -> bool {
        self.imports().any(|import| import.path_value() == path)
    }

    /// Import `path`, optionally under `alias`.
    ///
    /// A path is imported at most once; the first import declaration is
    /// extended, or a new import block is created before all other
    /// declarations. Returns whether an entry was added.
    pub fn add_import(&mut self, alias: Option<&str>, path: &str) -> bool {
        if self.has_import(path) {
            return false;
        }
        let spec = make::import_spec(alias, path);
        let existing = self.file.decls.iter_mut().find_map(|decl| match decl {
            Decl::Gen(decl) if decl.keyword == DeclKeyword::Import => Some(decl),
            _ => None,
        });
        match existing {
            Some(decl) => {
                decl.specs.push(Spec::Import(spec));
                decl.grouped = true;
            }
            None => self
                .file
                .decls
                .insert(0, Decl::Gen(make::import_decl(vec![spec]))),
        }
        true
    }

    pub fn find_structure(&mut self, locator: &PatternLocator) -> Option<StructureDeclaration<'_>> {
        locator.find_structure(&mut self.file)
    }

    pub fn find_function(&mut self, locator: &PatternLocator) -> Option<Function<'_>> {
        locator.find_function(&mut self.file)
    }

    /// The identifier that starts exactly at `position` in the parsed text.
    pub fn ident_at(&mut self, position: Position) -> Option<&mut Ident> {
        let offset = self.index.ident_offset(position)?;
        walk::ident_at_mut(&mut self.file, offset)
    }

    /// Rewrite the identifier at `position` to `package.Name`; returns the
    /// name it had.
    pub fn qualify_ident_at(&mut self, position: Position, package: &str) -> Option<SmolStr> {
        let ident = self.ident_at(position)?;
        let original = ident.name.clone();
        ident.name = make::qualified(package, &original).name;
        Some(original)
    }

    pub fn render(&self) -> String {
        printer::print_file(&self.file)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.render()).map_err(|e| SyncError::io(IoOp::Write, path, e))
    }

    /// Write back to the path the unit was read from.
    pub fn save(&self) -> Result<()> {
        self.save_to(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_position() {
        let err = SourceUnit::parse("pkg/foo.go", "package p\n\nfunc f() {\n\tx := \n}\n").unwrap_err();
        match err {
            SyncError::Parse { path, line, column, .. } => {
                assert_eq!(path, PathBuf::from("pkg/foo.go"));
                assert_eq!((line, column), (5, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ident_offsets_only_at_identifier_starts() {
        let index = PositionIndex::new("package p\nvar value = other\n");
        assert!(index.ident_offset(Position::new(2, 5)).is_some());
        assert!(index.ident_offset(Position::new(2, 6)).is_none());
        assert!(index.ident_offset(Position::new(2, 1)).is_none());
        assert!(index.ident_offset(Position::new(9, 1)).is_none());
    }

    #[test]
    fn test_add_import_creates_block_once() {
        let mut unit = SourceUnit::parse("a.go", "package p\n\nvar x = 1\n").unwrap();
        assert!(unit.add_import(None, "github.com/olivere/elastic"));
        assert!(!unit.add_import(None, "github.com/olivere/elastic"));
        assert_eq!(unit.imports().count(), 1);
        assert!(unit.render().starts_with("package p\n\nimport (\n\t\"github.com/olivere/elastic\"\n)\n"));
    }

    #[test]
    fn test_add_import_extends_existing_declaration() {
        let mut unit = SourceUnit::parse("a.go", "package p\n\nimport \"fmt\"\n").unwrap();
        assert!(unit.add_import(None, "github.com/olivere/elastic"));
        assert_eq!(unit.imports().count(), 2);
        assert!(unit.render().contains("import (\n\t\"fmt\"\n\t\"github.com/olivere/elastic\"\n)"));
    }

    #[test]
    fn test_qualify_identifier() {
        let mut unit = SourceUnit::parse("a.go", "package p\n\nvar x = Bar\n").unwrap();
        assert_eq!(unit.qualify_ident_at(Position::new(3, 9), "elastic").as_deref(), Some("Bar"));
        assert!(unit.render().contains("var x = elastic.Bar"));
        assert!(unit.qualify_ident_at(Position::new(3, 10), "elastic").is_none());
    }

    #[test]
    fn test_rename_package() {
        let mut unit = SourceUnit::parse("a.go", "package elastic\n").unwrap();
        unit.rename_package("aggretastic");
        assert_eq!(unit.package_name(), "aggretastic");
        assert_eq!(unit.render(), "package aggretastic\n");
    }
}
