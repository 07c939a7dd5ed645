//! Scope tables for identifier resolution.
//!
//! Resolution walks outward through local scopes, the file's imports, the
//! package and finally the universe.

use crate::syntax::ast::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::LazyLock;

/// Predeclared types, constants, the zero value and builtin functions.
static UNIVERSE: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
    [
        // types
        "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32",
        "float64", "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8",
        "uint16", "uint32", "uint64", "uintptr",
        // constants
        "true", "false", "iota", "nil",
        // functions
        "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make",
        "max", "min", "new", "panic", "print", "println", "real", "recover",
    ]
    .into_iter()
    .collect()
});

pub(super) fn is_predeclared(name: &str) -> bool {
    UNIVERSE.contains(name)
}

/// The name an import is referred to by when it has no alias.
///
/// This is the last path element, with a trailing major version
/// (`/v7`, `.v2`) and a `go-` prefix removed.
pub fn import_name(path: &str) -> String {
    let mut elements = path.rsplit('/');
    let mut last = elements.next().unwrap_or(path);
    if is_major_version(last) {
        if let Some(previous) = elements.next() {
            last = previous;
        }
    }
    if let Some((stem, version)) = last.rsplit_once('.') {
        if is_major_version(version) {
            last = stem;
        }
    }
    let last = last.strip_prefix("go-").unwrap_or(last);
    last.replace(['-', '.'], "_")
}

fn is_major_version(element: &str) -> bool {
    element
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

// ============================================================================
// PACKAGE SCOPE
// ============================================================================

/// Top-level declarations shared by every file of a package.
#[derive(Debug, Default)]
pub struct PackageScope<'a> {
    names: FxHashSet<&'a str>,
    /// Declared type of each named type, for composite literal keys.
    types: FxHashMap<&'a str, &'a Expr>,
}

impl<'a> PackageScope<'a> {
    /// Collect the top-level declarations of all `files`. Methods do not
    /// enter the package scope.
    pub fn collect(files: impl IntoIterator<Item = &'a File>) -> Self {
        let mut scope = Self::default();
        for file in files {
            for decl in &file.decls {
                match decl {
                    Decl::Gen(gen_decl) => scope.add_gen_decl(gen_decl),
                    Decl::Func(func) if func.recv.is_none() => {
                        scope.names.insert(&func.name.name);
                    }
                    Decl::Func(_) => {}
                }
            }
        }
        scope
    }

    fn add_gen_decl(&mut self, gen_decl: &'a GenDecl) {
        for spec in &gen_decl.specs {
            match spec {
                Spec::Import(_) => {}
                Spec::Value(value) => {
                    self.names
                        .extend(value.names.iter().filter(|n| !n.is_blank()).map(|n| n.name.as_str()));
                }
                Spec::Type(ty) => {
                    self.names.insert(&ty.name.name);
                    self.types.insert(&ty.name.name, &ty.ty);
                }
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// The type expression `name` was declared with.
    pub fn declared_type(&self, name: &str) -> Option<&'a Expr> {
        self.types.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================================================
// FILE SCOPE
// ============================================================================

/// Names a single file imports.
#[derive(Debug, Default)]
pub struct FileScope {
    imports: FxHashSet<String>,
    /// A `.` import makes the file's unqualified names unresolvable here.
    dot_import: bool,
}

impl FileScope {
    pub fn new(file: &File) -> Self {
        let mut scope = Self::default();
        for import in file.imports() {
            match import.name.as_ref().map(|ident| ident.name.as_str()) {
                Some(".") => scope.dot_import = true,
                Some("_") => {}
                Some(alias) => {
                    scope.imports.insert(alias.to_string());
                }
                None => {
                    scope.imports.insert(import_name(import.path_value()));
                }
            }
        }
        scope
    }

    pub fn contains(&self, name: &str) -> bool {
        self.imports.contains(name)
    }

    pub fn has_dot_import(&self) -> bool {
        self.dot_import
    }
}

// ============================================================================
// LOCAL SCOPES
// ============================================================================

/// Nested block scopes of the function being resolved.
#[derive(Debug, Default)]
pub struct LocalScopes<'a> {
    scopes: Vec<FxHashSet<&'a str>>,
}

impl<'a> LocalScopes<'a> {
    pub fn push(&mut self) {
        self.scopes.push(FxHashSet::default());
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    /// Declare `ident` in the innermost scope.
    pub fn declare(&mut self, ident: &'a Ident) {
        if ident.is_blank() {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(&ident.name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains(name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
