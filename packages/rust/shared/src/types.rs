//! Core domain types: compilation units, their member files, and comment blocks.

use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// CommentBlock
// ---------------------------------------------------------------------------

/// One comment group of a source file, with comment delimiters stripped and
/// its lines joined by `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    /// Normalized comment text.
    pub text: String,
    /// 1-based line on which the group starts (diagnostics only).
    pub line: usize,
}

impl CommentBlock {
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }
}

// ---------------------------------------------------------------------------
// MemberFile
// ---------------------------------------------------------------------------

/// A single source file belonging to one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFile {
    /// Path the file was loaded from.
    pub path: PathBuf,
    /// File name without directory and without its last extension.
    pub base_name: String,
    /// Comment blocks in source order.
    pub comments: Vec<CommentBlock>,
}

impl MemberFile {
    /// Build a member file, deriving its base name from `path`.
    pub fn new(path: impl Into<PathBuf>, comments: Vec<CommentBlock>) -> Self {
        let path = path.into();
        Self {
            base_name: base_name(&path),
            path,
            comments,
        }
    }
}

/// Strip the directory and the last `.ext` suffix from a path.
///
/// `foo.bar` → `foo`, `foo.bar.baz` → `foo.bar`, `foo` → `foo`, `.asdf` → ``.
pub fn base_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match name.rfind('.') {
        Some(idx) => name[..idx].to_string(),
        None => name,
    }
}

// ---------------------------------------------------------------------------
// CompilationUnit
// ---------------------------------------------------------------------------

/// A named group of source files producing one output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    /// Declared unit name (Go package name).
    pub name: String,
    /// Member files, in no particular order.
    pub files: Vec<MemberFile>,
}

impl CompilationUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// SourceTree
// ---------------------------------------------------------------------------

/// All compilation units parsed from one source directory.
///
/// Units are kept sorted by name so iteration never depends on the order in
/// which files were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTree {
    units: Vec<CompilationUnit>,
}

impl SourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the unit called `unit_name`, creating the unit if needed.
    pub fn add_file(&mut self, unit_name: &str, file: MemberFile) {
        let idx = match self
            .units
            .binary_search_by(|u| u.name.as_str().cmp(unit_name))
        {
            Ok(idx) => idx,
            Err(idx) => {
                self.units.insert(idx, CompilationUnit::new(unit_name));
                idx
            }
        };
        self.units[idx].files.push(file);
    }

    /// Look up a unit by name.
    pub fn get(&self, name: &str) -> Option<&CompilationUnit> {
        self.units
            .binary_search_by(|u| u.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.units[idx])
    }

    /// Units in ascending name order.
    pub fn units(&self) -> &[CompilationUnit] {
        &self.units
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompilationUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl<'a> IntoIterator for &'a SourceTree {
    type Item = &'a CompilationUnit;
    type IntoIter = std::slice::Iter<'a, CompilationUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_last_extension() {
        let cases = [
            ("foo.bar", "foo"),
            ("foo.bar.baz", "foo.bar"),
            ("foo", "foo"),
            (".asdf", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(base_name(Path::new(input)), expected, "input {input:?}");
        }
    }

    #[test]
    fn base_name_strips_directory() {
        assert_eq!(base_name(Path::new("src/pkg/widget.go")), "widget");
        // Dots in directory names never leak into the base name.
        assert_eq!(base_name(Path::new("gopkg.in/yaml/decode.go")), "decode");
        assert_eq!(base_name(Path::new("dir.v2/README")), "README");
    }

    #[test]
    fn member_file_derives_base_name() {
        let file = MemberFile::new("/src/doc.go", vec![CommentBlock::new("x\n", 1)]);
        assert_eq!(file.base_name, "doc");
        assert_eq!(file.comments.len(), 1);
    }

    #[test]
    fn source_tree_keeps_units_sorted() {
        let mut tree = SourceTree::new();
        tree.add_file("zeta", MemberFile::new("z.go", vec![]));
        tree.add_file("alpha", MemberFile::new("a.go", vec![]));
        tree.add_file("mid", MemberFile::new("m.go", vec![]));
        tree.add_file("alpha", MemberFile::new("b.go", vec![]));

        let names: Vec<&str> = tree.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get("alpha").unwrap().files.len(), 2);
        assert!(tree.get("missing").is_none());
    }

    #[test]
    fn empty_source_tree() {
        let tree = SourceTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.units().len(), 0);
    }
}
