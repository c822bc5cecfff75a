//! Go source loading for rstextract.
//!
//! Reads a directory of `.go` files, scans each one for its package clause and
//! comment groups, and assembles the files into a [`SourceTree`] of
//! compilation units keyed by package name.
//!
//! Only lexical structure is checked: a file that scans cleanly and starts
//! with a package clause is accepted even if it would not type-check.

mod comment;
mod scanner;

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use rstextract_shared::{CommentBlock, MemberFile, Result, RstExtractError, SourceTree};

use crate::comment::CommentGrouper;
use crate::scanner::{Scanner, TokenKind};

/// File extension of Go sources.
const SOURCE_EXTENSION: &str = ".go";

/// Suffix of Go test files.
const TEST_FILE_SUFFIX: &str = "_test.go";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Options controlling which files [`load_dir`] picks up.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Ignore `*_test.go` files.
    pub skip_test_files: bool,
}

/// Result of scanning a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    /// Declared package name.
    pub package: String,
    /// Comment groups in source order.
    pub comments: Vec<CommentBlock>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Progress through the `package <name>` clause.
enum PackageClause {
    Keyword,
    Name,
    Done(String),
}

/// Scan Go source text. `path` is only used in error messages.
pub fn parse_source(path: &Path, src: &str) -> Result<ParsedFile> {
    let mut scanner = Scanner::new(src);
    let mut grouper = CommentGrouper::default();
    let mut clause = PackageClause::Keyword;

    for token in scanner.by_ref() {
        let token = token.map_err(|e| RstExtractError::parse(path, e.line, e.message))?;

        if let TokenKind::Comment(text) = token.kind {
            grouper.push_comment(text, token.start_line, token.end_line);
            continue;
        }
        grouper.push_token(token.end_line);

        clause = match (clause, token.kind) {
            (PackageClause::Keyword, TokenKind::Ident("package")) => PackageClause::Name,
            (PackageClause::Keyword, _) => {
                return Err(RstExtractError::parse(
                    path,
                    token.start_line,
                    "expected 'package'",
                ));
            }
            (PackageClause::Name, TokenKind::Ident("_")) => {
                return Err(RstExtractError::parse(
                    path,
                    token.start_line,
                    "invalid package name _",
                ));
            }
            (PackageClause::Name, TokenKind::Ident(name)) => PackageClause::Done(name.to_string()),
            (PackageClause::Name, _) => {
                return Err(RstExtractError::parse(
                    path,
                    token.start_line,
                    "expected package name",
                ));
            }
            (done @ PackageClause::Done(_), _) => done,
        };
    }

    let package = match clause {
        PackageClause::Done(name) => name,
        PackageClause::Keyword => {
            return Err(RstExtractError::parse(path, scanner.line(), "expected 'package'"));
        }
        PackageClause::Name => {
            return Err(RstExtractError::parse(
                path,
                scanner.line(),
                "expected package name",
            ));
        }
    };

    Ok(ParsedFile {
        package,
        comments: grouper.finish(),
    })
}

/// Read and scan a single Go source file.
pub fn parse_file(path: &Path) -> Result<ParsedFile> {
    let src = std::fs::read_to_string(path).map_err(|e| RstExtractError::io(path, e))?;
    parse_source(path, &src)
}

// ---------------------------------------------------------------------------
// Directory loading
// ---------------------------------------------------------------------------

/// Load every `.go` file directly inside `dir` into a [`SourceTree`].
///
/// Subdirectories are not descended into. Files are parsed in path order and
/// the first error aborts the load.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_dir(dir: &Path, opts: &LoadOptions) -> Result<SourceTree> {
    let paths = source_files(dir, opts)?;
    let mut tree = SourceTree::new();

    for path in &paths {
        let parsed = parse_file(path)?;
        debug!(
            path = %path.display(),
            package = %parsed.package,
            comment_groups = parsed.comments.len(),
            "scanned source file"
        );
        tree.add_file(&parsed.package, MemberFile::new(path, parsed.comments));
    }

    info!(files = paths.len(), units = tree.len(), "loaded source directory");
    Ok(tree)
}

/// List the source files of `dir`, sorted by path.
fn source_files(dir: &Path, opts: &LoadOptions) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| RstExtractError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RstExtractError::io(dir, e))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if !name.ends_with(SOURCE_EXTENSION) || !path.is_file() {
            continue;
        }
        if opts.skip_test_files && name.ends_with(TEST_FILE_SUFFIX) {
            debug!(path = %path.display(), "skipping test file");
            continue;
        }
        paths.push(path);
    }

    paths.sort();
    Ok(paths)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
