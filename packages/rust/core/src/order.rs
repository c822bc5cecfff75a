//! Deterministic file ordering within a compilation unit.
//!
//! Files are classified into tiers once and sorted by `(tier, base_name,
//! path)`:
//! 1. the file named after the unit (`widget.go` in package `widget`)
//! 2. the file named `doc`
//! 3. everything else, byte-wise by base name
//!
//! This lets authors put a header in one of the first two files while the
//! rest falls back to plain alphabetical order.

use rstextract_shared::{CompilationUnit, MemberFile};

/// Base name that always sorts right after the unit-named file.
const DOC_BASE_NAME: &str = "doc";

/// Ordering priority of a member file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Base name equals the unit name.
    UnitName,
    /// Base name is `doc`.
    Doc,
    /// Any other file.
    Other,
}

impl Tier {
    /// Classify a base name. The unit-name check wins, so in a unit called
    /// `doc` the `doc` file is [`Tier::UnitName`].
    pub fn classify(unit_name: &str, base_name: &str) -> Self {
        if base_name == unit_name {
            Self::UnitName
        } else if base_name == DOC_BASE_NAME {
            Self::Doc
        } else {
            Self::Other
        }
    }
}

/// Order a unit's member files for extraction.
pub fn order_files(unit: &CompilationUnit) -> Vec<&MemberFile> {
    let mut files: Vec<(Tier, &MemberFile)> = unit
        .files
        .iter()
        .map(|f| (Tier::classify(&unit.name, &f.base_name), f))
        .collect();

    // Path only separates files with identical base names.
    files.sort_by(|(ta, a), (tb, b)| {
        ta.cmp(tb)
            .then_with(|| a.base_name.as_bytes().cmp(b.base_name.as_bytes()))
            .then_with(|| a.path.cmp(&b.path))
    });

    files.into_iter().map(|(_, f)| f).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(name: &str, files: &[&str]) -> CompilationUnit {
        CompilationUnit {
            name: name.into(),
            files: files
                .iter()
                .map(|f| MemberFile::new(format!("/src/{f}"), vec![]))
                .collect(),
        }
    }

    fn ordered(unit: &CompilationUnit) -> Vec<&str> {
        order_files(unit)
            .into_iter()
            .map(|f| f.base_name.as_str())
            .collect()
    }

    #[test]
    fn unit_file_then_doc_then_alphabetical() {
        let u = unit("test", &["z.go", "a.go", "doc.go", "test.go"]);
        assert_eq!(ordered(&u), vec!["test", "doc", "a", "z"]);
    }

    #[test]
    fn doc_first_without_unit_file() {
        let u = unit("widget", &["b.go", "doc.go", "a.go"]);
        assert_eq!(ordered(&u), vec!["doc", "a", "b"]);
    }

    #[test]
    fn unit_file_first_without_doc() {
        let u = unit("widget", &["a.go", "widget.go", "zz.go"]);
        assert_eq!(ordered(&u), vec!["widget", "a", "zz"]);
    }

    #[test]
    fn remaining_files_sort_bytewise() {
        // Uppercase sorts before lowercase; "a_b" after "a" but before "ab".
        let u = unit("p", &["ab.go", "a_b.go", "B.go", "a.go", "docs.go"]);
        assert_eq!(ordered(&u), vec!["B", "a", "a_b", "ab", "docs"]);
    }

    #[test]
    fn unit_named_doc_keeps_doc_first_once() {
        let u = unit("doc", &["b.go", "doc.go", "a.go"]);
        assert_eq!(ordered(&u), vec!["doc", "a", "b"]);
    }

    #[test]
    fn ordering_ignores_input_order() {
        let names = ["m.go", "doc.go", "c.go", "pkg.go", "a.go"];
        let forward = unit("pkg", &names);
        let mut reversed_names = names;
        reversed_names.reverse();
        let reversed = unit("pkg", &reversed_names);
        assert_eq!(ordered(&forward), ordered(&reversed));
        assert_eq!(ordered(&forward), vec!["pkg", "doc", "a", "c", "m"]);
    }

    #[test]
    fn output_is_a_permutation() {
        let u = unit("x", &["q.go", "x.go", "doc.go", "b.go", "x_test.go"]);
        let out = order_files(&u);
        assert_eq!(out.len(), u.files.len());
        for file in &u.files {
            assert_eq!(out.iter().filter(|f| f.path == file.path).count(), 1);
        }
    }

    #[test]
    fn empty_unit_orders_to_nothing() {
        assert!(order_files(&unit("empty", &[])).is_empty());
    }

    #[test]
    fn tier_classification() {
        assert_eq!(Tier::classify("net", "net"), Tier::UnitName);
        assert_eq!(Tier::classify("net", "doc"), Tier::Doc);
        assert_eq!(Tier::classify("net", "dial"), Tier::Other);
        assert_eq!(Tier::classify("doc", "doc"), Tier::UnitName);
        assert!(Tier::UnitName < Tier::Doc && Tier::Doc < Tier::Other);
    }
}
