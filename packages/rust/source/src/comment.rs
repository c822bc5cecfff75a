//! Comment grouping and comment-group text normalization.
//!
//! Adjacent comments form one group the same way the Go toolchain groups
//! them, and each group is flattened to plain text: delimiters stripped,
//! directives dropped, blank lines collapsed, exactly one trailing newline.

use std::sync::LazyLock;

use regex::Regex;

use rstextract_shared::CommentBlock;

/// Matches `//`-comment bodies that are tool directives rather than prose
/// (`//go:generate`, `//line foo.go:10`, `//export Name`, ...).
static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:line |extern |export |[a-z0-9]+:[a-z0-9])").expect("directive regex")
});

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// A group still accepting comments.
struct OpenGroup<'a> {
    comments: Vec<&'a str>,
    start_line: usize,
    end_line: usize,
    /// How many lines after `end_line` the next comment may start.
    slack: usize,
}

/// Collects comments into groups while a file is scanned.
#[derive(Default)]
pub(crate) struct CommentGrouper<'a> {
    groups: Vec<CommentBlock>,
    current: Option<OpenGroup<'a>>,
    last_token_line: Option<usize>,
    after_token: bool,
}

impl<'a> CommentGrouper<'a> {
    /// Feed a comment spanning `start_line..=end_line`.
    pub(crate) fn push_comment(&mut self, text: &'a str, start_line: usize, end_line: usize) {
        if let Some(group) = self.current.as_mut() {
            if start_line <= group.end_line + group.slack {
                group.comments.push(text);
                group.end_line = end_line;
                return;
            }
        }
        self.close();

        // A comment trailing code on the same line only groups with comments
        // that continue on that same line.
        let slack = if self.after_token && self.last_token_line == Some(start_line) {
            0
        } else {
            1
        };
        self.after_token = false;
        self.current = Some(OpenGroup {
            comments: vec![text],
            start_line,
            end_line,
            slack,
        });
    }

    /// Feed a non-comment token ending on `end_line`.
    pub(crate) fn push_token(&mut self, end_line: usize) {
        self.close();
        self.last_token_line = Some(end_line);
        self.after_token = true;
    }

    /// Close any open group and return all groups in source order.
    pub(crate) fn finish(mut self) -> Vec<CommentBlock> {
        self.close();
        self.groups
    }

    fn close(&mut self) {
        if let Some(group) = self.current.take() {
            self.groups
                .push(CommentBlock::new(group_text(&group.comments), group.start_line));
        }
    }
}

// ---------------------------------------------------------------------------
// Text normalization
// ---------------------------------------------------------------------------

/// Flatten the raw comments of one group into normalized text.
pub(crate) fn group_text(comments: &[&str]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for raw in comments {
        let raw = raw.replace('\r', "");
        let body = if let Some(rest) = raw.strip_prefix("//") {
            match rest.strip_prefix(' ') {
                Some(rest) => rest,
                None if is_directive(rest) => continue,
                None => rest,
            }
        } else if raw.len() >= 4 && raw.starts_with("/*") && raw.ends_with("*/") {
            &raw[2..raw.len() - 2]
        } else {
            raw.as_str()
        };

        lines.extend(
            body.split('\n')
                .map(|line| line.trim_end_matches([' ', '\t', '\n', '\r']).to_string()),
        );
    }

    // Drop leading blank lines and collapse interior runs of blank lines.
    let mut kept: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if !line.is_empty() || kept.last().is_some_and(|prev| !prev.is_empty()) {
            kept.push(line);
        }
    }

    if kept.last().is_some_and(|last| !last.is_empty()) {
        kept.push(String::new());
    }

    kept.join("\n")
}

fn is_directive(body: &str) -> bool {
    DIRECTIVE_RE.is_match(body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_comment_drops_one_leading_space() {
        assert_eq!(group_text(&["//+rst"]), "+rst\n");
        assert_eq!(group_text(&["// +rst"]), "+rst\n");
        assert_eq!(group_text(&["//  indented"]), " indented\n");
    }

    #[test]
    fn block_comment_strips_delimiters() {
        assert_eq!(group_text(&["/*+rst*/"]), "+rst\n");
        assert_eq!(group_text(&["/* +rst */"]), " +rst\n");
        assert_eq!(group_text(&["/*\n+rst */"]), "+rst\n");
        assert_eq!(group_text(&["/* +rst\nfoo */"]), " +rst\nfoo\n");
        assert_eq!(group_text(&["/* foo\n+rst */"]), " foo\n+rst\n");
    }

    #[test]
    fn adjacent_line_comments_join() {
        let text = group_text(&["// +rst", "// first", "//", "// second"]);
        assert_eq!(text, "+rst\nfirst\n\nsecond\n");
    }

    #[test]
    fn blank_runs_collapse_and_trailing_newline_is_single() {
        let text = group_text(&["/*\n\n\nhead\n\n\n\nbody\n\n\n*/"]);
        assert_eq!(text, "head\n\nbody\n");
    }

    #[test]
    fn trailing_whitespace_is_stripped() {
        assert_eq!(group_text(&["// a  \t", "// b\r"]), "a\nb\n");
    }

    #[test]
    fn directives_are_dropped() {
        let text = group_text(&["//go:generate stringer -type=Kind", "// +rst", "// body"]);
        assert_eq!(text, "+rst\nbody\n");
        assert_eq!(group_text(&["//line foo.go:10"]), "");
        assert_eq!(group_text(&["//export Name"]), "");
        // A space after the slashes makes it prose again.
        assert_eq!(group_text(&["// go:generate"]), "go:generate\n");
        // Uppercase before the colon is not a directive.
        assert_eq!(group_text(&["//Note:x"]), "Note:x\n");
    }

    #[test]
    fn empty_comments_yield_empty_text() {
        assert_eq!(group_text(&["//"]), "");
        assert_eq!(group_text(&["/**/"]), "");
        assert_eq!(group_text(&[]), "");
    }

    #[test]
    fn grouper_splits_on_blank_line() {
        let mut grouper = CommentGrouper::default();
        grouper.push_comment("// a", 1, 1);
        grouper.push_comment("// b", 2, 2);
        grouper.push_comment("// c", 4, 4);
        let groups = grouper.finish();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], CommentBlock::new("a\nb\n", 1));
        assert_eq!(groups[1], CommentBlock::new("c\n", 4));
    }

    #[test]
    fn grouper_splits_on_code() {
        let mut grouper = CommentGrouper::default();
        grouper.push_comment("// a", 1, 1);
        grouper.push_token(2);
        grouper.push_comment("// b", 3, 3);
        let groups = grouper.finish();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn trailing_comment_does_not_absorb_next_line() {
        // x := 1 // a
        // // b
        let mut grouper = CommentGrouper::default();
        grouper.push_token(1);
        grouper.push_comment("// a", 1, 1);
        grouper.push_comment("// b", 2, 2);
        grouper.push_comment("// c", 3, 3);
        let groups = grouper.finish();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].text, "a\n");
        assert_eq!(groups[1].text, "b\nc\n");
    }

    #[test]
    fn multiline_block_extends_group_end() {
        let mut grouper = CommentGrouper::default();
        grouper.push_comment("/* a\nb */", 1, 2);
        grouper.push_comment("// c", 3, 3);
        let groups = grouper.finish();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].text, " a\nb\nc\n");
    }
}
