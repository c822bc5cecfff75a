//! Lexical scanner for Go source text.
//!
//! Only distinguishes what comment extraction needs: comments, identifiers,
//! and "anything else". String, raw string, and rune literals are lexed as
//! opaque tokens so comment delimiters inside them are never misread.
//!
//! Tokenization is done by `logos`; this module layers line tracking and
//! error reporting on top of the raw token stream.

use logos::Logos;

/// Raw token produced by the `logos` lexer.
///
/// Every unterminated literal or comment has its own variant so the error is
/// reported against the line the token starts on.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*[^*]*\*+([^*/][^*]*\*+)*/")]
    BlockComment,

    #[regex(r"/\*[^*]*(\*+[^*/][^*]*)*\**")]
    OpenBlockComment,

    #[regex(r"`[^`]*`")]
    RawString,

    #[regex(r"`[^`]*")]
    OpenRawString,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    InterpretedString,

    #[regex(r#""([^"\\\n]|\\[^\n])*\\?"#)]
    OpenInterpretedString,

    #[regex(r"'([^'\\\n]|\\[^\n])*'")]
    Rune,

    #[regex(r"'([^'\\\n]|\\[^\n])*\\?")]
    OpenRune,

    /// Letters, `_`, and any non-ASCII character start an identifier.
    #[regex(r"[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*")]
    Ident,

    #[regex(r"[0-9][A-Za-z0-9_.]*")]
    Number,

    /// Operators and punctuation, one character at a time.
    #[regex(r#"[^ \t\r\nA-Za-z0-9_\x{80}-\x{10FFFF}"'`]"#)]
    Punct,
}

/// Kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    /// A `//` or `/* */` comment, delimiters included.
    Comment(&'a str),
    /// An identifier or keyword.
    Ident(&'a str),
    /// Literals, operators, punctuation.
    Other,
}

/// A token with the 1-based lines it starts and ends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub start_line: usize,
    pub end_line: usize,
}

/// Lexical error with the line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScanError {
    pub line: usize,
    pub message: &'static str,
}

pub(crate) struct Scanner<'a> {
    src: &'a str,
    lexer: logos::Lexer<'a, RawToken>,
    /// Byte offset up to which `line` has been counted.
    pos: usize,
    line: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Self {
            src,
            lexer: RawToken::lexer(src),
            pos: 0,
            line: 1,
            failed: false,
        }
    }

    /// Line the scanner is currently on.
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    /// Advance line tracking to byte offset `to`.
    fn advance_to(&mut self, to: usize) {
        self.line += newlines(&self.src[self.pos..to]);
        self.pos = to;
    }

    fn classify(raw: Result<RawToken, ()>, slice: &'a str) -> Result<TokenKind<'a>, &'static str> {
        let kind = match raw {
            Ok(RawToken::LineComment | RawToken::BlockComment) => TokenKind::Comment(slice),
            Ok(RawToken::Ident) => TokenKind::Ident(slice),
            Ok(RawToken::OpenBlockComment) => return Err("comment not terminated"),
            Ok(RawToken::OpenRawString) => return Err("raw string literal not terminated"),
            Ok(RawToken::OpenInterpretedString) => return Err("string literal not terminated"),
            Ok(RawToken::OpenRune) => return Err("rune literal not terminated"),
            Ok(RawToken::RawString | RawToken::InterpretedString | RawToken::Rune)
            | Ok(RawToken::Number | RawToken::Punct)
            | Err(()) => TokenKind::Other,
        };
        Ok(kind)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let Some(raw) = self.lexer.next() else {
            self.advance_to(self.src.len());
            return None;
        };
        let span = self.lexer.span();
        let slice = self.lexer.slice();

        self.advance_to(span.start);
        let start_line = self.line;
        match Self::classify(raw, slice) {
            Ok(kind) => {
                self.advance_to(span.end);
                Some(Ok(Token {
                    kind,
                    start_line,
                    end_line: self.line,
                }))
            }
            Err(message) => {
                self.failed = true;
                Some(Err(ScanError {
                    line: start_line,
                    message,
                }))
            }
        }
    }
}

fn newlines(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind<'_>> {
        Scanner::new(src).map(|t| t.unwrap().kind).collect()
    }

    fn comments(src: &str) -> Vec<&str> {
        kinds(src)
            .into_iter()
            .filter_map(|k| match k {
                TokenKind::Comment(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn scans_package_clause() {
        assert_eq!(
            kinds("package main\n"),
            vec![TokenKind::Ident("package"), TokenKind::Ident("main")]
        );
    }

    #[test]
    fn scans_line_and_block_comments() {
        let src = "// one\npackage p /* two */\n/*\nthree\n*/\n";
        assert_eq!(comments(src), vec!["// one", "/* two */", "/*\nthree\n*/"]);
    }

    #[test]
    fn block_comment_closes_on_star_run() {
        assert_eq!(
            comments("/** doc **/ package p /***/"),
            vec!["/** doc **/", "/***/"]
        );
    }

    #[test]
    fn slash_star_slash_is_not_a_closed_comment() {
        let err = Scanner::new("package p /*/ x").find_map(Result::err).unwrap();
        assert_eq!(err.message, "comment not terminated");
    }

    #[test]
    fn division_is_not_a_comment() {
        assert_eq!(
            kinds("a / b"),
            vec![TokenKind::Ident("a"), TokenKind::Other, TokenKind::Ident("b")]
        );
    }

    #[test]
    fn trailing_newlines_count_towards_final_line() {
        let mut scanner = Scanner::new("package p\n\n\n");
        assert!(scanner.by_ref().all(|t| t.is_ok()));
        assert_eq!(scanner.line(), 4);
    }

    #[test]
    fn tracks_lines_across_block_comments() {
        let tokens: Vec<Token<'_>> = Scanner::new("package p\n/* a\nb\nc */ x\ny")
            .map(Result::unwrap)
            .collect();
        let block = tokens[2];
        assert_eq!((block.start_line, block.end_line), (2, 4));
        assert_eq!(tokens[3].start_line, 4);
        assert_eq!(tokens[4].start_line, 5);
    }

    #[test]
    fn comment_markers_inside_literals_are_ignored() {
        let src = "package p\nvar a = \"// no\"\nvar b = `/* no\n*/`\nvar c = '/'\nvar d = \"\\\"//\"\n";
        assert!(comments(src).is_empty());
    }

    #[test]
    fn raw_string_advances_lines() {
        let tokens: Vec<Token<'_>> = Scanner::new("x = `a\nb\nc` // tail")
            .map(Result::unwrap)
            .collect();
        let tail = tokens.last().unwrap();
        assert_eq!(tail.kind, TokenKind::Comment("// tail"));
        assert_eq!(tail.start_line, 3);
    }

    #[test]
    fn byte_order_mark_is_skipped() {
        assert_eq!(
            kinds("\u{feff}package p"),
            vec![TokenKind::Ident("package"), TokenKind::Ident("p")]
        );
    }

    #[test]
    fn unicode_identifiers_stay_whole() {
        assert_eq!(
            kinds("package café"),
            vec![TokenKind::Ident("package"), TokenKind::Ident("café")]
        );
    }

    #[test]
    fn unterminated_block_comment_fails() {
        let err = Scanner::new("package p\n\n/* open")
            .find_map(Result::err)
            .unwrap();
        assert_eq!(err.line, 3);
        assert_eq!(err.message, "comment not terminated");
    }

    #[test]
    fn unterminated_string_fails_at_newline() {
        let err = Scanner::new("x := \"abc\ny := 1")
            .find_map(Result::err)
            .unwrap();
        assert_eq!(err.line, 1);
        assert_eq!(err.message, "string literal not terminated");
    }

    #[test]
    fn unterminated_raw_string_fails() {
        let err = Scanner::new("x := `abc").find_map(Result::err).unwrap();
        assert_eq!(err.message, "raw string literal not terminated");
    }

    #[test]
    fn scanner_stops_after_error() {
        let mut scanner = Scanner::new("'a");
        assert!(scanner.next().unwrap().is_err());
        assert!(scanner.next().is_none());
    }
}
