//! Translation block location
//!
//! Finds the first `const <identifier> = { ... };` declaration in a source
//! file that is live code. Matches inside comments and string literals are
//! skipped. The closing brace is found by counting brace depth while skipping
//! strings and comments, so a `};` sequence inside a translated string never
//! ends the block early.

use crate::error::{Error, Result};
use crate::lexer::{self, PieceKind, Pieces, is_ident_char};

/// Declaration keywords accepted in front of the identifier
const KEYWORDS: [&str; 3] = ["const", "let", "var"];

/// Location of a translation block inside a source text
///
/// All offsets are byte offsets into the text the span was located in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    /// Start of the declaration keyword
    pub start: usize,
    /// End of the declaration (after `;`, or after `}` when there is none)
    pub end: usize,
    /// First byte after the opening `{`
    pub body_start: usize,
    /// Offset of the matching closing `}`
    pub body_end: usize,
}

impl BlockSpan {
    /// Raw text between the braces
    pub fn body<'a>(&self, text: &'a str) -> &'a str {
        &text[self.body_start..self.body_end]
    }

    /// The whole declaration, keyword through terminator
    pub fn declaration<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    /// `const i18n = {`
    pub fn header<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.body_start]
    }

    /// `}` or `};`
    pub fn trailer<'a>(&self, text: &'a str) -> &'a str {
        &text[self.body_end..self.end]
    }

    /// Whether the declaration ends with a semicolon
    pub fn has_semicolon(&self, text: &str) -> bool {
        self.trailer(text).ends_with(';')
    }
}

/// Locate the first translation block declared as `identifier`.
///
/// # Errors
/// [`Error::BlockNotFound`] if no declaration exists,
/// [`Error::UnterminatedBlock`] if its braces never balance.
pub fn locate_block(text: &str, identifier: &str) -> Result<BlockSpan> {
    let Some((start, open)) = find_declaration(text, identifier) else {
        return Err(Error::BlockNotFound {
            identifier: identifier.to_string(),
        });
    };

    let bytes = text.as_bytes();
    let close = lexer::matching_close(bytes, open).map_err(|_| Error::UnterminatedBlock {
        identifier: identifier.to_string(),
        line: lexer::line_col(text, start).0,
    })?;

    let after = close + 1;
    let gap = bytes[after..]
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .count();
    let end = if bytes.get(after + gap) == Some(&b';') {
        after + gap + 1
    } else {
        after
    };

    tracing::debug!(
        "Located `{}` block at bytes {}..{} ({} body bytes)",
        identifier,
        start,
        end,
        close - open - 1
    );

    Ok(BlockSpan {
        start,
        end,
        body_start: open + 1,
        body_end: close,
    })
}

/// Returns (keyword offset, opening brace offset) of the first declaration.
///
/// Candidates inside comments and strings are skipped. The lexer does not
/// know regex literals, so when it finds nothing the search falls back to
/// plain text, rejecting only candidates that sit in a comment.
fn find_declaration(text: &str, identifier: &str) -> Option<(usize, usize)> {
    if identifier.is_empty() {
        return None;
    }
    let inert = inert_ranges(text);
    let candidates = move || {
        text.match_indices(identifier)
            .filter_map(move |(pos, _)| match_declaration_at(text, pos, identifier))
    };

    candidates()
        .find(|&(start, _)| !is_inert(&inert, start))
        .or_else(|| candidates().find(|&(start, _)| !is_commented_out(text, start)))
}

/// Byte ranges of comments and string literals, in source order.
///
/// Scanning stops at an unterminated literal; whatever follows it is
/// treated as code.
fn inert_ranges(text: &str) -> Vec<(usize, usize)> {
    Pieces::new(text.as_bytes(), 0)
        .map_while(|piece| piece.ok())
        .filter(|piece| matches!(piece.kind, PieceKind::Str | PieceKind::Comment))
        .map(|piece| (piece.start, piece.end))
        .collect()
}

fn is_inert(ranges: &[(usize, usize)], offset: usize) -> bool {
    let idx = ranges.partition_point(|&(_, end)| end <= offset);
    ranges.get(idx).is_some_and(|&(start, _)| start <= offset)
}

/// Whether `offset` sits after `//` on its line or inside an unclosed `/*`
fn is_commented_out(text: &str, offset: usize) -> bool {
    let line_start = text[..offset].rfind('\n').map_or(0, |n| n + 1);
    if text[line_start..offset].contains("//") {
        return true;
    }
    let before = &text[..offset];
    before.rfind("/*") > before.rfind("*/")
}

fn match_declaration_at(text: &str, pos: usize, identifier: &str) -> Option<(usize, usize)> {
    let after_ident = pos + identifier.len();
    if text[after_ident..].chars().next().is_some_and(is_ident_char) {
        return None;
    }

    // Backwards: whitespace, then a keyword on an identifier boundary
    let before = &text[..pos];
    let trimmed = before.trim_end();
    if trimmed.len() == before.len() {
        return None;
    }
    let keyword = KEYWORDS.iter().find(|kw| trimmed.ends_with(**kw))?;
    let start = trimmed.len() - keyword.len();
    if text[..start].chars().next_back().is_some_and(is_ident_char) {
        return None;
    }

    // Forwards: `=` (not `==` / `=>`), then `{`
    let rest = &text[after_ident..];
    let eq = rest.len() - rest.trim_start().len();
    let rest = rest.trim_start().strip_prefix('=')?;
    if rest.starts_with('=') || rest.starts_with('>') {
        return None;
    }
    let ws = rest.len() - rest.trim_start().len();
    if !rest.trim_start().starts_with('{') {
        return None;
    }
    let open = after_ident + eq + 1 + ws;
    Some((start, open))
}

/// Leading whitespace of the line containing `offset`.
pub fn line_indent(text: &str, offset: usize) -> &str {
    let line_start = text[..offset].rfind('\n').map_or(0, |n| n + 1);
    let line = &text[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_locate_simple_block() {
        let text = "const a = 1;\nconst i18n = {\n  hello: 'Hello',\n};\nfoo();\n";
        let span = locate_block(text, "i18n").unwrap();
        assert_eq!(span.declaration(text), "const i18n = {\n  hello: 'Hello',\n};");
        assert_eq!(span.body(text), "\n  hello: 'Hello',\n");
        assert_eq!(span.header(text), "const i18n = {");
        assert!(span.has_semicolon(text));
    }

    #[test]
    fn test_close_inside_string_does_not_end_block() {
        let text = "const i18n = {\n  \"a\": \"x };\n y\",\n  \"b\": 'c',\n};\n";
        let span = locate_block(text, "i18n").unwrap();
        assert!(span.body(text).contains("\"b\": 'c'"));
        assert_eq!(&text[span.end..], "\n");
    }

    #[test]
    fn test_nested_braces() {
        let text = "let i18n={a:{b:'}'},c:[1,2]}\nnext";
        let span = locate_block(text, "i18n").unwrap();
        assert_eq!(span.body(text), "a:{b:'}'},c:[1,2]");
        assert!(!span.has_semicolon(text));
        assert_eq!(&text[span.end..], "\nnext");
    }

    #[test]
    fn test_identifier_boundaries() {
        let text = "const i18nExtra = { a: 1 };\nconst my_i18n = { b: 2 };\nvar i18n = { c: 3 };";
        let span = locate_block(text, "i18n").unwrap();
        assert_eq!(span.body(text), " c: 3 ");
    }

    #[test]
    fn test_commented_out_declaration_skipped() {
        let text = "// const i18n = { old: 1 };\nconst i18n = { new: 2 };";
        let span = locate_block(text, "i18n").unwrap();
        assert_eq!(span.body(text), " new: 2 ");
    }

    #[test]
    fn test_declaration_inside_block_comment_skipped() {
        let text = "/*\n  old: const i18n = { a: 'A' };\n*/\nconst i18n = { b: 'B' };\n";
        let span = locate_block(text, "i18n").unwrap();
        assert_eq!(span.body(text), " b: 'B' ");
        assert_eq!(span.start, text.rfind("const").unwrap());
    }

    #[test]
    fn test_declaration_inside_string_skipped() {
        let text = "log(\"x const i18n = {\");\nconst i18n = { a: 'A' };";
        let span = locate_block(text, "i18n").unwrap();
        assert_eq!(span.body(text), " a: 'A' ");
    }

    #[test]
    fn test_regex_quote_does_not_hide_declaration() {
        let text = "const re = /\"/;\nconst i18n = { a: \"A\" };\n";
        let span = locate_block(text, "i18n").unwrap();
        assert_eq!(span.body(text), " a: \"A\" ");
    }

    #[test]
    fn test_only_commented_declarations_is_not_found() {
        let text = "/* const i18n = { a: 1 }; */\n// let i18n = {};\nfoo(); // var i18n = {}\n";
        assert!(matches!(
            locate_block(text, "i18n"),
            Err(Error::BlockNotFound { .. })
        ));
    }

    #[test]
    fn test_comparison_is_not_a_declaration() {
        let text = "if (const i18n == {}) {}";
        assert!(matches!(
            locate_block(text, "i18n"),
            Err(Error::BlockNotFound { .. })
        ));
    }

    #[test]
    fn test_block_not_found() {
        let err = locate_block("const other = {};", "i18n").unwrap_err();
        assert!(matches!(err, Error::BlockNotFound { ref identifier } if identifier == "i18n"));
    }

    #[test]
    fn test_unterminated_block() {
        let text = "\n\nconst i18n = {\n  a: 'b',\n";
        let err = locate_block(text, "i18n").unwrap_err();
        assert!(matches!(err, Error::UnterminatedBlock { line: 3, .. }));
    }

    #[test]
    fn test_semicolon_after_spaces() {
        let text = "const i18n = {} ;x";
        let span = locate_block(text, "i18n").unwrap();
        assert_eq!(span.trailer(text), "} ;");
    }

    #[test]
    fn test_line_indent() {
        let text = "function f() {\n    const i18n = {};\n}";
        let span = locate_block(text, "i18n").unwrap();
        assert_eq!(line_indent(text, span.start), "    ");
        assert_eq!(line_indent("\texport const i18n = {}", 8), "\t");
        assert_eq!(line_indent("const i18n = {}", 0), "");
    }
}
