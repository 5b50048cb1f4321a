//! Byte-level scanning of JavaScript source
//!
//! Splits source text into code bytes, whitespace, string literals and
//! comments. Only ASCII delimiters are ever compared, so multi-byte UTF-8
//! sequences pass through as plain code bytes and every reported offset is a
//! valid `str` slice boundary.

/// Kind of a scanned piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PieceKind {
    /// A single byte of code (punctuation, identifier byte, digit, ...)
    Code,
    /// A run of whitespace
    Space,
    /// A complete string or template literal, quotes included
    Str,
    /// A line or block comment
    Comment,
}

/// One scanned piece: `bytes[start..end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Piece {
    pub kind: PieceKind,
    pub start: usize,
    pub end: usize,
}

impl Piece {
    /// First byte of the piece
    pub fn first(&self, bytes: &[u8]) -> u8 {
        bytes[self.start]
    }
}

/// A string, template or block comment that runs past the end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unterminated {
    pub start: usize,
}

/// Iterator over the pieces of `bytes[pos..]`
pub(crate) struct Pieces<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Pieces<'a> {
    pub fn new(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }
}

impl Iterator for Pieces<'_> {
    type Item = Result<Piece, Unterminated>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.bytes;
        let start = self.pos;
        let b = *bytes.get(start)?;

        let scanned = match b {
            b'"' | b'\'' => skip_quoted(bytes, start).map(|end| (PieceKind::Str, end)),
            b'`' => skip_template(bytes, start).map(|end| (PieceKind::Str, end)),
            b'/' if bytes.get(start + 1) == Some(&b'/') => {
                let end = bytes[start..]
                    .iter()
                    .position(|&c| c == b'\n')
                    .map_or(bytes.len(), |n| start + n);
                Ok((PieceKind::Comment, end))
            }
            b'/' if bytes.get(start + 1) == Some(&b'*') => {
                skip_block_comment(bytes, start).map(|end| (PieceKind::Comment, end))
            }
            c if c.is_ascii_whitespace() => {
                let end = bytes[start..]
                    .iter()
                    .position(|c| !c.is_ascii_whitespace())
                    .map_or(bytes.len(), |n| start + n);
                Ok((PieceKind::Space, end))
            }
            _ => Ok((PieceKind::Code, start + 1)),
        };

        match scanned {
            Ok((kind, end)) => {
                self.pos = end;
                Some(Ok(Piece { kind, start, end }))
            }
            Err(e) => {
                // Nothing sensible follows an unterminated literal
                self.pos = bytes.len();
                Some(Err(e))
            }
        }
    }
}

/// Skip a `'...'` or `"..."` literal starting at `start`; returns the offset
/// just past the closing quote.
fn skip_quoted(bytes: &[u8], start: usize) -> Result<usize, Unterminated> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            c if c == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(Unterminated { start })
}

/// Skip a template literal, including nested `${ ... }` substitutions.
fn skip_template(bytes: &[u8], start: usize) -> Result<usize, Unterminated> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return Ok(i + 1),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i = matching_close(bytes, i + 1)? + 1;
            }
            _ => i += 1,
        }
    }
    Err(Unterminated { start })
}

fn skip_block_comment(bytes: &[u8], start: usize) -> Result<usize, Unterminated> {
    let body = start + 2;
    bytes
        .get(body..)
        .and_then(|rest| rest.windows(2).position(|w| w == b"*/"))
        .map(|n| body + n + 2)
        .ok_or(Unterminated { start })
}

/// Find the `}` or `]` that closes the bracket at `open`.
///
/// Brackets inside strings and comments are ignored. Returns the offset of
/// the closing byte.
pub(crate) fn matching_close(bytes: &[u8], open: usize) -> Result<usize, Unterminated> {
    let mut depth = 0usize;
    for piece in Pieces::new(bytes, open) {
        let piece = piece?;
        if piece.kind != PieceKind::Code {
            continue;
        }
        match piece.first(bytes) {
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(piece.start);
                }
            }
            _ => {}
        }
    }
    Err(Unterminated { start: open })
}

/// Offset and first byte of the last piece that is neither whitespace nor a
/// comment. For a string piece the offset is its closing quote.
pub(crate) fn last_significant(src: &str) -> Option<(usize, u8)> {
    let bytes = src.as_bytes();
    let mut last = None;
    for piece in Pieces::new(bytes, 0) {
        let Ok(piece) = piece else { break };
        match piece.kind {
            PieceKind::Code => last = Some((piece.start, piece.first(bytes))),
            PieceKind::Str => last = Some((piece.end - 1, bytes[piece.end - 1])),
            PieceKind::Space | PieceKind::Comment => {}
        }
    }
    last
}

/// Whether `c` may continue a JavaScript identifier
pub(crate) fn is_ident_char(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

/// Whether `c` may start a JavaScript identifier
pub(crate) fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

/// 1-based (line, column) of a byte offset
pub(crate) fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let before = &src[..offset.min(src.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
        + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<PieceKind> {
        Pieces::new(src.as_bytes(), 0)
            .map(|p| p.unwrap().kind)
            .collect()
    }

    #[test]
    fn test_pieces_split_strings_and_comments() {
        assert_eq!(
            kinds("a 'b' // c\n/* d */"),
            vec![
                PieceKind::Code,
                PieceKind::Space,
                PieceKind::Str,
                PieceKind::Space,
                PieceKind::Comment,
                PieceKind::Space,
                PieceKind::Comment,
            ]
        );
    }

    #[test]
    fn test_matching_close_ignores_strings() {
        let src = r#"{ "a": "};", b: '}', c: [1, {}] } tail"#;
        let close = matching_close(src.as_bytes(), 0).unwrap();
        assert_eq!(&src[close..], "} tail");
    }

    #[test]
    fn test_matching_close_template_substitution() {
        let src = "{ a: `x ${ {y: 1}.y } z` }";
        let close = matching_close(src.as_bytes(), 0).unwrap();
        assert_eq!(close, src.len() - 1);
    }

    #[test]
    fn test_unterminated_string() {
        let src = "{ a: 'oops }";
        assert!(matching_close(src.as_bytes(), 0).is_err());
    }

    #[test]
    fn test_escaped_quote() {
        let src = r#"{ a: "say \"}\"" }"#;
        let close = matching_close(src.as_bytes(), 0).unwrap();
        assert_eq!(close, src.len() - 1);
    }

    #[test]
    fn test_last_significant_skips_comments() {
        let (pos, b) = last_significant("a: 'x' // trailing\n  ").unwrap();
        assert_eq!(b, b'\'');
        assert_eq!(pos, 5);
        assert_eq!(last_significant("  // only a comment\n"), None);
    }

    #[test]
    fn test_line_col() {
        assert_eq!(line_col("ab\ncd", 4), (2, 2));
        assert_eq!(line_col("ab", 0), (1, 1));
    }
}
