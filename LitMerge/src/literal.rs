//! Object-literal parser
//!
//! A small recursive-descent parser for the literal subset of JavaScript:
//! strings, numbers, booleans, `null`/`undefined`, arrays and objects, with
//! unquoted keys, trailing commas, mixed quoting and comments. Nothing is ever
//! evaluated; any non-literal syntax (calls, spreads, variables, template
//! substitutions) is rejected with a positioned error.

use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};
use crate::lexer::{is_ident_char, is_ident_start, line_col};

/// Maximum nesting of arrays/objects
const MAX_DEPTH: usize = 128;

/// Parse the members of an object literal body (the text between its braces).
///
/// ```
/// let map = litmerge::literal::parse_object_body("a: 'x', \"b\": \"y\",")?;
/// assert_eq!(map["a"], "x");
/// # Ok::<(), litmerge::Error>(())
/// ```
pub fn parse_object_body(body: &str) -> Result<Map<String, Value>> {
    let mut parser = Parser::new(body);
    let members = parser.parse_members(None, 0)?;
    parser.skip_trivia()?;
    if parser.peek().is_some() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(members)
}

/// Parse a single literal value, surrounded by optional whitespace/comments.
pub fn parse_value(src: &str) -> Result<Value> {
    let mut parser = Parser::new(src);
    parser.skip_trivia()?;
    let value = parser.parse_value(0)?;
    parser.skip_trivia()?;
    if parser.peek().is_some() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> Error {
        let (line, column) = line_col(self.src, pos);
        Error::MalformedBlock {
            line,
            column,
            message: message.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn expect(&mut self, want: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected `{want}`, found `{c}`"))),
            None => Err(self.error(format!("expected `{want}`, found end of input"))),
        }
    }

    /// Skip whitespace and comments
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if trimmed.starts_with("//") {
                self.pos += trimmed.find('\n').unwrap_or(trimmed.len());
            } else if trimmed.starts_with("/*") {
                let Some(end) = trimmed[2..].find("*/") else {
                    return Err(self.error("unterminated block comment"));
                };
                self.pos += end + 4;
            } else {
                return Ok(());
            }
        }
    }

    /// Parse `key: value` pairs until `close` (or end of input when `None`).
    fn parse_members(&mut self, close: Option<char>, depth: usize) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == close {
                return Ok(map);
            }
            if self.peek().is_none() {
                return Err(self.error("unexpected end of input inside object"));
            }

            let key = self.parse_key()?;
            self.skip_trivia()?;
            self.expect(':')?;
            self.skip_trivia()?;
            let value = self.parse_value(depth + 1)?;
            map.insert(key, value);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                c if c == close => return Ok(map),
                Some(c) => return Err(self.error(format!("expected `,` or end of object, found `{c}`"))),
                None => return Err(self.error("unexpected end of input inside object")),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String> {
        match self.peek() {
            Some(q @ ('"' | '\'')) => self.parse_string(q),
            Some('.') if self.peek_second() == Some('.') => {
                Err(self.error("spread elements are not allowed"))
            }
            Some(c) if c.is_ascii_digit() || c == '.' => {
                let start = self.pos;
                match self.parse_number()? {
                    Value::Number(n) => Ok(number_key(&n)),
                    _ => Err(self.error_at(start, "invalid numeric key")),
                }
            }
            Some(c) if is_ident_start(c) => Ok(self.parse_identifier().to_string()),
            Some('[') => Err(self.error("computed keys are not allowed")),
            Some(c) => Err(self.error(format!("expected a property key, found `{c}`"))),
            None => Err(self.error("expected a property key, found end of input")),
        }
    }

    fn parse_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(self.error("literal nested too deeply"));
        }
        match self.peek() {
            Some('{') => {
                self.bump();
                let map = self.parse_members(Some('}'), depth)?;
                self.expect('}')?;
                Ok(Value::Object(map))
            }
            Some('[') => {
                self.bump();
                self.parse_array(depth)
            }
            Some(q @ ('"' | '\'')) => self.parse_string(q).map(Value::String),
            Some('`') => self.parse_template().map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                if c == '.' && self.peek_second() == Some('.') {
                    return Err(self.error("spread elements are not allowed"));
                }
                self.parse_number()
            }
            Some(c) if is_ident_start(c) => {
                let start = self.pos;
                match self.parse_identifier() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" | "undefined" => Ok(Value::Null),
                    "NaN" | "Infinity" => Err(self.error_at(start, "non-finite numbers are not allowed")),
                    other => Err(self.error_at(
                        start,
                        format!("unexpected identifier `{other}` (only literal values are allowed)"),
                    )),
                }
            }
            Some(c) => Err(self.error(format!("expected a value, found `{c}`"))),
            None => Err(self.error("expected a value, found end of input")),
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                // Elision: `[a, , b]`
                Some(',') => {
                    self.bump();
                    items.push(Value::Null);
                    continue;
                }
                None => return Err(self.error("unexpected end of input inside array")),
                _ => {}
            }

            items.push(self.parse_value(depth + 1)?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                Some(c) => return Err(self.error(format!("expected `,` or `]`, found `{c}`"))),
                None => return Err(self.error("unexpected end of input inside array")),
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n' | '\r') => {
                    return Err(self.error_at(start, "unterminated string literal"));
                }
                Some('\\') => self.parse_escape(&mut out)?,
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_template(&mut self) -> Result<String> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error_at(start, "unterminated template literal")),
                Some('`') => return Ok(out),
                Some('\\') => self.parse_escape(&mut out)?,
                Some('$') if self.peek() == Some('{') => {
                    return Err(self.error("template substitutions are not allowed"));
                }
                Some('\r') => {
                    if self.peek() == Some('\n') {
                        self.bump();
                    }
                    out.push('\n');
                }
                Some(c) => out.push(c),
            }
        }
    }

    /// Parse the escape sequence following a backslash
    fn parse_escape(&mut self, out: &mut String) -> Result<()> {
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated escape sequence"));
        };
        match c {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !self.peek().is_some_and(|d| d.is_ascii_digit()) => out.push('\0'),
            '0'..='9' => return Err(self.error("octal escape sequences are not allowed")),
            'x' => {
                let code = self.parse_hex_digits(2)?;
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'u' => {
                let code = self.parse_unicode_escape()?;
                out.push(self.combine_surrogates(code)?);
            }
            // Line continuation
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
        Ok(())
    }

    fn parse_hex_digits(&mut self, count: usize) -> Result<u32> {
        let rest = self.rest();
        let digits = rest.get(..count).filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()));
        let Some(digits) = digits else {
            return Err(self.error("invalid hexadecimal escape"));
        };
        self.pos += count;
        u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid hexadecimal escape"))
    }

    /// `XXXX` or `{X...}` after `\u`
    fn parse_unicode_escape(&mut self) -> Result<u32> {
        if self.peek() != Some('{') {
            return self.parse_hex_digits(4);
        }
        self.bump();
        let Some(len) = self.rest().find('}') else {
            return Err(self.error("unterminated unicode escape"));
        };
        let digits = &self.rest()[..len];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error("invalid unicode escape"));
        }
        let code = u32::from_str_radix(digits, 16)
            .ok()
            .filter(|&c| c <= 0x10_FFFF)
            .ok_or_else(|| self.error("unicode escape out of range"))?;
        self.pos += len + 1;
        Ok(code)
    }

    /// Join a `\uD8xx\uDCxx` pair; lone surrogates become U+FFFD.
    fn combine_surrogates(&mut self, code: u32) -> Result<char> {
        if (0xD800..0xDC00).contains(&code) && self.rest().starts_with("\\u") {
            let save = self.pos;
            self.pos += 2;
            let low = self.parse_unicode_escape()?;
            if (0xDC00..0xE000).contains(&low) {
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                return Ok(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            self.pos = save;
        }
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        let negative = match self.peek() {
            Some('-') => {
                self.bump();
                true
            }
            Some('+') => {
                self.bump();
                false
            }
            _ => false,
        };

        let radix = match (self.peek(), self.peek_second()) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        let value = if let Some(radix) = radix {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_digit(radix) || c == '_') {
                self.bump();
            }
            let digits = self.src[digits_start..self.pos].replace('_', "");
            let magnitude = u64::from_str_radix(&digits, radix)
                .map_err(|_| self.error_at(start, "invalid number literal"))?;
            signed_integer(magnitude, negative)
                .ok_or_else(|| self.error_at(start, "number literal out of range"))?
        } else {
            let digits_start = self.pos;
            let mut integral = true;
            while let Some(c) = self.peek() {
                match c {
                    '0'..='9' | '_' => {}
                    '.' => integral = false,
                    'e' | 'E' => {
                        integral = false;
                        if matches!(self.peek_second(), Some('+' | '-')) {
                            self.bump();
                        }
                    }
                    _ => break,
                }
                self.bump();
            }
            let text = self.src[digits_start..self.pos].replace('_', "");
            if text.is_empty() || text == "." {
                if self.rest().starts_with("Infinity") {
                    return Err(self.error_at(start, "non-finite numbers are not allowed"));
                }
                return Err(self.error_at(start, "invalid number literal"));
            }
            let exact = if integral {
                text.parse::<u64>().ok().and_then(|m| signed_integer(m, negative))
            } else {
                None
            };
            match exact {
                Some(v) => v,
                None => {
                    let float: f64 = text
                        .parse()
                        .map_err(|_| self.error_at(start, "invalid number literal"))?;
                    let float = if negative { -float } else { float };
                    Number::from_f64(float)
                        .map(Value::Number)
                        .ok_or_else(|| self.error_at(start, "non-finite numbers are not allowed"))?
                }
            }
        };

        if self.peek().is_some_and(is_ident_char) {
            return Err(self.error("identifier directly after number literal"));
        }
        Ok(value)
    }
}

fn signed_integer(magnitude: u64, negative: bool) -> Option<Value> {
    if negative {
        i64::try_from(magnitude)
            .ok()
            .map(|m| Value::from(-m))
            .or_else(|| (magnitude == 1 << 63).then(|| Value::from(i64::MIN)))
    } else {
        Some(Value::from(magnitude))
    }
}

/// Property name of a numeric key (`1` -> `"1"`, `0x10` -> `"16"`)
fn number_key(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    // f64 Display drops a zero fraction, like JavaScript: 2.0 -> "2"
    n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(src: &str) -> Value {
        Value::Object(parse_object_body(src).unwrap())
    }

    #[test]
    fn test_mixed_keys_and_quotes() {
        let value = object(r#" hello: 'Hello', "bye": "Bye", 'x-y': `z`, $id: 1, _k: true, "#);
        assert_eq!(
            value,
            json!({"hello": "Hello", "bye": "Bye", "x-y": "z", "$id": 1, "_k": true})
        );
    }

    #[test]
    fn test_preserves_order() {
        let map = parse_object_body("z: '1', a: '2', m: '3'").unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_duplicate_key_last_wins_first_position() {
        let map = parse_object_body("a: 1, b: 2, a: 3").unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map["a"], 3);
    }

    #[test]
    fn test_comments_and_trailing_commas() {
        let value = object(
            "\n  // greeting\n  hello: 'Hi', /* inline */\n  list: [1, 2, ],\n  nested: { a: null, },\n",
        );
        assert_eq!(
            value,
            json!({"hello": "Hi", "list": [1, 2], "nested": {"a": null}})
        );
    }

    #[test]
    fn test_string_escapes() {
        let value = parse_value(r#"'a\'b\"c\\d\n\t\x41B\u{1F600}😀\v\0'"#).unwrap();
        assert_eq!(value, json!("a'b\"c\\d\n\tAB😀😀\u{b}\0"));
    }

    #[test]
    fn test_line_continuation() {
        let value = parse_value("'abc\\\ndef'").unwrap();
        assert_eq!(value, json!("abcdef"));
    }

    #[test]
    fn test_unicode_passthrough() {
        let map = parse_object_body("\"Settings\": \"设置\", 关闭: '关闭'").unwrap();
        assert_eq!(map["Settings"], "设置");
        assert_eq!(map["关闭"], "关闭");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_value("42").unwrap(), json!(42));
        assert_eq!(parse_value("-7").unwrap(), json!(-7));
        assert_eq!(parse_value("+1.5e2").unwrap(), json!(150.0));
        assert_eq!(parse_value("0x1F").unwrap(), json!(31));
        assert_eq!(parse_value("0b101").unwrap(), json!(5));
        assert_eq!(parse_value("0o17").unwrap(), json!(15));
        assert_eq!(parse_value("1_000").unwrap(), json!(1000));
        assert_eq!(parse_value(".5").unwrap(), json!(0.5));
    }

    #[test]
    fn test_numeric_keys() {
        let map = parse_object_body("1: 'one', 0x10: 'sixteen'").unwrap();
        assert_eq!(map["1"], "one");
        assert_eq!(map["16"], "sixteen");
    }

    #[test]
    fn test_rejects_code() {
        for src in [
            "a: foo()",
            "a: window",
            "a: `x${y}`",
            "...other",
            "[k]: 'v'",
            "a: NaN",
            "a: -Infinity",
            "a: 'unterminated",
            "a: 'x' b: 'y'",
            "a 'x'",
            "a: 1n",
        ] {
            let err = parse_object_body(src).unwrap_err();
            assert!(
                matches!(err, Error::MalformedBlock { .. }),
                "expected MalformedBlock for {src:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_error_position() {
        let err = parse_object_body("a: 'x',\n  b: bogus,").unwrap_err();
        match err {
            Error::MalformedBlock { line, column, message } => {
                assert_eq!((line, column), (2, 6));
                assert!(message.contains("bogus"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_raw_newline_in_string_rejected() {
        assert!(parse_value("'a\nb'").is_err());
        assert_eq!(parse_value("`a\nb`").unwrap(), json!("a\nb"));
    }

    #[test]
    fn test_array_elision() {
        assert_eq!(parse_value("[1,,2]").unwrap(), json!([1, null, 2]));
    }

    #[test]
    fn test_empty_body() {
        assert!(parse_object_body("  \n // nothing\n").unwrap().is_empty());
    }

    #[test]
    fn test_depth_limit() {
        let src = format!("a: {}1{}", "[".repeat(200), "]".repeat(200));
        assert!(parse_object_body(&src).is_err());
    }
}
