//! Translation merge
//!
//! Adds the entries of an overlay table that are missing from a base file's
//! translation block, splicing them into the base text so that everything
//! outside the new lines is left byte-for-byte unchanged.
//!
//! # Example
//!
//! ```
//! use litmerge::merge::merge_sources;
//!
//! let base = "const i18n = {\n    \"hello\": \"Hello\",\n};\n";
//! let overlay = "const i18n = { hello: 'Hi', bye: 'Bye' };";
//!
//! let merged = merge_sources(base, overlay, "i18n")?;
//! assert_eq!(
//!     merged.text,
//!     "const i18n = {\n    \"hello\": \"Hello\",\n    \"bye\": \"Bye\",\n};\n"
//! );
//! # Ok::<(), litmerge::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::DEFAULT_IDENTIFIER;
use crate::block::{BlockSpan, line_indent, locate_block};
use crate::error::{Error, Result};
use crate::lexer::last_significant;
use crate::table::TranslationTable;

/// Extra indentation of new entries relative to the declaration line
const ENTRY_INDENT: &str = "    ";

/// Options for merge operations
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Name of the translation table variable
    pub identifier: String,
    /// Compute the merge but leave the base file untouched
    pub dry_run: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            identifier: DEFAULT_IDENTIFIER.to_string(),
            dry_run: false,
        }
    }
}

impl MergeOptions {
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of merging two files
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The base file that received the entries
    pub base: PathBuf,
    /// Overlay entries that were missing from the base, in overlay order
    pub added: Vec<(String, Value)>,
    /// Whether the base file was rewritten
    pub written: bool,
}

impl MergeOutcome {
    pub fn added_keys(&self) -> impl Iterator<Item = &str> {
        self.added.iter().map(|(key, _)| key.as_str())
    }

    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty()
    }
}

/// Result of merging two in-memory sources
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSource {
    /// The base text with new entries spliced in (identical to the input
    /// when nothing was added)
    pub text: String,
    /// Overlay entries that were missing from the base
    pub added: Vec<(String, Value)>,
}

/// A located and parsed translation block
#[derive(Debug, Clone)]
struct ParsedBlock {
    span: BlockSpan,
    table: TranslationTable,
}

impl ParsedBlock {
    fn parse(text: &str, identifier: &str) -> Result<Self> {
        let span = locate_block(text, identifier)?;
        let table = TranslationTable::from_body(span.body(text))?;
        Ok(Self { span, table })
    }
}

/// Merge the overlay file's missing entries into the base file, in place.
///
/// The base file is written at most once, after the new text has been fully
/// built, and not at all when the overlay adds nothing.
///
/// # Errors
/// IO, block-location and parse errors, each tagged with the failing file.
pub fn merge_files<P: AsRef<Path>, Q: AsRef<Path>>(
    base: P,
    overlay: Q,
    options: &MergeOptions,
) -> Result<MergeOutcome> {
    let base = base.as_ref();
    let overlay = overlay.as_ref();

    let base_text = fs::read_to_string(base).map_err(|e| Error::from(e).in_file(base))?;
    let overlay_text = fs::read_to_string(overlay).map_err(|e| Error::from(e).in_file(overlay))?;

    let base_block =
        ParsedBlock::parse(&base_text, &options.identifier).map_err(|e| e.in_file(base))?;
    let overlay_table = TranslationTable::from_source(&overlay_text, &options.identifier)
        .map_err(|e| e.in_file(overlay))?;

    tracing::debug!(
        "Base {:?} has {} entries, overlay {:?} has {} entries",
        base,
        base_block.table.len(),
        overlay,
        overlay_table.len()
    );

    let merged = merge_parsed(&base_text, &base_block, &overlay_table)?;

    if merged.added.is_empty() {
        tracing::info!("No missing translations in {:?}", base);
        return Ok(MergeOutcome {
            base: base.to_path_buf(),
            added: merged.added,
            written: false,
        });
    }

    let written = if options.dry_run {
        tracing::info!(
            "Dry run: {} missing translations would be added to {:?}",
            merged.added.len(),
            base
        );
        false
    } else {
        fs::write(base, &merged.text).map_err(|e| Error::from(e).in_file(base))?;
        tracing::info!("Added {} translations to {:?}", merged.added.len(), base);
        true
    };

    Ok(MergeOutcome {
        base: base.to_path_buf(),
        added: merged.added,
        written,
    })
}

/// Merge two in-memory sources.
pub fn merge_sources(base_text: &str, overlay_text: &str, identifier: &str) -> Result<MergedSource> {
    let base_block = ParsedBlock::parse(base_text, identifier)?;
    let overlay_table = TranslationTable::from_source(overlay_text, identifier)?;
    merge_parsed(base_text, &base_block, &overlay_table)
}

fn merge_parsed(
    base_text: &str,
    base_block: &ParsedBlock,
    overlay: &TranslationTable,
) -> Result<MergedSource> {
    let added = overlay.missing_from(&base_block.table);
    if added.is_empty() {
        return Ok(MergedSource {
            text: base_text.to_string(),
            added,
        });
    }
    let text = splice_entries(base_text, &base_block.span, &added)?;
    Ok(MergedSource { text, added })
}

/// Rebuild the declaration with `entries` appended to its body.
fn splice_entries(text: &str, span: &BlockSpan, entries: &[(String, Value)]) -> Result<String> {
    let indent = line_indent(text, span.start);
    let entry_indent = format!("{indent}{ENTRY_INDENT}");

    let lines = entries
        .iter()
        .map(|(key, value)| -> Result<String> {
            Ok(format!(
                "{entry_indent}{}: {},",
                serde_json::to_string(key)?,
                serde_json::to_string(value)?
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut body = span.body(text).trim_end().to_string();
    // Keep the literal valid when the last entry has no trailing comma
    if let Some((pos, last)) = last_significant(&body)
        && last != b','
    {
        body.insert(pos + 1, ',');
    }
    body.push('\n');
    body.push_str(&lines.join("\n"));
    body.push('\n');
    body.push_str(indent);

    let mut out = String::with_capacity(text.len() + body.len());
    out.push_str(&text[..span.start]);
    out.push_str(span.header(text));
    out.push_str(&body);
    out.push_str(span.trailer(text));
    out.push_str(&text[span.end..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const BASE: &str = "window.x = 1;\n\
                        const i18n = {\n\
                        \x20   \"Settings\": \"设置\",\n\
                        \x20   \"Close\": \"关闭\",\n\
                        };\n\
                        module.exports = i18n;\n";

    #[test]
    fn test_merge_adds_missing_in_overlay_order() {
        let overlay = "const i18n = { Close: 'X', Zoom: '缩放', About: '关于' };";
        let merged = merge_sources(BASE, overlay, "i18n").unwrap();

        assert_eq!(
            merged.text,
            "window.x = 1;\n\
             const i18n = {\n\
             \x20   \"Settings\": \"设置\",\n\
             \x20   \"Close\": \"关闭\",\n\
             \x20   \"Zoom\": \"缩放\",\n\
             \x20   \"About\": \"关于\",\n\
             };\n\
             module.exports = i18n;\n"
        );
        let keys: Vec<_> = merged.added.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Zoom", "About"]);
    }

    #[test]
    fn test_integer_like_keys_keep_source_order() {
        let base = "const i18n = { x: 'X' };";
        let overlay = "const i18n = { b: 'B', 2: 'two', a: 'A', '1': 'one' };";
        let merged = merge_sources(base, overlay, "i18n").unwrap();

        let added: Vec<&str> = merged.added.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(added, vec!["b", "2", "a", "1"]);
    }

    #[test]
    fn test_merge_noop_returns_identical_text() {
        let overlay = "const i18n = { Close: 'X' };";
        let merged = merge_sources(BASE, overlay, "i18n").unwrap();
        assert!(merged.added.is_empty());
        assert_eq!(merged.text, BASE);
    }

    #[test]
    fn test_base_wins_and_comma_inserted() {
        let base = "const i18n = {\"hello\": \"Hello\"};";
        let overlay = "const i18n = {\"hello\": \"Hi\", \"bye\": \"Bye\"};";
        let merged = merge_sources(base, overlay, "i18n").unwrap();

        let table = TranslationTable::from_source(&merged.text, "i18n").unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["hello", "bye"]);
        assert_eq!(table.get_str("hello"), Some("Hello"));
        assert_eq!(table.get_str("bye"), Some("Bye"));
    }

    #[test]
    fn test_indentation_follows_declaration() {
        let base = "(() => {\n  const i18n = {\n    a: 'A',\n  };\n})();\n";
        let overlay = "const i18n = { b: 'B' };";
        let merged = merge_sources(base, overlay, "i18n").unwrap();
        assert_eq!(
            merged.text,
            "(() => {\n  const i18n = {\n    a: 'A',\n      \"b\": \"B\",\n  };\n})();\n"
        );
    }

    #[test]
    fn test_trailing_comment_gets_comma_before_it() {
        let base = "const i18n = {\n    a: 'A' // last\n};";
        let overlay = "const i18n = { b: 'B' };";
        let merged = merge_sources(base, overlay, "i18n").unwrap();
        assert_eq!(
            merged.text,
            "const i18n = {\n    a: 'A', // last\n    \"b\": \"B\",\n};"
        );
    }

    #[test]
    fn test_escaping_matches_json() {
        let base = "const i18n = {};";
        let overlay = "const i18n = { 'say \"hi\"': 'line\\nbreak\\ttab \\\\ \\u0001' };";
        let merged = merge_sources(base, overlay, "i18n").unwrap();
        assert!(merged
            .text
            .contains(r#""say \"hi\"": "line\nbreak\ttab \\ \u0001","#));

        let table = TranslationTable::from_source(&merged.text, "i18n").unwrap();
        assert_eq!(
            table.get_str("say \"hi\""),
            Some("line\nbreak\ttab \\ \u{1}")
        );
    }

    #[test]
    fn test_empty_base_block() {
        let merged = merge_sources("const i18n = {};", "const i18n = { a: 'A' };", "i18n").unwrap();
        assert_eq!(merged.text, "const i18n = {\n    \"a\": \"A\",\n};");
    }

    #[test]
    fn test_missing_semicolon_preserved() {
        let merged = merge_sources("let i18n = {}\nrun()", "const i18n = { a: 'A' }", "i18n").unwrap();
        assert_eq!(merged.text, "let i18n = {\n    \"a\": \"A\",\n}\nrun()");
    }

    #[test]
    fn test_merge_files_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("preload.js");
        let overlay = temp.path().join("overlay.js");
        std::fs::write(&base, BASE).unwrap();
        std::fs::write(&overlay, "const i18n = { Zoom: '缩放', \"Quote\": \"\\\"q\\\"\" };").unwrap();

        let first = merge_files(&base, &overlay, &MergeOptions::default()).unwrap();
        assert!(first.written);
        assert_eq!(first.added_keys().collect::<Vec<_>>(), vec!["Zoom", "Quote"]);
        let after_first = std::fs::read_to_string(&base).unwrap();

        let second = merge_files(&base, &overlay, &MergeOptions::default()).unwrap();
        assert!(!second.written);
        assert!(second.is_unchanged());
        assert_eq!(std::fs::read_to_string(&base).unwrap(), after_first);

        let table = TranslationTable::from_source(&after_first, "i18n").unwrap();
        assert_eq!(table.get_str("Quote"), Some("\"q\""));
    }

    #[test]
    fn test_dry_run_leaves_file() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("preload.js");
        let overlay = temp.path().join("overlay.js");
        std::fs::write(&base, BASE).unwrap();
        std::fs::write(&overlay, "const i18n = { New: 'N' };").unwrap();

        let outcome =
            merge_files(&base, &overlay, &MergeOptions::default().with_dry_run(true)).unwrap();
        assert!(!outcome.written);
        assert_eq!(outcome.added.len(), 1);
        assert_eq!(std::fs::read_to_string(&base).unwrap(), BASE);
    }

    #[test]
    fn test_errors_name_the_failing_file() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("preload.js");
        let overlay = temp.path().join("overlay.js");
        std::fs::write(&base, BASE).unwrap();
        std::fs::write(&overlay, "const strings = {};").unwrap();

        let err = merge_files(&base, &overlay, &MergeOptions::default()).unwrap_err();
        match &err {
            Error::InFile { path, .. } => assert_eq!(path, &overlay),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(err.root(), Error::BlockNotFound { .. }));
        assert!(err.to_string().contains("overlay.js"));
    }

    #[test]
    fn test_custom_identifier() {
        let base = "const strings = { a: 'A' };";
        let overlay = "var strings = { b: 'B' };";
        let merged = merge_sources(base, overlay, "strings").unwrap();
        assert_eq!(merged.added.len(), 1);
    }
}
