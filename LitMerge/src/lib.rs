//! # LitMerge
//!
//! A pure-Rust library for JavaScript translation tables written as
//! object-literal declarations, such as the `const i18n = { ... };` table
//! bundled in an Electron preload script.
//!
//! ## Components
//!
//! - **block** - Locate a `const <name> = { ... };` declaration and its body
//! - **literal** - Parse an object-literal body without evaluating code
//! - **table** - Ordered key/value translation tables
//! - **merge** - Add overlay keys missing from a base file, in place
//!
//! ## Quick Start
//!
//! ```no_run
//! use litmerge::merge::{merge_files, MergeOptions};
//!
//! let outcome = merge_files("dist/preload.js", "preload.js", &MergeOptions::default())?;
//! println!("Added {} entries", outcome.added.len());
//! # Ok::<(), litmerge::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use litmerge::prelude::*;
//!
//! let table = TranslationTable::from_source("const i18n = { hello: 'Hi' };", "i18n")?;
//! assert_eq!(table.get_str("hello"), Some("Hi"));
//! # Ok::<(), litmerge::Error>(())
//! ```

pub mod block;
pub mod error;
pub mod literal;
pub mod merge;
pub mod table;

mod lexer;

// Re-exports for convenience
pub use error::{Error, Result};

/// Identifier of the translation table in Electron preload scripts.
pub const DEFAULT_IDENTIFIER: &str = "i18n";

/// Prelude module for common imports
pub mod prelude {
    pub use crate::block::{BlockSpan, line_indent, locate_block};
    pub use crate::error::{Error, Result};
    pub use crate::literal::{parse_object_body, parse_value};
    pub use crate::merge::{
        MergeOptions, MergeOutcome, MergedSource, merge_files, merge_sources,
    };
    pub use crate::table::TranslationTable;
    pub use crate::DEFAULT_IDENTIFIER;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
