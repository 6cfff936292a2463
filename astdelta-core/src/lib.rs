//! astdelta core - structural diffing for minified JavaScript.
//!
//! Two builds of the same program, once minified, differ textually on almost
//! every line even when nothing meaningful changed. This crate parses both
//! texts, walks the two syntax trees in lockstep and reports only differences
//! that survive a deliberate equivalence policy:
//!
//! - identifier names are ignored (minifiers rename freely);
//! - numeric, boolean, null and regex literal values are ignored;
//! - string literal content is compared;
//! - subtrees that merely moved are cancelled out.
//!
//! # Usage
//!
//! ```
//! use astdelta_core::diff_sources;
//!
//! let diff = diff_sources("let a=1;f(\"x\");", "let q=2;f(\"y\");", None).unwrap();
//! assert_eq!(diff.summary().removals, 1);
//! assert_eq!(diff.summary().additions, 1);
//! ```

pub mod differ;
pub mod error;
pub mod format;
pub mod report;
pub mod syntax;

pub use differ::{DiffSummary, Difference, DifferenceKind};
pub use error::{DeltaError, Result};
pub use format::{CommandFormatter, SourceFormatter};
pub use syntax::SyntaxNode;

use format::format_or_original;
use syntax::javascript;

/// The compared texts (after formatting) together with their differences.
///
/// Removal offsets index into `before`, addition offsets into `after`.
#[derive(Debug, Clone)]
pub struct SourceDiff {
    pub before: String,
    pub after: String,
    pub differences: Vec<Difference>,
}

impl SourceDiff {
    pub fn summary(&self) -> DiffSummary {
        DiffSummary::from_differences(&self.differences)
    }
}

/// Format, parse and compare two JavaScript sources.
///
/// Formatting failures fall back to the unformatted text; a parse failure on
/// either side aborts the comparison.
pub fn diff_sources(
    before: &str,
    after: &str,
    formatter: Option<&dyn SourceFormatter>,
) -> Result<SourceDiff> {
    let before = format_or_original(formatter, before).into_owned();
    let after = format_or_original(formatter, after).into_owned();

    tracing::debug!("Parsing first source ({} bytes)", before.len());
    let first = javascript::parse(&before)?;
    tracing::debug!("Parsing second source ({} bytes)", after.len());
    let second = javascript::parse(&after)?;

    let differences = diff_trees(&first, &second);
    tracing::debug!("Found {} differences", differences.len());

    Ok(SourceDiff {
        before,
        after,
        differences,
    })
}

/// Compare two already-parsed roots.
pub fn diff_trees(first: &SyntaxNode, second: &SyntaxNode) -> Vec<Difference> {
    differ::compare_trees(first, second)
}
