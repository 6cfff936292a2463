//! Structural diff engine for syntax trees.
//!
//! Compares two parsed trees and reports only the differences that survive
//! the equivalence policy: renamed identifiers, changed non-string literals
//! and metadata never show up, and subtrees that merely moved are cancelled.
//!
//! # Components
//!
//! - [`policy`]: per-node equivalence rules and node descriptions
//! - [`comparator`]: the lockstep walk, driven by an explicit frame stack
//! - [`moves`]: per-frame cancellation of relocated content
//!
//! # Example
//!
//! ```
//! use astdelta_core::differ::compare_trees;
//! use astdelta_core::syntax::javascript;
//!
//! let a = javascript::parse("function f(a,b){return a+b;}").unwrap();
//! let b = javascript::parse("function g(x,y){return x+y;}").unwrap();
//! assert!(compare_trees(&a, &b).is_empty());
//! ```

pub mod changes;
pub mod comparator;
pub mod moves;
pub mod policy;

pub use changes::{DiffSummary, Difference, DifferenceKind};
pub use comparator::{compare, compare_trees};
pub use moves::reconcile;
