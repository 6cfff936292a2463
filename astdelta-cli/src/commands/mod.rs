//! Command implementations for the astdelta CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod files;
pub mod url;
