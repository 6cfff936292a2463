//! URL command - watch a deployed script for structural changes.
//!
//! Declared on the command surface but not implemented yet.

use crate::output::{not_implemented, OutputFormat};

pub fn run(url: &str) -> anyhow::Result<()> {
    tracing::debug!("URL monitoring requested for {}", url);
    not_implemented("url", OutputFormat::Table)
}
