//! Output formatting for the astdelta CLI.
//!
//! Commands build a serializable result and hand it to [`Output`], which
//! renders it either as human-readable text or as pretty-printed JSON.

use colored::Colorize;
use serde::Serialize;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Table,
    /// JSON format for machine consumption
    Json,
}

/// Types that can be displayed as human-readable text.
pub trait TableDisplay: Serialize {
    fn to_table(&self) -> String;
}

/// Result wrapper rendering data in the selected format
pub struct Output<T> {
    data: T,
    format: OutputFormat,
}

impl<T: TableDisplay> Output<T> {
    pub fn new(data: T, format: OutputFormat) -> Self {
        Self { data, format }
    }

    /// Render the output to stdout
    pub fn render(&self) -> anyhow::Result<()> {
        println!("{}", self.render_to_string()?);
        Ok(())
    }

    /// Render the output to stderr, leaving stdout to another result
    pub fn render_to_stderr(&self) -> anyhow::Result<()> {
        eprintln!("{}", self.render_to_string()?);
        Ok(())
    }

    /// Get the rendered string without printing
    pub fn render_to_string(&self) -> anyhow::Result<String> {
        Ok(match self.format {
            OutputFormat::Table => self.data.to_table(),
            OutputFormat::Json => serde_json::to_string_pretty(&self.data)?,
        })
    }
}

/// Not implemented placeholder
#[derive(Debug, Serialize)]
pub struct NotImplemented {
    pub command: String,
}

impl NotImplemented {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl TableDisplay for NotImplemented {
    fn to_table(&self) -> String {
        format!(
            "{} Command '{}' is not implemented yet (work in progress)",
            "INFO:".yellow().bold(),
            self.command.cyan()
        )
    }
}

/// Print a not implemented message
pub fn not_implemented(command: &str, format: OutputFormat) -> anyhow::Result<()> {
    Output::new(NotImplemented::new(command), format).render()
}

/// Truncate a string to a maximum width with ellipsis
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let truncated: String = s.chars().take(max_width - 3).collect();
        format!("{}...", truncated)
    }
}
