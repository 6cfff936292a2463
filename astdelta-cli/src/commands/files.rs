//! Files command - structural diff between two JavaScript files
//!
//! Reads both files, optionally normalizes them with the configured
//! formatter, and reports the differences that survive the equivalence
//! policy as a rendered line view and/or a raw JSON list.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use astdelta_core::report::{self, DisplayBlock, Report};
use astdelta_core::{diff_sources, CommandFormatter, DiffSummary, Difference, SourceFormatter};
use colored::Colorize;
use serde::Serialize;

use crate::output::{truncate, Output, OutputFormat, TableDisplay};

/// Longest source line shown before truncation.
const MAX_LINE_WIDTH: usize = 160;

/// Options resolved from flags and configuration.
#[derive(Debug, Clone)]
pub struct FilesOptions {
    /// Print the rendered line view.
    pub show_diff: bool,
    /// Print the raw difference list as JSON.
    pub json: bool,
    /// Context lines around each changed line.
    pub context: usize,
    /// Formatter command line, if formatting is enabled.
    pub formatter: Option<Vec<String>>,
}

/// The raw difference list, serialized as a plain JSON array.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct DifferenceList(pub Vec<Difference>);

impl TableDisplay for DifferenceList {
    fn to_table(&self) -> String {
        self.0
            .iter()
            .map(|d| {
                format!(
                    "{} {} [{}..{}] {}",
                    d.kind.as_str(),
                    d.node_kind,
                    d.start_offset,
                    d.end_offset,
                    d.description.as_deref().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Rendered comparison of two files
#[derive(Debug, Serialize)]
pub struct FilesDiff {
    pub before_path: String,
    pub after_path: String,
    pub summary: DiffSummary,
    pub differences: Vec<Difference>,
    pub report: Report,
    pub duration_ms: u64,
}

impl TableDisplay for FilesDiff {
    fn to_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} -> {}\n",
            "DIFF:".cyan().bold(),
            self.before_path.yellow(),
            self.after_path.green()
        ));

        if !self.summary.is_changed() {
            output.push_str(&format!(
                "{}\n",
                "No structural differences.".dimmed()
            ));
            return output;
        }

        output.push_str(&format!(
            "Found {} differences ({} removed, {} added) ({}ms)\n",
            self.summary.total().to_string().cyan(),
            self.summary.removals.to_string().red(),
            self.summary.additions.to_string().green(),
            self.duration_ms
        ));

        if self.summary.removals > 0 {
            output.push_str(&format!(
                "\n{} ({}):\n",
                "REMOVED".red().bold(),
                self.summary.removals
            ));
            for d in self.differences.iter().filter(|d| d.is_removal()) {
                output.push_str(&format!("  - {}\n", label(d).red()));
            }
            render_blocks(&mut output, &self.report.removals, '-');
        }

        if self.summary.additions > 0 {
            output.push_str(&format!(
                "\n{} ({}):\n",
                "ADDED".green().bold(),
                self.summary.additions
            ));
            for d in self.differences.iter().filter(|d| d.is_addition()) {
                output.push_str(&format!("  + {}\n", label(d).green()));
            }
            render_blocks(&mut output, &self.report.additions, '+');
        }

        output
    }
}

fn label(d: &Difference) -> String {
    match &d.description {
        Some(description) => format!("{} [{}]", description, d.node_kind),
        None => d.node_kind.clone(),
    }
}

fn render_blocks(output: &mut String, blocks: &[DisplayBlock], marker: char) {
    output.push('\n');
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 && Report::is_gap_between(&blocks[i - 1], block) {
            output.push_str(&format!("{}\n", "     ...".dimmed()));
        }
        for line in &block.lines {
            let text = truncate(&line.text, MAX_LINE_WIDTH);
            if line.changed {
                let row = format!("{:>5} {} {}", line.number, marker, text);
                let row = if marker == '-' { row.red() } else { row.green() };
                output.push_str(&format!("{}\n", row));
            } else {
                output.push_str(&format!(
                    "{}\n",
                    format!("{:>5}   {}", line.number, text).dimmed()
                ));
            }
        }
    }
}

async fn read_source(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn build_formatter(command: Option<&[String]>) -> Option<CommandFormatter> {
    match CommandFormatter::new(command?) {
        Ok(formatter) => Some(formatter),
        Err(e) => {
            tracing::warn!("Ignoring formatter configuration: {}", e);
            None
        }
    }
}

pub async fn run(before: &Path, after: &Path, options: FilesOptions) -> anyhow::Result<()> {
    let start = Instant::now();

    let (before_text, after_text) = tokio::try_join!(read_source(before), read_source(after))?;

    let formatter = build_formatter(options.formatter.as_deref());
    if let Some(ref f) = formatter {
        tracing::debug!("Formatting inputs with `{}`", f.program());
    }

    let diff = tokio::task::spawn_blocking(move || {
        diff_sources(
            &before_text,
            &after_text,
            formatter.as_ref().map(|f| f as &dyn SourceFormatter),
        )
    })
    .await
    .context("Comparison task failed")?
    .with_context(|| {
        format!(
            "Failed to compare {} and {}",
            before.display(),
            after.display()
        )
    })?;

    let duration_ms = start.elapsed().as_millis() as u64;
    tracing::debug!(
        "Compared {} and {} in {}ms",
        before.display(),
        after.display(),
        duration_ms
    );

    if options.json {
        Output::new(DifferenceList(diff.differences.clone()), OutputFormat::Json).render()?;
    }

    if options.show_diff {
        let report = report::build(&diff.before, &diff.after, &diff.differences, options.context);
        let result = FilesDiff {
            before_path: before.display().to_string(),
            after_path: after.display().to_string(),
            summary: diff.summary(),
            differences: diff.differences,
            report,
            duration_ms,
        };
        let view = Output::new(result, OutputFormat::Table);
        // stdout already carries the JSON list
        if options.json {
            view.render_to_stderr()?;
        } else {
            view.render()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use astdelta_core::DifferenceKind;

    fn difference(kind: DifferenceKind, start: usize, end: usize, description: &str) -> Difference {
        Difference {
            kind,
            start_offset: start,
            end_offset: end,
            node_kind: "string".to_string(),
            description: Some(description.to_string()),
        }
    }

    #[test]
    fn test_difference_list_serializes_as_array() {
        let list = DifferenceList(vec![difference(DifferenceKind::Removal, 4, 7, "\"a\"")]);
        let json: serde_json::Value =
            serde_json::from_str(&Output::new(list, OutputFormat::Json).render_to_string().unwrap())
                .unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["kind"], "removal");
        assert_eq!(json[0]["nodeKind"], "string");
    }

    #[test]
    fn test_rendered_report() {
        let before = "a();\nlog(\"a\");\nb();\n";
        let after = "a();\nlog(\"b\");\nb();\n";
        let differences = vec![
            difference(DifferenceKind::Removal, 9, 12, "\"a\""),
            difference(DifferenceKind::Addition, 9, 12, "\"b\""),
        ];
        let result = FilesDiff {
            before_path: "old.js".to_string(),
            after_path: "new.js".to_string(),
            summary: DiffSummary::from_differences(&differences),
            report: report::build(before, after, &differences, 0),
            differences,
            duration_ms: 1,
        };
        let text = result.to_table();

        assert!(text.contains("old.js"));
        assert!(text.contains("REMOVED"));
        assert!(text.contains("ADDED"));
        assert!(text.contains("\"a\" [string]"));
        assert!(text.contains("log(\"b\");"));
        assert!(!text.contains("b();"));
    }

    #[test]
    fn test_unchanged_report() {
        let result = FilesDiff {
            before_path: "old.js".to_string(),
            after_path: "new.js".to_string(),
            summary: DiffSummary::default(),
            differences: Vec::new(),
            report: Report::default(),
            duration_ms: 0,
        };
        assert!(result.to_table().contains("No structural differences."));
    }

    #[test]
    fn test_gap_marker_between_distant_blocks() {
        let text = "x\n".repeat(9);
        let differences = vec![
            difference(DifferenceKind::Removal, 0, 1, "first"),
            difference(DifferenceKind::Removal, 16, 17, "last"),
        ];
        let result = FilesDiff {
            before_path: "old.js".to_string(),
            after_path: "new.js".to_string(),
            summary: DiffSummary::from_differences(&differences),
            report: report::build(&text, "", &differences, 1),
            differences,
            duration_ms: 0,
        };
        assert!(result.to_table().contains("..."));
    }

    #[test]
    fn test_empty_formatter_command_ignored() {
        assert!(build_formatter(None).is_none());
        assert!(build_formatter(Some(&[][..])).is_none());
        assert!(build_formatter(Some(&["cat".to_string()][..])).is_some());
    }
}
