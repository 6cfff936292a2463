//! Optional formatting pre-pass.
//!
//! Normalizing both inputs with the same pretty-printer before parsing keeps
//! layout conventions from leaking into unrelated fields. Formatting only
//! improves result quality, so a failing formatter degrades to the original
//! text instead of aborting the comparison.

use std::borrow::Cow;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use crate::error::{DeltaError, Result};

/// A source-to-source formatter.
///
/// Constructed once by the caller and passed by reference to whatever needs it.
pub trait SourceFormatter: Send + Sync {
    fn format(&self, source: &str) -> Result<String>;
}

/// Formats by piping source through an external command's stdin and reading
/// its stdout, e.g. `prettier --parser babel`.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    /// Build a formatter from a command line split into program and arguments.
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| DeltaError::format("formatter command is empty"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SourceFormatter for CommandFormatter {
    fn format(&self, source: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DeltaError::format(format!("failed to start `{}`: {}", self.program, e))
            })?;

        // Feed stdin from another thread so a formatter that streams output
        // before consuming all input cannot deadlock us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| DeltaError::format("formatter stdin unavailable"))?;
        let input = source.to_owned();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| DeltaError::format("formatter stdin writer panicked"))?;

        // A formatter that bails out early closes its stdin; report the exit
        // status rather than the broken pipe.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeltaError::format(format!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        written?;

        String::from_utf8(output.stdout)
            .map_err(|e| DeltaError::format(format!("formatter produced invalid UTF-8: {}", e)))
    }
}

/// Format `source` if a formatter is given, falling back to the original text
/// when formatting fails.
pub fn format_or_original<'a>(
    formatter: Option<&dyn SourceFormatter>,
    source: &'a str,
) -> Cow<'a, str> {
    let Some(formatter) = formatter else {
        return Cow::Borrowed(source);
    };
    match formatter.format(source) {
        Ok(formatted) => Cow::Owned(formatted),
        Err(e) => {
            tracing::warn!("Formatting failed, comparing unformatted text: {}", e);
            Cow::Borrowed(source)
        }
    }
}
