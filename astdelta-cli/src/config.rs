//! Configuration loading from `.astdelta.toml`.
//!
//! The file is optional and read from the working directory. Command-line
//! flags override anything configured here.
//!
//! # Example Configuration
//!
//! ```toml
//! [formatter]
//! command = ["prettier", "--parser", "babel"]
//!
//! [render]
//! context_lines = 3
//! color = true
//! ```

use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILE: &str = ".astdelta.toml";

/// Root configuration structure loaded from `.astdelta.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct DeltaConfig {
    /// Formatter pre-pass applied to both inputs.
    #[serde(default)]
    pub formatter: FormatterConfig,

    /// Rendered diff preferences.
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct FormatterConfig {
    /// Program and arguments of a stdin-to-stdout formatter.
    ///
    /// Absent means the sources are compared as written.
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    /// Lines of context shown around each changed line.
    ///
    /// Default: `3`
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Force colored output on or off. Unset means auto-detect.
    #[serde(default)]
    pub color: Option<bool>,
}

fn default_context_lines() -> usize {
    3
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            context_lines: default_context_lines(),
            color: None,
        }
    }
}

impl DeltaConfig {
    /// Load configuration from `.astdelta.toml` in the given directory.
    ///
    /// Missing files yield defaults; unreadable or invalid ones are logged as
    /// warnings and also yield defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    pub fn formatter_command(&self) -> Option<&[String]> {
        self.formatter.command.as_deref()
    }

    pub fn context_lines(&self) -> usize {
        self.render.context_lines
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.render.color
    }
}
