//! astdelta CLI - structural diffs for minified JavaScript
//!
//! Compares two builds of a script by syntax tree instead of by text, so
//! renamed identifiers and reshuffled code do not drown out the changes that
//! matter.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::*;
use config::DeltaConfig;

/// Structural diff for minified JavaScript.
#[derive(Parser)]
#[command(name = "astdelta")]
#[command(author, version)]
#[command(about = "Structural diff for minified JavaScript")]
#[command(
    long_about = "astdelta parses two JavaScript files and compares their syntax trees.\nIdentifier renames, non-string literal changes and moved code are ignored."
)]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  astdelta files old.min.js new.min.js          Show the rendered diff
  astdelta files a.js b.js --json --no-diff     Print the raw difference list")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two JavaScript files structurally
    Files {
        /// File with the earlier version
        before: PathBuf,

        /// File with the later version
        after: PathBuf,

        /// Do not print the rendered diff
        #[arg(long)]
        no_diff: bool,

        /// Print the raw difference list as JSON
        #[arg(long)]
        json: bool,

        /// Context lines around each change (overrides config)
        #[arg(short = 'C', long, value_name = "N")]
        context: Option<usize>,

        /// Skip the configured formatter
        #[arg(long)]
        no_format: bool,
    },

    /// Watch a URL for structural changes (work in progress)
    Url {
        /// Script URL to monitor
        url: String,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .astdelta.toml
    let config = DeltaConfig::load(Path::new("."));

    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        println!();
        return Ok(());
    };

    match command {
        Commands::Files {
            before,
            after,
            no_diff,
            json,
            context,
            no_format,
        } => {
            let options = files::FilesOptions {
                show_diff: !no_diff,
                json,
                context: context.unwrap_or_else(|| config.context_lines()),
                formatter: if no_format {
                    None
                } else {
                    config.formatter_command().map(<[String]>::to_vec)
                },
            };
            files::run(&before, &after, options).await
        }
        Commands::Url { url } => url::run(&url),
    }
}
