//! CLI argument definitions

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;

/// Quill - walk the structure of rich-text document trees
#[derive(Parser)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the event stream of a document walk
    Walk {
        /// Document description (JSON or JSONC)
        file: PathBuf,

        /// Root to walk (defaults to the first root)
        #[arg(long)]
        root: Option<String>,

        /// Start boundary, e.g. "1,0"
        #[arg(long, value_name = "PATH")]
        start: Option<OffsetPath>,

        /// End boundary, e.g. "1,3,0"
        #[arg(long, value_name = "PATH")]
        end: Option<OffsetPath>,

        /// Starting cursor inside the boundaries
        #[arg(long, value_name = "PATH")]
        position: Option<OffsetPath>,

        /// Merge adjacent characters with equal attributes into TEXT events
        #[arg(long)]
        merge: bool,

        /// Walk backward
        #[arg(long)]
        backward: bool,

        /// Output format (text, json)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// A comma separated offset list such as `1,3,0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPath(pub Vec<usize>);

impl FromStr for OffsetPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("path must contain at least one offset".to_string());
        }
        s.split(',')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|e| format!("invalid offset '{}': {}", part.trim(), e))
            })
            .collect::<Result<_, _>>()
            .map(OffsetPath)
    }
}
