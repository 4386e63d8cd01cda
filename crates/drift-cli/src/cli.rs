use std::path::PathBuf;

use clap::Parser;
use drift_engine::ReportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "drift",
    about = "Compare two directory trees and report what changed",
    version,
)]
pub struct Cli {
    /// Root of the old tree
    pub old: PathBuf,

    /// Root of the new tree
    pub new: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value = "markdown")]
    pub format: OutputFormat,

    /// List unchanged paths in the report
    #[arg(long)]
    pub include_unchanged: bool,

    /// Embed line diffs for modified text files and compiled modules
    #[arg(long)]
    pub detailed_diff: bool,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of file pairs compared concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Disassembler executable used for compiled modules
    #[arg(long)]
    pub tool: Option<String>,

    /// Disassembler timeout per module, in seconds
    #[arg(long)]
    pub tool_timeout: Option<u64>,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}
