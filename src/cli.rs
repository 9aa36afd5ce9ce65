use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "skguard",
    about = "SkGuard - Risk-scoring security scanner for AI agent skills and code trees",
    version
)]
pub struct Args {
    /// File or directory to scan
    #[arg(default_value = ".")]
    pub target: PathBuf,

    /// Output format for scan results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Write the rendered output to a file instead of stdout
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Risk score at or above which the exit code signals failure
    #[arg(short, long, default_value = "80.0")]
    pub threshold: f64,

    /// Threat feed snapshot file (JSON) merged ahead of the built-in set
    #[arg(short, long)]
    pub signatures: Option<PathBuf>,

    /// SQLite database for recording scan events and target reputation
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Maximum file size to scan in MB
    #[arg(long, default_value = "10")]
    pub max_file_size: u64,

    /// Extensions to skip during directory walks (without dots)
    #[arg(long, value_delimiter = ',')]
    pub skip_extensions: Vec<String>,

    /// Scan binary files instead of skipping them
    #[arg(long)]
    pub include_binaries: bool,

    /// Append remediation suggestions to the report
    #[arg(long)]
    pub remediate: bool,

    /// Enable verbose logging of all operations
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log critical errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// Structured JSON for programmatic consumers
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
