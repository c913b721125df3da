use clap::Parser;
use std::path::PathBuf;

/// Process advertising CSV data and generate Top 10 campaign reports.
#[derive(Debug, Parser)]
#[command(name = "ad_report", version)]
pub struct Cli {
    /// Path to the input CSV file (e.g. ad_data.csv)
    #[arg(short, long, env = "AD_REPORT_INPUT")]
    pub input: PathBuf,

    /// Output directory for result CSV files
    #[arg(short, long, env = "AD_REPORT_OUTPUT", default_value = "results")]
    pub output: PathBuf,

    /// Enable verbose output with progress details
    #[arg(short, long)]
    pub verbose: bool,

    /// Display performance benchmark after processing
    #[arg(short, long)]
    pub benchmark: bool,

    /// Print the benchmark as JSON instead of a text block
    #[arg(long, requires = "benchmark")]
    pub json: bool,

    /// Rows of each ranking to preview on the console (0 disables)
    #[arg(long, default_value_t = 3)]
    pub preview: usize,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
