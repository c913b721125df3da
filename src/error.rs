// Error types shared by every stage of the pipeline.
//
// Each variant maps onto one of a small set of kinds so the binary can
// decide on an exit code without matching every variant.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input path does not exist.
    NotFound,
    /// The input exists but is not a usable campaign CSV.
    InvalidInput,
    /// The single materializing pass failed part way through.
    Aggregation,
    /// Result files could not be written.
    Output,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Input file is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("Expected a .csv file, got: {extension}")]
    WrongExtension { path: PathBuf, extension: String },

    #[error(
        "CSV is missing required columns: {}. Found columns: {}",
        .missing.join(", "),
        .found.join(", ")
    )]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Could not read CSV header from {}: {source}", .path.display())]
    UnreadableHeader { path: PathBuf, source: csv::Error },

    #[error("Aggregation failed on {}: {source}", .path.display())]
    Aggregation { path: PathBuf, source: csv::Error },

    #[error("Total {column} for campaign {campaign_id} is out of range")]
    SumOverflow {
        campaign_id: String,
        column: &'static str,
    },

    #[error("I/O error: {source} (path: {})", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Write error on {}: {source}", .path.display())]
    Write { path: PathBuf, source: csv::Error },
}

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::NotFound(_) => ErrorKind::NotFound,
            ReportError::NotAFile(_)
            | ReportError::EmptyFile(_)
            | ReportError::WrongExtension { .. }
            | ReportError::MissingColumns { .. }
            | ReportError::UnreadableHeader { .. } => ErrorKind::InvalidInput,
            ReportError::Aggregation { .. } | ReportError::SumOverflow { .. } => {
                ErrorKind::Aggregation
            }
            ReportError::Io { .. } | ReportError::Write { .. } => ErrorKind::Output,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
