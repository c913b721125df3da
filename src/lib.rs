// Campaign performance aggregation: one pass over a campaign CSV, two
// derived ratios and two top-10 rankings.
pub mod aggregator;
pub mod bench;
pub mod cli;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod reports;
pub mod types;
pub mod util;

pub use error::{ErrorKind, ReportError, Result};
pub use pipeline::{generate_reports, ReportRun};
