// End-to-end run: validate, scan, aggregate, derive, rank, write.
use crate::aggregator::{aggregate_campaigns, total_row_count};
use crate::error::Result;
use crate::loader::scan_csv;
use crate::metrics::derive_metrics;
use crate::output::write_results;
use crate::reports::{top_by_cpa, top_by_ctr};
use crate::types::RankingRow;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ReportRun {
    pub top_ctr: Vec<RankingRow>,
    pub top_cpa: Vec<RankingRow>,
    pub ctr_path: PathBuf,
    pub cpa_path: PathBuf,
    pub rows_processed: usize,
    pub unique_campaigns: usize,
    pub skipped_rows: usize,
}

/// Run the whole pipeline over `input` and write both rankings into
/// `output_dir`. Nothing is written unless every earlier stage succeeded.
pub fn generate_reports(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
) -> Result<ReportRun> {
    let plan = scan_csv(input)?;
    info!("CSV file loaded (deferred scan of {})", plan.path().display());

    let aggregation = aggregate_campaigns(&plan)?;
    let table = derive_metrics(aggregation.campaigns);

    let top_ctr = top_by_ctr(&table);
    let top_cpa = top_by_cpa(&table);
    info!(
        "Computed top {} by CTR and top {} by CPA",
        top_ctr.len(),
        top_cpa.len()
    );

    let (ctr_path, cpa_path) = write_results(&top_ctr, &top_cpa, output_dir)?;
    Ok(ReportRun {
        top_ctr,
        top_cpa,
        ctr_path,
        cpa_path,
        rows_processed: total_row_count(&table),
        unique_campaigns: table.len(),
        skipped_rows: aggregation.skipped_rows,
    })
}
