use crate::error::{ReportError, Result};
use crate::types::{RankingRow, OUTPUT_COLUMNS};
use crate::util::round_to;
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

pub const CTR_FILE: &str = "top10_ctr.csv";
pub const CPA_FILE: &str = "top10_cpa.csv";

/// Create `dir` (and any parents) if needed.
pub fn ensure_output_dir(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(dir.to_path_buf())
}

/// Apply display precision: spend and CPA to 2 decimals, CTR to 4.
pub fn round_for_display(row: &RankingRow) -> RankingRow {
    RankingRow {
        total_spend: round_to(row.total_spend, 2),
        ctr: row.ctr.map(|v| round_to(v, 4)),
        cpa: row.cpa.map(|v| round_to(v, 2)),
        ..row.clone()
    }
}

/// Serialize `rows` with a header line. `header` is written explicitly when
/// there are no rows, since `csv::Writer` only emits it on the first record.
pub fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    let write_err = |source: csv::Error| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = csv::Writer::from_path(path).map_err(write_err)?;
    if rows.is_empty() {
        wtr.write_record(header).map_err(write_err)?;
    }
    for r in rows {
        wtr.serialize(r).map_err(write_err)?;
    }
    wtr.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Round and write one ranking. Returns the absolute path written.
pub fn write_ranking(path: &Path, rows: &[RankingRow]) -> Result<PathBuf> {
    let rounded: Vec<RankingRow> = rows.iter().map(round_for_display).collect();
    write_csv(path, &OUTPUT_COLUMNS, &rounded)?;
    debug!("wrote {} rows to {}", rounded.len(), path.display());
    fs::canonicalize(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write both rankings into `dir` as `top10_ctr.csv` and `top10_cpa.csv`.
pub fn write_results(
    top_ctr: &[RankingRow],
    top_cpa: &[RankingRow],
    dir: impl AsRef<Path>,
) -> Result<(PathBuf, PathBuf)> {
    let dir = ensure_output_dir(dir)?;
    let ctr_path = write_ranking(&dir.join(CTR_FILE), top_ctr)?;
    let cpa_path = write_ranking(&dir.join(CPA_FILE), top_cpa)?;
    Ok((ctr_path, cpa_path))
}

/// Print the first `max_rows` rows as a markdown table.
pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
