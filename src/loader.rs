// Input validation and the deferred, schema-checked scan.
//
// `scan_csv` only reads the header row. The body of the file is read once,
// later, when the aggregator walks `ScanPlan::records`.
use crate::error::{ReportError, Result};
use crate::types::{RawRecord, EXPECTED_COLUMNS};
use crate::util::{parse_f64_safe, parse_i64_safe, parse_text_safe, round_to};
use csv::{ReaderBuilder, StringRecord};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Check that `path` names a non-empty regular `.csv` file.
pub fn validate_file(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ReportError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ReportError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if !meta.is_file() {
        return Err(ReportError::NotAFile(path.to_path_buf()));
    }
    if meta.len() == 0 {
        return Err(ReportError::EmptyFile(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    if !extension.eq_ignore_ascii_case("csv") {
        return Err(ReportError::WrongExtension {
            path: path.to_path_buf(),
            extension: if extension.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{}", extension)
            },
        });
    }

    fs::canonicalize(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Size of a file in megabytes, rounded to one decimal.
pub fn file_size_mb(path: impl AsRef<Path>) -> Result<f64> {
    let path = path.as_ref();
    let meta = fs::metadata(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(round_to(meta.len() as f64 / (1024.0 * 1024.0), 1))
}

/// A description of how to read a campaign CSV, built from its header alone.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    path: PathBuf,
    found_columns: Vec<String>,
    // Source column index for each entry of `EXPECTED_COLUMNS`.
    projection: [usize; 6],
}

/// Build a `ScanPlan` for `path`, failing fast if the file is invalid or
/// any required column is absent. Extra columns are ignored.
pub fn scan_csv(path: impl AsRef<Path>) -> Result<ScanPlan> {
    let path = validate_file(path)?;
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_path(&path)
        .map_err(|source| ReportError::UnreadableHeader {
            path: path.clone(),
            source,
        })?;
    let headers = rdr
        .headers()
        .map_err(|source| ReportError::UnreadableHeader {
            path: path.clone(),
            source,
        })?
        .clone();
    let found_columns: Vec<String> = headers.iter().map(str::to_string).collect();

    let mut projection = [0usize; 6];
    let mut missing = Vec::new();
    for (slot, name) in EXPECTED_COLUMNS.iter().enumerate() {
        match found_columns.iter().position(|c| c == name) {
            Some(idx) => projection[slot] = idx,
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        let mut found = found_columns.clone();
        found.sort();
        found.dedup();
        return Err(ReportError::MissingColumns { missing, found });
    }

    debug!(
        "scan plan for {}: {} source columns, projection {:?}",
        path.display(),
        found_columns.len(),
        projection
    );
    Ok(ScanPlan {
        path,
        found_columns,
        projection,
    })
}

impl ScanPlan {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names exactly as they appear in the source header.
    pub fn found_columns(&self) -> &[String] {
        &self.found_columns
    }

    /// The projected columns, in canonical order.
    pub fn columns(&self) -> &'static [&'static str] {
        &EXPECTED_COLUMNS
    }

    /// Execute the plan, yielding one coerced record per data row.
    ///
    /// Structural failures (bad UTF-8, I/O) surface as `ReportError::Aggregation`.
    pub fn records(&self) -> Result<impl Iterator<Item = Result<RawRecord>> + '_> {
        let rdr = ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|source| self.aggregation_error(source))?;
        Ok(rdr.into_records().map(move |res| {
            res.map(|rec| self.coerce(&rec))
                .map_err(|source| self.aggregation_error(source))
        }))
    }

    fn coerce(&self, rec: &StringRecord) -> RawRecord {
        let cell = |slot: usize| rec.get(self.projection[slot]);
        RawRecord {
            campaign_id: parse_text_safe(cell(0)),
            clicks: parse_i64_safe(cell(1)),
            conversions: parse_i64_safe(cell(2)),
            date: parse_text_safe(cell(3)),
            impressions: parse_i64_safe(cell(4)),
            spend: parse_f64_safe(cell(5)),
        }
    }

    fn aggregation_error(&self, source: csv::Error) -> ReportError {
        ReportError::Aggregation {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let p = dir.path().join(name);
        fs::write(&p, contents).unwrap();
        p
    }

    #[test]
    fn validate_rejects_missing_empty_and_wrong_extension() {
        let dir = TempDir::new().unwrap();

        let err = validate_file(dir.path().join("nope.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let empty = write(&dir, "empty.csv", "");
        let err = validate_file(&empty).unwrap_err();
        assert!(matches!(err, ReportError::EmptyFile(_)));
        assert!(err.to_string().contains("Input file is empty"));

        let txt = write(&dir, "data.txt", "some content");
        let err = validate_file(&txt).unwrap_err();
        assert_eq!(err.to_string(), "Expected a .csv file, got: .txt");

        let err = validate_file(dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::NotAFile(_)));
    }

    #[test]
    fn validate_accepts_uppercase_extension() {
        let dir = TempDir::new().unwrap();
        let p = write(&dir, "DATA.CSV", "campaign_id\n");
        let resolved = validate_file(&p).unwrap();
        assert!(resolved.is_absolute());
    }

    #[test]
    fn scan_projects_in_canonical_order_and_drops_extras() {
        let dir = TempDir::new().unwrap();
        let p = write(
            &dir,
            "extra.csv",
            "spend,region,conversions,campaign_id,clicks,date,impressions\n\
             12.5,EU,3,CMP9,40,2025-01-01,1000\n",
        );
        let plan = scan_csv(&p).unwrap();
        assert_eq!(plan.columns(), &EXPECTED_COLUMNS);
        assert_eq!(plan.found_columns().len(), 7);

        let rows: Vec<RawRecord> = plan.records().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(
            rows,
            vec![RawRecord {
                campaign_id: Some("CMP9".into()),
                clicks: Some(40),
                conversions: Some(3),
                date: Some("2025-01-01".into()),
                impressions: Some(1000),
                spend: Some(12.5),
            }]
        );
    }

    #[test]
    fn scan_fails_fast_on_missing_columns() {
        let dir = TempDir::new().unwrap();
        let p = write(&dir, "bad.csv", "id,value\n1,100\n");
        let err = scan_csv(&p).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let msg = err.to_string();
        assert!(msg.contains("missing required columns"));
        assert!(msg.contains("campaign_id"));
        assert!(msg.contains("Found columns: id, value"));
    }

    #[test]
    fn bad_cells_become_missing() {
        let dir = TempDir::new().unwrap();
        let p = write(
            &dir,
            "dirty.csv",
            "campaign_id,date,impressions,clicks,spend,conversions\n\
             CMP1,2025-01-01,abc,5,1.0x,2\n\
             CMP1,2025-01-02,100\n",
        );
        let plan = scan_csv(&p).unwrap();
        let rows: Vec<RawRecord> = plan.records().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].impressions, None);
        assert_eq!(rows[0].clicks, Some(5));
        assert_eq!(rows[0].spend, None);
        assert_eq!(rows[1].impressions, Some(100));
        assert_eq!(rows[1].clicks, None);
        assert_eq!(rows[1].conversions, None);
    }

    #[test]
    fn file_size_is_reported_in_megabytes() {
        let dir = TempDir::new().unwrap();
        let p = write(&dir, "small.csv", "campaign_id\nCMP1\n");
        assert_eq!(file_size_mb(&p).unwrap(), 0.0);
    }
}
