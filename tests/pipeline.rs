use ad_report::aggregator::{aggregate_campaigns, total_row_count};
use ad_report::loader::scan_csv;
use ad_report::metrics::derive_metrics;
use ad_report::output::{write_ranking, CPA_FILE, CTR_FILE};
use ad_report::reports::{top_by_cpa, top_by_ctr};
use ad_report::types::{CampaignMetrics, RankingRow};
use ad_report::{generate_reports, ErrorKind};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SAMPLE_CSV: &str = "campaign_id,date,impressions,clicks,spend,conversions
CMP001,2025-01-01,10000,500,100.00,20
CMP001,2025-01-02,12000,600,120.00,25
CMP002,2025-01-01,8000,100,50.00,5
CMP002,2025-01-02,9000,120,60.00,8
CMP003,2025-01-01,15000,300,200.00,0
CMP003,2025-01-02,16000,320,210.00,0
CMP004,2025-01-01,5000,400,80.00,30
CMP004,2025-01-02,6000,500,90.00,35
CMP005,2025-01-01,20000,200,300.00,10
CMP005,2025-01-02,22000,220,320.00,12
CMP006,2025-01-01,7000,350,60.00,15
CMP007,2025-01-01,30000,900,150.00,50
CMP008,2025-01-01,25000,250,500.00,5
CMP009,2025-01-01,18000,720,90.00,40
CMP010,2025-01-01,11000,110,400.00,3
";

fn sample_file(dir: &TempDir) -> PathBuf {
    let p = dir.path().join("test_data.csv");
    fs::write(&p, SAMPLE_CSV).unwrap();
    p
}

fn metric_table(dir: &TempDir) -> Vec<CampaignMetrics> {
    let plan = scan_csv(sample_file(dir)).unwrap();
    derive_metrics(aggregate_campaigns(&plan).unwrap().campaigns)
}

fn find<'a>(table: &'a [CampaignMetrics], id: &str) -> &'a CampaignMetrics {
    table.iter().find(|m| m.totals.campaign_id == id).unwrap()
}

fn ids(rows: &[RankingRow]) -> Vec<String> {
    rows.iter().map(|r| r.campaign_id.clone()).collect()
}

#[test]
fn sample_aggregates_to_ten_campaigns() {
    let dir = TempDir::new().unwrap();
    let table = metric_table(&dir);
    assert_eq!(table.len(), 10);
    assert_eq!(total_row_count(&table), 15);
}

#[test]
fn cmp001_totals_and_ratios() {
    let dir = TempDir::new().unwrap();
    let table = metric_table(&dir);
    let cmp001 = find(&table, "CMP001");
    assert_eq!(cmp001.totals.total_impressions, 22000);
    assert_eq!(cmp001.totals.total_clicks, 1100);
    assert!((cmp001.totals.total_spend - 220.0).abs() < 0.01);
    assert_eq!(cmp001.totals.total_conversions, 45);
    assert_eq!(cmp001.ctr, Some(0.05));
    assert!((cmp001.cpa.unwrap() - 4.889).abs() < 0.01);
}

#[test]
fn zero_conversion_campaign_only_in_ctr_ranking() {
    let dir = TempDir::new().unwrap();
    let table = metric_table(&dir);
    let cmp003 = find(&table, "CMP003");
    assert_eq!(cmp003.cpa, None);

    let ctr = top_by_ctr(&table);
    let cpa = top_by_cpa(&table);
    assert_eq!(ctr.len(), 10);
    assert!(ids(&ctr).contains(&"CMP003".to_string()));
    assert!(!ids(&cpa).contains(&"CMP003".to_string()));
    assert_eq!(cpa.len(), 9);
}

#[test]
fn full_pipeline_writes_sorted_files() {
    let dir = TempDir::new().unwrap();
    let input = sample_file(&dir);
    let out = dir.path().join("nested").join("results");

    let run = generate_reports(&input, &out).unwrap();
    assert_eq!(run.rows_processed, 15);
    assert_eq!(run.unique_campaigns, 10);
    assert!(run.ctr_path.ends_with(CTR_FILE));
    assert!(run.cpa_path.ends_with(CPA_FILE));

    let read = |p: &PathBuf| -> Vec<RankingRow> {
        csv::Reader::from_path(p)
            .unwrap()
            .deserialize::<RankingRow>()
            .collect::<Result<_, _>>()
            .unwrap()
    };
    let ctr_rows = read(&run.ctr_path);
    let cpa_rows = read(&run.cpa_path);

    let ctr_values: Vec<f64> = ctr_rows.iter().map(|r| r.ctr.unwrap()).collect();
    assert!(ctr_values.windows(2).all(|w| w[0] >= w[1]));
    let cpa_values: Vec<f64> = cpa_rows.iter().map(|r| r.cpa.unwrap()).collect();
    assert!(cpa_values.windows(2).all(|w| w[0] <= w[1]));

    let cmp001 = ctr_rows.iter().find(|r| r.campaign_id == "CMP001").unwrap();
    assert_eq!(cmp001.total_spend, 220.0);
    assert_eq!(cmp001.ctr, Some(0.05));
    assert_eq!(cmp001.cpa, Some(4.89));

    let cmp003 = ctr_rows.iter().find(|r| r.campaign_id == "CMP003").unwrap();
    assert_eq!(cmp003.cpa, None);
}

#[test]
fn written_ranking_reads_back_in_order() {
    let dir = TempDir::new().unwrap();
    let table = metric_table(&dir);
    let ranking = top_by_cpa(&table);

    let path = dir.path().join(CPA_FILE);
    write_ranking(&path, &ranking).unwrap();
    let back: Vec<RankingRow> = csv::Reader::from_path(&path)
        .unwrap()
        .deserialize::<RankingRow>()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(ids(&back), ids(&ranking));
    for (written, original) in back.iter().zip(&ranking) {
        assert!((written.cpa.unwrap() - original.cpa.unwrap()).abs() <= 0.005);
    }
}

#[test]
fn missing_columns_write_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(&input, "id,value\n1,100\n").unwrap();
    let out = dir.path().join("results");

    let err = generate_reports(&input, &out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(err.to_string().contains("missing required columns"));
    assert!(!out.exists());
}

#[test]
fn missing_input_is_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.csv");
    let err = generate_reports(&missing, dir.path().join("out")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn rerun_overwrites_outputs() {
    let dir = TempDir::new().unwrap();
    let input = sample_file(&dir);
    let out = dir.path().join("results");

    generate_reports(&input, &out).unwrap();
    let first = fs::read_to_string(out.join(CTR_FILE)).unwrap();
    generate_reports(&input, &out).unwrap();
    let second = fs::read_to_string(out.join(CTR_FILE)).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
}

#[test]
fn oversized_impressions_fail_with_a_typed_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("huge.csv");
    fs::write(
        &input,
        "campaign_id,date,impressions,clicks,spend,conversions\n\
         A,2025-01-01,5000000000000000000,10,1.0,1\n\
         A,2025-01-02,5000000000000000000,10,1.0,1\n",
    )
    .unwrap();
    let out = dir.path().join("results");

    let err = generate_reports(&input, &out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Aggregation);
    assert!(err.to_string().contains("impressions"));
    assert!(!out.exists());
}
