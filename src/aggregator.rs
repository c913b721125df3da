// Single-pass grouped aggregation over a `ScanPlan`.
use crate::error::Result;
use crate::loader::ScanPlan;
use crate::types::{CampaignAggregate, CampaignMetrics};
use log::{info, warn};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Aggregation {
    /// One entry per distinct campaign, in first-seen order.
    pub campaigns: Vec<CampaignAggregate>,
    /// Rows dropped because their campaign cell was empty.
    pub skipped_rows: usize,
}

/// Execute `plan` and fold every row into its campaign group.
///
/// This is the only place the input body is read. Any structural error
/// in the file surfaces here.
pub fn aggregate_campaigns(plan: &ScanPlan) -> Result<Aggregation> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut campaigns: Vec<CampaignAggregate> = Vec::new();
    let mut skipped_rows = 0usize;

    for record in plan.records()? {
        let record = record?;
        let Some(id) = record.campaign_id.as_deref() else {
            skipped_rows += 1;
            continue;
        };
        let slot = match index.get(id) {
            Some(&slot) => slot,
            None => {
                campaigns.push(CampaignAggregate::new(id));
                index.insert(id.to_string(), campaigns.len() - 1);
                campaigns.len() - 1
            }
        };
        campaigns[slot].add(&record)?;
    }

    if skipped_rows > 0 {
        warn!(
            "{} rows in {} had no campaign_id and were skipped",
            skipped_rows,
            plan.path().display()
        );
    }
    info!(
        "Aggregated {} campaigns from {}",
        campaigns.len(),
        plan.path().display()
    );
    Ok(Aggregation {
        campaigns,
        skipped_rows,
    })
}

/// Total input rows folded into the table.
pub fn total_row_count(table: &[CampaignMetrics]) -> usize {
    table.iter().map(|m| m.totals.row_count).sum()
}
