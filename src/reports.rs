// The two ranked views of the metric table.
//
// Both are read-only projections. Ties are broken by `campaign_id`
// ascending so the output never depends on hash or sort stability.
use crate::types::{CampaignMetrics, RankingRow};
use std::cmp::Ordering;

pub const TOP_N: usize = 10;

/// Highest click-through rate first. Campaigns without a defined CTR sort
/// last; campaigns without a CPA are kept.
pub fn top_by_ctr(table: &[CampaignMetrics]) -> Vec<RankingRow> {
    let mut ranked: Vec<&CampaignMetrics> = table.iter().collect();
    ranked.sort_by(|a, b| {
        descending_defined_first(a.ctr, b.ctr)
            .then_with(|| a.totals.campaign_id.cmp(&b.totals.campaign_id))
    });
    ranked.into_iter().take(TOP_N).map(RankingRow::from).collect()
}

/// Lowest cost per acquisition first, restricted to campaigns that
/// converted at least once.
pub fn top_by_cpa(table: &[CampaignMetrics]) -> Vec<RankingRow> {
    let mut ranked: Vec<(f64, &CampaignMetrics)> = table
        .iter()
        .filter(|m| m.totals.total_conversions > 0)
        .filter_map(|m| m.cpa.map(|cpa| (cpa, m)))
        .collect();
    ranked.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then_with(|| a.1.totals.campaign_id.cmp(&b.1.totals.campaign_id))
    });
    ranked
        .into_iter()
        .take(TOP_N)
        .map(|(_, m)| RankingRow::from(m))
        .collect()
}

fn descending_defined_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
