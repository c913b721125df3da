// Derived ratios. No rounding happens here; see `output::round_for_display`.
use crate::types::{CampaignAggregate, CampaignMetrics};

/// Clicks over impressions. `None` when there were no impressions.
pub fn click_through_rate(clicks: i64, impressions: i64) -> Option<f64> {
    if impressions == 0 {
        return None;
    }
    Some(clicks as f64 / impressions as f64)
}

/// Spend over conversions. `None` unless conversions are positive.
pub fn cost_per_acquisition(spend: f64, conversions: i64) -> Option<f64> {
    if conversions > 0 {
        Some(spend / conversions as f64)
    } else {
        None
    }
}

pub fn derive_metrics(campaigns: Vec<CampaignAggregate>) -> Vec<CampaignMetrics> {
    campaigns
        .into_iter()
        .map(|totals| CampaignMetrics {
            ctr: click_through_rate(totals.total_clicks, totals.total_impressions),
            cpa: cost_per_acquisition(totals.total_spend, totals.total_conversions),
            totals,
        })
        .collect()
}
