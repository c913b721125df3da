use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Columns every input file must carry, in the canonical (alphabetical)
/// order the scanner projects them into.
pub const EXPECTED_COLUMNS: [&str; 6] = [
    "campaign_id",
    "clicks",
    "conversions",
    "date",
    "impressions",
    "spend",
];

/// Header of both ranking files, in output order.
pub const OUTPUT_COLUMNS: [&str; 7] = [
    "campaign_id",
    "total_impressions",
    "total_clicks",
    "total_spend",
    "total_conversions",
    "CTR",
    "CPA",
];

/// One input row after per-cell coercion. A cell that fails to parse is
/// `None` rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub campaign_id: Option<String>,
    pub clicks: Option<i64>,
    pub conversions: Option<i64>,
    pub date: Option<String>,
    pub impressions: Option<i64>,
    pub spend: Option<f64>,
}

/// Sums for one campaign, produced by the grouped aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignAggregate {
    pub campaign_id: String,
    pub total_impressions: i64,
    pub total_clicks: i64,
    pub total_spend: f64,
    pub total_conversions: i64,
    /// Number of input rows folded into this group. Diagnostic only.
    pub row_count: usize,
}

impl CampaignAggregate {
    pub fn new(campaign_id: impl Into<String>) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            total_impressions: 0,
            total_clicks: 0,
            total_spend: 0.0,
            total_conversions: 0,
            row_count: 0,
        }
    }

    /// Fold one record in. Missing values contribute zero.
    ///
    /// A total that overflows `i64`, or a spend total that is no longer
    /// finite, is an error and leaves the group unchanged.
    pub fn add(&mut self, record: &RawRecord) -> Result<()> {
        let impressions = self
            .total_impressions
            .checked_add(record.impressions.unwrap_or(0))
            .ok_or_else(|| self.out_of_range("impressions"))?;
        let clicks = self
            .total_clicks
            .checked_add(record.clicks.unwrap_or(0))
            .ok_or_else(|| self.out_of_range("clicks"))?;
        let conversions = self
            .total_conversions
            .checked_add(record.conversions.unwrap_or(0))
            .ok_or_else(|| self.out_of_range("conversions"))?;
        let spend = self.total_spend + record.spend.unwrap_or(0.0);
        if !spend.is_finite() {
            return Err(self.out_of_range("spend"));
        }

        self.total_impressions = impressions;
        self.total_clicks = clicks;
        self.total_conversions = conversions;
        self.total_spend = spend;
        self.row_count += 1;
        Ok(())
    }

    fn out_of_range(&self, column: &'static str) -> ReportError {
        ReportError::SumOverflow {
            campaign_id: self.campaign_id.clone(),
            column,
        }
    }
}

/// An aggregate plus its derived ratios.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignMetrics {
    pub totals: CampaignAggregate,
    /// `None` when the campaign has no impressions at all.
    pub ctr: Option<f64>,
    /// `None` when the campaign has no conversions.
    pub cpa: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct RankingRow {
    pub campaign_id: String,
    pub total_impressions: i64,
    pub total_clicks: i64,
    pub total_spend: f64,
    pub total_conversions: i64,
    #[serde(rename = "CTR")]
    #[tabled(rename = "CTR", display_with = "display_optional")]
    pub ctr: Option<f64>,
    #[serde(rename = "CPA")]
    #[tabled(rename = "CPA", display_with = "display_optional")]
    pub cpa: Option<f64>,
}

impl From<&CampaignMetrics> for RankingRow {
    fn from(m: &CampaignMetrics) -> Self {
        RankingRow {
            campaign_id: m.totals.campaign_id.clone(),
            total_impressions: m.totals.total_impressions,
            total_clicks: m.totals.total_clicks,
            total_spend: m.totals.total_spend,
            total_conversions: m.totals.total_conversions,
            ctr: m.ctr,
            cpa: m.cpa,
        }
    }
}

fn display_optional(value: &Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}
