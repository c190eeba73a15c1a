use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a030_store::StoreFilter;
use crate::shared::indicators::Trend;

/// Query for the day drill-down: the selected day plus the active filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySummaryRequest {
    pub day: String,
    #[serde(flatten)]
    pub filter: StoreFilter,
}

/// One row of the daily performance table (Sunday..Saturday of a fiscal week).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPerformance {
    /// Day name, e.g. "Sunday"
    pub day: String,
    pub date: NaiveDate,
    pub net_sales: f64,
    pub gp_percent: f64,
    pub ytd_net_sales: f64,
    pub ytd_gp_percent: f64,
    /// Same day last year
    pub ly_net_sales: f64,
    pub ly_gp_percent: f64,
    pub ly_ytd_net_sales: f64,
    pub ly_ytd_gp_percent: f64,
    /// `None` when last year's net sales are zero
    pub yoy_net_sales_percent: Option<f64>,
    /// Average transaction value
    pub basket_size: f64,
}

/// Footer of the performance table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTotals {
    pub net_sales: f64,
    pub ly_net_sales: f64,
    pub yoy_net_sales_percent: Option<f64>,
}

/// Response for the store performance table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPerformanceResponse {
    /// Filter the rows were fetched for (after narrowing)
    pub filter: StoreFilter,
    pub week_number: u32,
    pub rows: Vec<DailyPerformance>,
    pub totals: PerformanceTotals,
}

/// One operating hour of a day.
///
/// `sales == retail_sales + pro_sales` and `ly_sales == ly_retail_sales + ly_pro_sales`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDetail {
    /// Hour label, e.g. "8am", "12pm"
    pub hour: String,
    pub sales: f64,
    pub retail_sales: f64,
    pub pro_sales: f64,
    pub ly_sales: f64,
    pub ly_retail_sales: f64,
    pub ly_pro_sales: f64,
    pub returns: f64,
    pub ly_returns: f64,
    pub visitors: f64,
    pub conversion: f64,
}

/// Retail / Pro split of revenue, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesMix {
    pub retail_percent: f64,
    pub pro_percent: f64,
}

/// Change against last year's totals, in percent. `None` when last year is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LastYearComparison {
    pub retail_change_percent: Option<f64>,
    pub pro_change_percent: Option<f64>,
    pub returns_change_percent: Option<f64>,
    pub total_change_percent: Option<f64>,
    pub retail_trend: Trend,
    pub pro_trend: Trend,
    /// Inverted: fewer returns than last year is `Up`
    pub returns_trend: Trend,
    pub total_trend: Trend,
}

/// Aggregate over all hourly rows of one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub retail_total: f64,
    pub pro_total: f64,
    pub returns_total: f64,
    /// `returns_total / (retail_total + pro_total) * 100`, 0 when there are no sales
    pub returns_percent: f64,

    pub ly_total: f64,
    pub ly_retail_total: f64,
    pub ly_pro_total: f64,
    pub ly_returns_total: f64,

    pub sales_mix: SalesMix,
    pub vs_last_year: LastYearComparison,

    pub hourly_data: Vec<DayDetail>,
}

/// Response for the day drill-down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummaryResponse {
    pub day: String,
    pub filter: StoreFilter,
    pub summary: DaySummary,
}
