//! Derived sales metrics: growth, YoY, day summaries, sales mix and table totals.
//!
//! Every function is pure. Percentages over a zero denominator are `None` rather
//! than `inf`/`NaN`; `returns_percent` is the one exception and falls back to 0.

use contracts::dashboards::d410_store_performance::{
    DailyPerformance, DayDetail, DaySummary, LastYearComparison, PerformanceTotals, SalesMix,
};
use contracts::dashboards::d411_sales_overview::CustomerStatus;
use chrono::NaiveDate;

use crate::shared::indicators::kpi::trend_by_change;

/// `(current - previous) / previous * 100`, `None` when `previous == 0`.
pub fn pct_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

/// Yearly growth of a store.
pub fn compute_store_growth(current: f64, previous: f64) -> Option<f64> {
    pct_change(current, previous)
}

/// Year-over-year change of daily net sales.
pub fn compute_yoy(current: f64, previous_year: f64) -> Option<f64> {
    pct_change(current, previous_year)
}

/// `part / whole * 100`, 0 when `whole == 0`.
fn share(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Customers are active when they bought more than last year.
pub fn customer_status(current: f64, previous: f64) -> CustomerStatus {
    if current > previous {
        CustomerStatus::Active
    } else {
        CustomerStatus::Inactive
    }
}

pub fn compute_sales_mix(retail_total: f64, pro_total: f64) -> SalesMix {
    let total = retail_total + pro_total;
    SalesMix {
        retail_percent: share(retail_total, total),
        pro_percent: share(pro_total, total),
    }
}

/// Aggregates the hourly rows of one day in a single pass.
pub fn compute_day_summary(hourly: Vec<DayDetail>) -> DaySummary {
    let mut retail_total = 0.0;
    let mut pro_total = 0.0;
    let mut returns_total = 0.0;
    let mut ly_total = 0.0;
    let mut ly_retail_total = 0.0;
    let mut ly_pro_total = 0.0;
    let mut ly_returns_total = 0.0;

    for row in &hourly {
        retail_total += row.retail_sales;
        pro_total += row.pro_sales;
        returns_total += row.returns;
        ly_total += row.ly_sales;
        ly_retail_total += row.ly_retail_sales;
        ly_pro_total += row.ly_pro_sales;
        ly_returns_total += row.ly_returns;
    }

    let retail_change = pct_change(retail_total, ly_retail_total);
    let pro_change = pct_change(pro_total, ly_pro_total);
    let returns_change = pct_change(returns_total, ly_returns_total);
    let total_change = pct_change(retail_total + pro_total, ly_total);

    let vs_last_year = LastYearComparison {
        retail_change_percent: retail_change,
        pro_change_percent: pro_change,
        returns_change_percent: returns_change,
        total_change_percent: total_change,
        retail_trend: trend_by_change(retail_change),
        pro_trend: trend_by_change(pro_change),
        returns_trend: trend_by_change(returns_change).inverted(),
        total_trend: trend_by_change(total_change),
    };

    DaySummary {
        retail_total,
        pro_total,
        returns_total,
        returns_percent: share(returns_total, retail_total + pro_total),
        ly_total,
        ly_retail_total,
        ly_pro_total,
        ly_returns_total,
        sales_mix: compute_sales_mix(retail_total, pro_total),
        vs_last_year,
        hourly_data: hourly,
    }
}

/// Footer of the daily table.
pub fn compute_performance_totals(rows: &[DailyPerformance]) -> PerformanceTotals {
    let net_sales: f64 = rows.iter().map(|r| r.net_sales).sum();
    let ly_net_sales: f64 = rows.iter().map(|r| r.ly_net_sales).sum();
    PerformanceTotals {
        net_sales,
        ly_net_sales,
        yoy_net_sales_percent: compute_yoy(net_sales, ly_net_sales),
    }
}

/// Smoothed YTD gross profit percent.
pub fn ytd_gp_percent(gp_percent: f64) -> f64 {
    (gp_percent + 30.0) / 2.0
}

/// Days elapsed since the start of week 1 for a day of the given week.
pub fn days_passed(week_number: u32, day_index: usize) -> u32 {
    (week_number.saturating_sub(1)) * 7 + day_index as u32
}

/// Raw figures of one day (current and last year).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayFigures {
    pub net_sales: f64,
    pub gp_percent: f64,
    pub ly_net_sales: f64,
    pub ly_gp_percent: f64,
    pub basket_size: f64,
}

/// Year-to-date figures up to and including one day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YtdFigures {
    pub net_sales: f64,
    pub gp_percent: f64,
    pub ly_net_sales: f64,
    pub ly_gp_percent: f64,
}

/// YTD for sources without history: the day itself plus a synthetic per-day base
/// for every day elapsed since week 1. Last year runs at 95% of the base.
pub fn synthetic_ytd(day: &DayFigures, base_sales: f64, week_number: u32, day_index: usize) -> YtdFigures {
    let elapsed = days_passed(week_number, day_index) as f64;
    YtdFigures {
        net_sales: day.net_sales + elapsed * base_sales,
        gp_percent: ytd_gp_percent(day.gp_percent),
        ly_net_sales: day.ly_net_sales + elapsed * (base_sales * 0.95),
        ly_gp_percent: ytd_gp_percent(day.ly_gp_percent),
    }
}

/// Assembles a table row and derives its YoY change.
pub fn build_daily_row(day: &str, date: NaiveDate, figures: DayFigures, ytd: YtdFigures) -> DailyPerformance {
    DailyPerformance {
        day: day.to_string(),
        date,
        net_sales: figures.net_sales,
        gp_percent: figures.gp_percent,
        ytd_net_sales: ytd.net_sales,
        ytd_gp_percent: ytd.gp_percent,
        ly_net_sales: figures.ly_net_sales,
        ly_gp_percent: figures.ly_gp_percent,
        ly_ytd_net_sales: ytd.ly_net_sales,
        ly_ytd_gp_percent: ytd.ly_gp_percent,
        yoy_net_sales_percent: compute_yoy(figures.net_sales, figures.ly_net_sales),
        basket_size: figures.basket_size,
    }
}

/// Net-sales weighted average of percentages, 0 without sales.
pub fn weighted_percent(pairs: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    let (weighted, weight) = pairs
        .into_iter()
        .fold((0.0, 0.0), |(acc, total), (percent, sales)| {
            (acc + percent * sales, total + sales)
        });
    if weight == 0.0 {
        0.0
    } else {
        weighted / weight
    }
}

/// `numerator / denominator`, 0 when the denominator is 0.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
