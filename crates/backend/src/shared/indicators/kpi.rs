use contracts::shared::indicators::*;

use crate::shared::format;
use crate::shared::metrics::pct_change;

/// Changes inside this band round to `0.0%` and show as neutral.
const NEUTRAL_BAND: f64 = 0.05;

pub fn trend_by_change(change: Option<f64>) -> Trend {
    match change {
        Some(c) if c >= NEUTRAL_BAND => Trend::Up,
        Some(c) if c <= -NEUTRAL_BAND => Trend::Down,
        _ => Trend::Neutral,
    }
}

pub fn format_value(value: f64, value_format: &ValueFormat) -> String {
    match value_format {
        ValueFormat::Money { currency } => format::format_money(value, currency),
        ValueFormat::CompactMoney { currency } => format::format_compact_money(value, currency),
        ValueFormat::Percent { decimals } => format::format_percent(value, *decimals),
        ValueFormat::Integer => format::format_integer(value),
    }
}

/// Turns a numeric KPI record into a display card.
pub fn build_kpi(record: &KpiRecord) -> Kpi {
    let change = record
        .previous_value
        .and_then(|prev| pct_change(record.value, prev));

    Kpi {
        id: record.id.clone(),
        label: record.label.clone(),
        value: format_value(record.value, &record.format),
        trend: trend_by_change(change),
        percentage: format::format_change(change),
        change_percent: change,
    }
}

/// Orders records by `order`; records with unknown ids keep source order after them.
pub fn build_kpis(records: &[KpiRecord], order: &[IndicatorId]) -> Vec<Kpi> {
    let mut sorted: Vec<&KpiRecord> = records.iter().collect();
    sorted.sort_by_key(|r| order.iter().position(|id| *id == r.id).unwrap_or(order.len()));
    sorted.into_iter().map(build_kpi).collect()
}
