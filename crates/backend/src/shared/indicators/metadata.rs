use contracts::shared::indicators::*;

/// Well-known indicator IDs (constants to avoid typos).
pub mod ids {
    use super::*;

    pub fn total_revenue() -> IndicatorId {
        IndicatorId::new("total_revenue")
    }
    pub fn avg_order_value() -> IndicatorId {
        IndicatorId::new("avg_order_value")
    }
    pub fn active_customers() -> IndicatorId {
        IndicatorId::new("active_customers")
    }
    pub fn conversion_rate() -> IndicatorId {
        IndicatorId::new("conversion_rate")
    }
}

pub const CURRENCY: &str = "$";

/// Label and format of a known indicator, `None` for ids outside the overview set.
pub fn describe(id: &IndicatorId) -> Option<(&'static str, ValueFormat)> {
    let meta = match id.0.as_str() {
        "total_revenue" => (
            "Total Revenue",
            ValueFormat::CompactMoney {
                currency: CURRENCY.into(),
            },
        ),
        "avg_order_value" => (
            "Avg Order Value",
            ValueFormat::Money {
                currency: CURRENCY.into(),
            },
        ),
        "active_customers" => ("Active Customers", ValueFormat::Integer),
        "conversion_rate" => ("Conversion Rate", ValueFormat::Percent { decimals: 1 }),
        _ => return None,
    };
    Some(meta)
}

/// Builds a KPI record for a known indicator.
pub fn record(id: IndicatorId, value: f64, previous_value: Option<f64>) -> KpiRecord {
    let (label, format) = describe(&id).unwrap_or(("", ValueFormat::Integer));
    let label = if label.is_empty() {
        id.0.clone()
    } else {
        label.to_string()
    };
    KpiRecord {
        id,
        label,
        value,
        previous_value,
        format,
    }
}

/// Order of the cards on the overview page.
pub fn overview_set() -> Vec<IndicatorId> {
    vec![
        ids::total_revenue(),
        ids::avg_order_value(),
        ids::active_customers(),
        ids::conversion_rate(),
    ]
}
