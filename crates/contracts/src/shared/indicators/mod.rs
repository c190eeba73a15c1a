use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Indicator identity & display metadata
// ---------------------------------------------------------------------------

/// Unique indicator identifier, used as key in KPI sheets and API responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndicatorId(pub String);

impl IndicatorId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// How to format the numeric value at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ValueFormat {
    /// `$345`
    Money { currency: String },
    /// `$4.2M`, `$12.5K`
    CompactMoney { currency: String },
    /// `3.2%`
    Percent { decimals: u8 },
    /// `1,234`
    Integer,
}

/// Direction of the indicator relative to the previous period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Neutral,
}

impl Trend {
    /// For measures where lower is better (returns).
    pub fn inverted(self) -> Self {
        match self {
            Trend::Up => Trend::Down,
            Trend::Down => Trend::Up,
            Trend::Neutral => Trend::Neutral,
        }
    }
}

// ---------------------------------------------------------------------------
// Raw and display values
// ---------------------------------------------------------------------------

/// Numeric KPI as read from the record source. Source of truth for a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRecord {
    pub id: IndicatorId,
    pub label: String,
    pub value: f64,
    /// Value for the previous comparable period.
    pub previous_value: Option<f64>,
    pub format: ValueFormat,
}

/// Display-ready KPI card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub id: IndicatorId,
    pub label: String,
    /// Formatted value, e.g. "$4.2M"
    pub value: String,
    pub trend: Trend,
    /// Formatted change, e.g. "+12.5%"
    pub percentage: String,
    /// Numeric change behind `percentage`, `None` when undefined.
    pub change_percent: Option<f64>,
}
