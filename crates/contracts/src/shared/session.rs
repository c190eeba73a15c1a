use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dashboards::d410_store_performance::DailyPerformanceResponse;
use crate::domain::a030_store::StoreFilter;

/// Dashboard page currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardTab {
    Overview,
    #[default]
    Stores,
    Customers,
    Settings,
}

/// Snapshot of one dashboard session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub active_tab: DashboardTab,
    pub filter: StoreFilter,
    /// Bumped on every filter change
    pub generation: u64,
    /// Last daily result committed for the current filter
    pub daily: Option<DailyPerformanceResponse>,
}

/// Body of `PUT /api/session/:id/filter`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFilterRequest {
    pub region: Option<String>,
    pub store_id: Option<String>,
    pub week: Option<String>,
}

/// Body of `PUT /api/session/:id/tab`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTabRequest {
    pub tab: DashboardTab,
}

/// Outcome of a daily refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// Result committed to the session.
    Applied { data: DailyPerformanceResponse },
    /// Filter changed while the fetch was in flight; result discarded.
    Superseded { generation: u64 },
    /// Active tab does not show daily data.
    Skipped { active_tab: DashboardTab },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_and_outcome_wire_format() {
        assert_eq!(serde_json::to_string(&DashboardTab::Stores).unwrap(), "\"stores\"");

        let outcome = RefreshOutcome::Superseded { generation: 3 };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "superseded");
        assert_eq!(json["generation"], 3);

        let skipped: RefreshOutcome =
            serde_json::from_str(r#"{"status":"skipped","active_tab":"overview"}"#).unwrap();
        assert!(matches!(
            skipped,
            RefreshOutcome::Skipped {
                active_tab: DashboardTab::Overview
            }
        ));
    }

    #[test]
    fn test_partial_filter_update() {
        let update: UpdateFilterRequest = serde_json::from_str(r#"{"week":"Week 2"}"#).unwrap();
        assert_eq!(update.week.as_deref(), Some("Week 2"));
        assert!(update.region.is_none());
        assert!(update.store_id.is_none());
    }
}
