//! Record sources: the boundary the dashboard reads raw sales rows from.
//!
//! The aggregator never generates data itself; it asks a `RecordSource` picked at
//! startup (`build_source`). Every call is a fresh read: sources keep no cache.

pub mod fixed;
pub mod graph;
pub mod mock;
#[cfg(test)]
pub mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use contracts::dashboards::d410_store_performance::{DailyPerformance, DayDetail};
use contracts::dashboards::d411_sales_overview::{CustomerSale, StoreSale};
use contracts::shared::indicators::KpiRecord;
use thiserror::Error;

use crate::shared::catalog::ResolvedFilter;
use crate::shared::config::{SourceConfig, SourceKind};
use crate::shared::indicators::metadata::{ids, record};

/// Failures at the source boundary.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("record source unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("workbook API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed data: {0}")]
    Malformed(String),

    #[error("source configuration error: {0}")]
    Configuration(String),
}

/// Reader of raw dashboard records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Exactly 7 rows, Sunday..Saturday of the filtered week.
    async fn fetch_daily_records(
        &self,
        filter: &ResolvedFilter,
    ) -> Result<Vec<DailyPerformance>, SourceError>;

    /// Exactly 13 rows, 8am..8pm, for one day of the filtered week.
    async fn fetch_hourly_records(
        &self,
        day: &str,
        filter: &ResolvedFilter,
    ) -> Result<Vec<DayDetail>, SourceError>;

    async fn fetch_store_sales(&self) -> Result<Vec<StoreSale>, SourceError>;

    async fn fetch_customer_sales(&self) -> Result<Vec<CustomerSale>, SourceError>;

    async fn fetch_kpi_records(&self) -> Result<Vec<KpiRecord>, SourceError>;
}

/// Creates the source selected in config.
pub fn build_source(config: &SourceConfig) -> anyhow::Result<Arc<dyn RecordSource>> {
    let source: Arc<dyn RecordSource> = match config.kind {
        SourceKind::Mock => Arc::new(mock::MockSharePointSource::new(
            config.latency_ms,
            config.seed,
            config.fiscal_year_start,
        )),
        SourceKind::Fixed => Arc::new(fixed::FixedRecordSource::new(config.fiscal_year_start)),
        SourceKind::Graph => {
            let graph = config
                .graph
                .clone()
                .ok_or_else(|| anyhow::anyhow!("[source.graph] section is required for kind = \"graph\""))?;
            Arc::new(graph::GraphWorkbookSource::new(graph, config.fiscal_year_start)?)
        }
    };
    tracing::info!("Record source: {}", source.name());
    Ok(source)
}

/// Synthetic daily base sales for the filter scope. Region wins over store.
pub fn base_sales(filter: &ResolvedFilter) -> f64 {
    if filter.filter.region().is_some() {
        7000.0
    } else if filter.filter.store().is_some() {
        8000.0
    } else {
        5000.0
    }
}

/// Hours with lunch and after-work traffic.
pub fn is_peak_hour(hour: &str) -> bool {
    matches!(hour, "12pm" | "1pm" | "5pm" | "6pm")
}

/// Company-wide KPI figures published with the demo workbook.
pub fn demo_kpi_records() -> Vec<KpiRecord> {
    vec![
        record(ids::total_revenue(), 4_200_000.0, Some(4_200_000.0 / 1.125)),
        record(ids::avg_order_value(), 345.0, Some(345.0 / 1.042)),
        record(ids::active_customers(), 1234.0, Some(1234.0 / 0.979)),
        record(ids::conversion_rate(), 3.2, Some(3.2)),
    ]
}
