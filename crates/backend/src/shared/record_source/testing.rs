//! Sources for tests: failing, empty, short and gated variants.

use std::sync::Arc;

use async_trait::async_trait;
use contracts::dashboards::d410_store_performance::{DailyPerformance, DayDetail};
use contracts::dashboards::d411_sales_overview::{CustomerSale, StoreSale};
use contracts::shared::indicators::KpiRecord;
use tokio::sync::Notify;

use super::fixed::FixedRecordSource;
use super::{RecordSource, SourceError};
use crate::shared::catalog::{self, ResolvedFilter};

pub fn fixed() -> FixedRecordSource {
    FixedRecordSource::new(catalog::default_fiscal_year_start())
}

fn unavailable() -> SourceError {
    SourceError::Unavailable("workbook offline".to_string())
}

pub struct FailingSource;

#[async_trait]
impl RecordSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch_daily_records(
        &self,
        _filter: &ResolvedFilter,
    ) -> Result<Vec<DailyPerformance>, SourceError> {
        Err(unavailable())
    }

    async fn fetch_hourly_records(
        &self,
        _day: &str,
        _filter: &ResolvedFilter,
    ) -> Result<Vec<DayDetail>, SourceError> {
        Err(unavailable())
    }

    async fn fetch_store_sales(&self) -> Result<Vec<StoreSale>, SourceError> {
        Err(unavailable())
    }

    async fn fetch_customer_sales(&self) -> Result<Vec<CustomerSale>, SourceError> {
        Err(unavailable())
    }

    async fn fetch_kpi_records(&self) -> Result<Vec<KpiRecord>, SourceError> {
        Err(unavailable())
    }
}

/// Workbook with no rows at all.
pub struct EmptySource;

#[async_trait]
impl RecordSource for EmptySource {
    fn name(&self) -> &str {
        "empty"
    }

    async fn fetch_daily_records(
        &self,
        _filter: &ResolvedFilter,
    ) -> Result<Vec<DailyPerformance>, SourceError> {
        Ok(Vec::new())
    }

    async fn fetch_hourly_records(
        &self,
        _day: &str,
        _filter: &ResolvedFilter,
    ) -> Result<Vec<DayDetail>, SourceError> {
        Ok(Vec::new())
    }

    async fn fetch_store_sales(&self) -> Result<Vec<StoreSale>, SourceError> {
        Ok(Vec::new())
    }

    async fn fetch_customer_sales(&self) -> Result<Vec<CustomerSale>, SourceError> {
        Ok(Vec::new())
    }

    async fn fetch_kpi_records(&self) -> Result<Vec<KpiRecord>, SourceError> {
        Ok(Vec::new())
    }
}

/// Fixed data cut down to the first three days and hours.
pub struct ShortWeekSource;

#[async_trait]
impl RecordSource for ShortWeekSource {
    fn name(&self) -> &str {
        "short-week"
    }

    async fn fetch_daily_records(
        &self,
        filter: &ResolvedFilter,
    ) -> Result<Vec<DailyPerformance>, SourceError> {
        let mut rows = fixed().fetch_daily_records(filter).await?;
        rows.truncate(3);
        Ok(rows)
    }

    async fn fetch_hourly_records(
        &self,
        day: &str,
        filter: &ResolvedFilter,
    ) -> Result<Vec<DayDetail>, SourceError> {
        let mut rows = fixed().fetch_hourly_records(day, filter).await?;
        rows.truncate(3);
        Ok(rows)
    }

    async fn fetch_store_sales(&self) -> Result<Vec<StoreSale>, SourceError> {
        fixed().fetch_store_sales().await
    }

    async fn fetch_customer_sales(&self) -> Result<Vec<CustomerSale>, SourceError> {
        fixed().fetch_customer_sales().await
    }

    async fn fetch_kpi_records(&self) -> Result<Vec<KpiRecord>, SourceError> {
        fixed().fetch_kpi_records().await
    }
}

/// Fixed data, except that daily fetches for `gated_store` wait until `release`
/// and then succeed, or fail when built with `failing`.
pub struct GatedSource {
    inner: FixedRecordSource,
    gated_store: String,
    fail_gated: bool,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl GatedSource {
    pub fn new(gated_store: &str) -> Self {
        Self {
            inner: fixed(),
            gated_store: gated_store.to_string(),
            fail_gated: false,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    pub fn failing(gated_store: &str) -> Self {
        Self {
            fail_gated: true,
            ..Self::new(gated_store)
        }
    }
}

#[async_trait]
impl RecordSource for GatedSource {
    fn name(&self) -> &str {
        "gated"
    }

    async fn fetch_daily_records(
        &self,
        filter: &ResolvedFilter,
    ) -> Result<Vec<DailyPerformance>, SourceError> {
        if filter.filter.store_id == self.gated_store {
            self.entered.notify_one();
            self.release.notified().await;
            if self.fail_gated {
                return Err(unavailable());
            }
        }
        self.inner.fetch_daily_records(filter).await
    }

    async fn fetch_hourly_records(
        &self,
        day: &str,
        filter: &ResolvedFilter,
    ) -> Result<Vec<DayDetail>, SourceError> {
        self.inner.fetch_hourly_records(day, filter).await
    }

    async fn fetch_store_sales(&self) -> Result<Vec<StoreSale>, SourceError> {
        self.inner.fetch_store_sales().await
    }

    async fn fetch_customer_sales(&self) -> Result<Vec<CustomerSale>, SourceError> {
        self.inner.fetch_customer_sales().await
    }

    async fn fetch_kpi_records(&self) -> Result<Vec<KpiRecord>, SourceError> {
        self.inner.fetch_kpi_records().await
    }
}
