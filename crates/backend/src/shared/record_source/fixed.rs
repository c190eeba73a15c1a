use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::dashboards::d410_store_performance::{DailyPerformance, DayDetail};
use contracts::dashboards::d411_sales_overview::{CustomerSale, StoreSale};
use contracts::shared::indicators::KpiRecord;

use super::{base_sales, demo_kpi_records, is_peak_hour, RecordSource, SourceError};
use crate::shared::catalog::{self, ResolvedFilter, DAYS, HOURS};
use crate::shared::metrics::{
    build_daily_row, compute_store_growth, customer_status, synthetic_ytd, DayFigures,
};

/// Deterministic source: same filter, same numbers, no latency.
///
/// Net sales climb by 100 per weekday on top of the scope base, last year runs
/// at 90%, pro sales are 40% of every hour.
pub struct FixedRecordSource {
    fiscal_year_start: NaiveDate,
}

impl FixedRecordSource {
    pub fn new(fiscal_year_start: NaiveDate) -> Self {
        Self { fiscal_year_start }
    }

    pub fn day_figures(base: f64, day_index: usize) -> DayFigures {
        let net_sales = base + 100.0 * day_index as f64;
        DayFigures {
            net_sales,
            gp_percent: 30.0 + 0.5 * day_index as f64,
            ly_net_sales: net_sales * 0.9,
            ly_gp_percent: 28.0,
            basket_size: 50.0 + day_index as f64,
        }
    }

    pub fn hour_detail(hour: &str, hour_index: usize) -> DayDetail {
        let base = if is_peak_hour(hour) { 800.0 } else { 300.0 };
        let sales = base + 10.0 * hour_index as f64;
        let pro_sales = sales * 0.4;
        let ly_sales = sales * 0.9;
        let ly_pro_sales = ly_sales * 0.4;
        DayDetail {
            hour: hour.to_string(),
            sales,
            retail_sales: sales - pro_sales,
            pro_sales,
            ly_sales,
            ly_retail_sales: ly_sales - ly_pro_sales,
            ly_pro_sales,
            returns: sales * 0.05,
            ly_returns: ly_sales * 0.04,
            visitors: base / 20.0 + hour_index as f64,
            conversion: 25.0,
        }
    }
}

#[async_trait]
impl RecordSource for FixedRecordSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn fetch_daily_records(
        &self,
        filter: &ResolvedFilter,
    ) -> Result<Vec<DailyPerformance>, SourceError> {
        let base = base_sales(filter);
        let dates = catalog::week_dates(self.fiscal_year_start, filter.week_number);

        Ok(DAYS
            .iter()
            .enumerate()
            .map(|(index, day)| {
                let figures = Self::day_figures(base, index);
                let ytd = synthetic_ytd(&figures, base, filter.week_number, index);
                build_daily_row(day, dates[index], figures, ytd)
            })
            .collect())
    }

    async fn fetch_hourly_records(
        &self,
        _day: &str,
        _filter: &ResolvedFilter,
    ) -> Result<Vec<DayDetail>, SourceError> {
        Ok(HOURS
            .iter()
            .enumerate()
            .map(|(index, hour)| Self::hour_detail(hour, index))
            .collect())
    }

    async fn fetch_store_sales(&self) -> Result<Vec<StoreSale>, SourceError> {
        Ok(catalog::list_stores()
            .into_iter()
            .enumerate()
            .map(|(i, store)| {
                let current = 300_000.0 + 50_000.0 * i as f64;
                let previous = 250_000.0 + 60_000.0 * i as f64;
                StoreSale {
                    store_id: store.id,
                    store_name: store.name,
                    region: store.region,
                    current_year_sales: current,
                    previous_year_sales: previous,
                    growth: compute_store_growth(current, previous),
                }
            })
            .collect())
    }

    async fn fetch_customer_sales(&self) -> Result<Vec<CustomerSale>, SourceError> {
        Ok((0..10)
            .map(|i| {
                let current = 20_000.0 + 3_000.0 * i as f64;
                let previous = 35_000.0 - 1_000.0 * i as f64;
                CustomerSale {
                    customer_id: format!("CUST-{}", i + 100),
                    customer_name: format!("Customer {}", (b'A' + i as u8) as char),
                    current_year_sales: current,
                    previous_year_sales: previous,
                    status: customer_status(current, previous),
                    growth: compute_store_growth(current, previous),
                }
            })
            .collect())
    }

    async fn fetch_kpi_records(&self) -> Result<Vec<KpiRecord>, SourceError> {
        Ok(demo_kpi_records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d411_sales_overview::CustomerStatus;
    use contracts::domain::a030_store::StoreFilter;

    fn resolved(store_id: &str, region: &str, week: &str) -> ResolvedFilter {
        catalog::resolve_filter(&StoreFilter::new(store_id, region, week)).unwrap()
    }

    #[tokio::test]
    async fn test_daily_rows_are_deterministic() {
        let source = FixedRecordSource::new(catalog::default_fiscal_year_start());
        let filter = resolved("S001", "", "Week 2");

        let first = source.fetch_daily_records(&filter).await.unwrap();
        let second = source.fetch_daily_records(&filter).await.unwrap();
        assert_eq!(first, second);

        assert_eq!(first.len(), 7);
        assert_eq!(first[0].day, "Sunday");
        assert_eq!(first[0].net_sales, 8000.0);
        assert_eq!(first[0].ytd_net_sales, 8000.0 + 7.0 * 8000.0);
        assert_eq!(first[0].date, NaiveDate::from_ymd_opt(2024, 1, 21).unwrap());
        assert_eq!(first[6].day, "Saturday");
        assert_eq!(first[6].net_sales, 8600.0);
    }

    #[tokio::test]
    async fn test_scope_changes_base() {
        let source = FixedRecordSource::new(catalog::default_fiscal_year_start());
        let all = source.fetch_daily_records(&resolved("", "", "")).await.unwrap();
        let region = source
            .fetch_daily_records(&resolved("S001", "Nova Scotia", ""))
            .await
            .unwrap();
        assert_eq!(all[0].net_sales, 5000.0);
        assert_eq!(region[0].net_sales, 7000.0);
    }

    #[tokio::test]
    async fn test_customer_statuses() {
        let source = FixedRecordSource::new(catalog::default_fiscal_year_start());
        let customers = source.fetch_customer_sales().await.unwrap();
        assert_eq!(customers[0].status, CustomerStatus::Inactive);
        assert_eq!(customers[9].status, CustomerStatus::Active);
    }
}
