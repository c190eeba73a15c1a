use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::dashboards::d410_store_performance::{DailyPerformance, DayDetail};
use contracts::dashboards::d411_sales_overview::{CustomerSale, StoreSale};
use contracts::shared::indicators::KpiRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{base_sales, demo_kpi_records, is_peak_hour, RecordSource, SourceError};
use crate::shared::catalog::{self, ResolvedFilter, DAYS, HOURS};
use crate::shared::metrics::{
    build_daily_row, compute_store_growth, customer_status, synthetic_ytd, DayFigures,
};

const CUSTOMER_COUNT: usize = 10;

/// Random-walk stand-in for the SharePoint workbooks.
///
/// Sleeps for the configured latency on every call, then generates numbers shaped
/// like the real sheets.
pub struct MockSharePointSource {
    latency: Duration,
    fiscal_year_start: NaiveDate,
    rng: Mutex<StdRng>,
}

impl MockSharePointSource {
    pub fn new(latency_ms: u64, seed: Option<u64>, fiscal_year_start: NaiveDate) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            latency: Duration::from_millis(latency_ms),
            fiscal_year_start,
            rng: Mutex::new(rng),
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }
}

#[async_trait]
impl RecordSource for MockSharePointSource {
    fn name(&self) -> &str {
        "mock-sharepoint"
    }

    async fn fetch_daily_records(
        &self,
        filter: &ResolvedFilter,
    ) -> Result<Vec<DailyPerformance>, SourceError> {
        self.simulate_latency().await;

        let base = base_sales(filter);
        let dates = catalog::week_dates(self.fiscal_year_start, filter.week_number);

        let rows = self.with_rng(|rng| {
            DAYS.iter()
                .enumerate()
                .map(|(index, day)| {
                    let net_sales = base + rng.gen::<f64>() * 4000.0 - 2000.0;
                    let ly_net_sales = net_sales * (0.9 + rng.gen::<f64>() * 0.2);
                    let figures = DayFigures {
                        net_sales,
                        gp_percent: 25.0 + rng.gen::<f64>() * 10.0,
                        ly_net_sales,
                        ly_gp_percent: 25.0 + rng.gen::<f64>() * 10.0,
                        basket_size: 45.0 + rng.gen::<f64>() * 20.0,
                    };
                    let ytd = synthetic_ytd(&figures, base, filter.week_number, index);
                    build_daily_row(day, dates[index], figures, ytd)
                })
                .collect::<Vec<_>>()
        });

        tracing::debug!(
            "Mock source: generated {} daily rows for {:?}",
            rows.len(),
            filter.filter
        );
        Ok(rows)
    }

    async fn fetch_hourly_records(
        &self,
        day: &str,
        _filter: &ResolvedFilter,
    ) -> Result<Vec<DayDetail>, SourceError> {
        self.simulate_latency().await;

        let rows = self.with_rng(|rng| {
            HOURS
                .iter()
                .map(|hour| {
                    let base = if is_peak_hour(hour) { 800.0 } else { 300.0 };

                    let sales = base + rng.gen::<f64>() * 400.0;
                    let pro_share = 0.3 + rng.gen::<f64>() * 0.2;
                    let pro_sales = sales * pro_share;
                    let retail_sales = sales - pro_sales;

                    let ly_sales = sales * (0.85 + rng.gen::<f64>() * 0.3);
                    let ly_pro_sales = ly_sales * (pro_share + (rng.gen::<f64>() * 0.05 - 0.025));
                    let ly_retail_sales = ly_sales - ly_pro_sales;

                    let returns = sales * (0.02 + rng.gen::<f64>() * 0.05);
                    let ly_returns = ly_sales * (0.02 + rng.gen::<f64>() * 0.05);

                    DayDetail {
                        hour: hour.to_string(),
                        sales,
                        retail_sales,
                        pro_sales,
                        ly_sales,
                        ly_retail_sales,
                        ly_pro_sales,
                        returns,
                        ly_returns,
                        visitors: base / 20.0 + rng.gen::<f64>() * 20.0,
                        conversion: 20.0 + rng.gen::<f64>() * 10.0,
                    }
                })
                .collect::<Vec<_>>()
        });

        tracing::debug!("Mock source: generated {} hourly rows for {}", rows.len(), day);
        Ok(rows)
    }

    async fn fetch_store_sales(&self) -> Result<Vec<StoreSale>, SourceError> {
        self.simulate_latency().await;

        Ok(self.with_rng(|rng| {
            catalog::list_stores()
                .into_iter()
                .map(|store| {
                    let current = rng.gen_range(200_000..700_000) as f64;
                    let previous = rng.gen_range(200_000..700_000) as f64;
                    StoreSale {
                        store_id: store.id,
                        store_name: store.name,
                        region: store.region,
                        current_year_sales: current,
                        previous_year_sales: previous,
                        growth: compute_store_growth(current, previous),
                    }
                })
                .collect()
        }))
    }

    async fn fetch_customer_sales(&self) -> Result<Vec<CustomerSale>, SourceError> {
        self.simulate_latency().await;

        Ok(self.with_rng(|rng| {
            (0..CUSTOMER_COUNT)
                .map(|i| {
                    let current = rng.gen_range(5_000..55_000) as f64;
                    let previous = rng.gen_range(5_000..45_000) as f64;
                    CustomerSale {
                        customer_id: format!("CUST-{}", i + 100),
                        customer_name: format!("Customer {}", (b'A' + i as u8) as char),
                        current_year_sales: current,
                        previous_year_sales: previous,
                        status: customer_status(current, previous),
                        growth: compute_store_growth(current, previous),
                    }
                })
                .collect()
        }))
    }

    async fn fetch_kpi_records(&self) -> Result<Vec<KpiRecord>, SourceError> {
        self.simulate_latency().await;
        Ok(demo_kpi_records())
    }
}
