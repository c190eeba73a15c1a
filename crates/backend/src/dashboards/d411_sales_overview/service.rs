use anyhow::Result;
use contracts::dashboards::d411_sales_overview::{CustomerSale, OverviewResponse, StoreSale};
use contracts::shared::indicators::Kpi;

use crate::shared::indicators::kpi::build_kpis;
use crate::shared::indicators::metadata::overview_set;
use crate::shared::record_source::RecordSource;

/// KPI cards in overview order.
pub async fn get_kpis(source: &dyn RecordSource) -> Result<Vec<Kpi>> {
    let records = source.fetch_kpi_records().await?;
    Ok(build_kpis(&records, &overview_set()))
}

pub async fn get_store_sales(source: &dyn RecordSource) -> Result<Vec<StoreSale>> {
    Ok(source.fetch_store_sales().await?)
}

pub async fn get_customer_sales(source: &dyn RecordSource) -> Result<Vec<CustomerSale>> {
    Ok(source.fetch_customer_sales().await?)
}

/// The three overview fetches run concurrently; the first failure fails the page.
pub async fn get_overview(source: &dyn RecordSource) -> Result<OverviewResponse> {
    let (kpis, store_sales, customer_sales) = tokio::try_join!(
        get_kpis(source),
        get_store_sales(source),
        get_customer_sales(source)
    )?;

    Ok(OverviewResponse {
        kpis,
        store_sales,
        customer_sales,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::record_source::mock::MockSharePointSource;
    use crate::shared::record_source::testing::{fixed, FailingSource};
    use crate::shared::record_source::SourceError;
    use contracts::shared::indicators::Trend;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_overview_from_fixed_source() {
        let overview = get_overview(&fixed()).await.unwrap();

        let labels: Vec<&str> = overview.kpis.iter().map(|k| k.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Total Revenue",
                "Avg Order Value",
                "Active Customers",
                "Conversion Rate"
            ]
        );
        assert_eq!(overview.kpis[0].value, "$4.2M");
        assert_eq!(overview.kpis[0].trend, Trend::Up);
        assert_eq!(overview.kpis[0].percentage, "+12.5%");
        assert_eq!(overview.kpis[2].value, "1,234");
        assert_eq!(overview.kpis[2].trend, Trend::Down);
        assert_eq!(overview.kpis[3].trend, Trend::Neutral);

        assert_eq!(overview.store_sales.len(), 6);
        assert_eq!(overview.store_sales[0].growth, Some(20.0));
        assert_eq!(overview.customer_sales.len(), 10);
    }

    #[tokio::test]
    async fn test_overview_fails_as_a_whole() {
        let err = get_overview(&FailingSource).await.unwrap_err();
        assert!(err.downcast_ref::<SourceError>().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overview_fetches_run_concurrently() {
        let source = MockSharePointSource::new(
            150,
            Some(1),
            crate::shared::catalog::default_fiscal_year_start(),
        );
        let started = Instant::now();
        get_overview(&source).await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(150));
        assert!(elapsed < Duration::from_millis(300));
    }
}
