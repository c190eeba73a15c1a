use anyhow::Result;
use contracts::dashboards::d410_store_performance::{
    DailyPerformanceResponse, DaySummaryRequest, DaySummaryResponse,
};
use contracts::domain::a030_store::StoreFilter;

use crate::shared::catalog::{self, ResolvedFilter, DAYS, HOURS};
use crate::shared::metrics::{compute_day_summary, compute_performance_totals};
use crate::shared::record_source::{RecordSource, SourceError};

/// Validate the filter and fetch the week for it.
pub async fn get_daily_performance(
    source: &dyn RecordSource,
    filter: &StoreFilter,
) -> Result<DailyPerformanceResponse> {
    let resolved = catalog::resolve_filter(filter)?;
    apply_filters(source, &resolved).await
}

/// Fresh fetch of the 7 daily rows for an already validated filter.
///
/// A source with nothing for the filter yields empty rows and zero totals.
pub async fn apply_filters(
    source: &dyn RecordSource,
    filter: &ResolvedFilter,
) -> Result<DailyPerformanceResponse> {
    let rows = source.fetch_daily_records(filter).await?;

    if !rows.is_empty() && rows.len() != DAYS.len() {
        return Err(SourceError::Malformed(format!(
            "expected {} daily rows, got {}",
            DAYS.len(),
            rows.len()
        ))
        .into());
    }

    let totals = compute_performance_totals(&rows);

    Ok(DailyPerformanceResponse {
        filter: filter.filter.clone(),
        week_number: filter.week_number,
        rows,
        totals,
    })
}

/// Hourly breakdown of one day of the filtered week. No hourly rows give a
/// zeroed summary.
pub async fn get_day_summary(
    source: &dyn RecordSource,
    request: &DaySummaryRequest,
) -> Result<DaySummaryResponse> {
    let day = DAYS[catalog::day_index(&request.day)?];
    let resolved = catalog::resolve_filter(&request.filter)?;

    let hourly = source.fetch_hourly_records(day, &resolved).await?;
    if !hourly.is_empty() && hourly.len() != HOURS.len() {
        return Err(SourceError::Malformed(format!(
            "expected {} hourly rows for {}, got {}",
            HOURS.len(),
            day,
            hourly.len()
        ))
        .into());
    }

    Ok(DaySummaryResponse {
        day: day.to_string(),
        filter: resolved.filter,
        summary: compute_day_summary(hourly),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::catalog::FilterError;
    use crate::shared::record_source::testing::{fixed, EmptySource, FailingSource, ShortWeekSource};

    #[tokio::test]
    async fn test_daily_performance_for_every_filter_shape() {
        let source = fixed();
        for filter in [
            StoreFilter::default(),
            StoreFilter::new("S003", "", "Week 10"),
            StoreFilter::new("", "Prince Edward Island", "Week 52"),
            StoreFilter::new("S006", "New Brunswick", " Week 4 "),
        ] {
            let response = get_daily_performance(&source, &filter).await.unwrap();
            let days: Vec<&str> = response.rows.iter().map(|r| r.day.as_str()).collect();
            assert_eq!(days, DAYS.to_vec());
        }
    }

    #[tokio::test]
    async fn test_daily_performance_totals_and_normalized_filter() {
        let response = get_daily_performance(&fixed(), &StoreFilter::new("S001", "", ""))
            .await
            .unwrap();
        assert_eq!(response.week_number, 1);
        assert_eq!(response.filter.week, "Week 1");
        assert_eq!(response.totals.net_sales, 7.0 * 8000.0 + 2100.0);
        let yoy = response.totals.yoy_net_sales_percent.unwrap();
        assert!((yoy - 11.111111).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_invalid_filter_is_rejected_before_fetch() {
        let err = get_daily_performance(&FailingSource, &StoreFilter::new("S005", "Nova Scotia", ""))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FilterError>(),
            Some(FilterError::StoreOutsideRegion { .. })
        ));
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let err = get_daily_performance(&FailingSource, &StoreFilter::default())
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<SourceError>().is_some());

        let request = DaySummaryRequest {
            day: "Monday".into(),
            filter: StoreFilter::default(),
        };
        assert!(get_day_summary(&FailingSource, &request).await.is_err());
    }

    #[tokio::test]
    async fn test_day_summary() {
        let request = DaySummaryRequest {
            day: "wednesday".into(),
            filter: StoreFilter::new("", "Nova Scotia", "Week 2"),
        };
        let response = get_day_summary(&fixed(), &request).await.unwrap();
        assert_eq!(response.day, "Wednesday");
        assert_eq!(response.filter.week, "Week 2");

        let summary = &response.summary;
        assert_eq!(summary.hourly_data.len(), 13);
        assert_eq!(summary.hourly_data[0].hour, "8am");
        assert_eq!(summary.hourly_data[12].hour, "8pm");
        for hour in &summary.hourly_data {
            assert!((hour.sales - (hour.retail_sales + hour.pro_sales)).abs() < 1e-9);
        }
        assert!((summary.sales_mix.pro_percent - 40.0).abs() < 1e-9);
        assert!((summary.returns_percent - 5.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_day_is_rejected() {
        let request = DaySummaryRequest {
            day: "Someday".into(),
            filter: StoreFilter::default(),
        };
        let err = get_day_summary(&fixed(), &request).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<FilterError>(),
            Some(&FilterError::UnknownDay("Someday".into()))
        );
    }

    #[tokio::test]
    async fn test_empty_source_gives_empty_results() {
        let response = get_daily_performance(&EmptySource, &StoreFilter::new("S004", "", "Week 9"))
            .await
            .unwrap();
        assert!(response.rows.is_empty());
        assert_eq!(response.week_number, 9);
        assert_eq!(response.totals.net_sales, 0.0);
        assert_eq!(response.totals.yoy_net_sales_percent, None);

        let request = DaySummaryRequest {
            day: "Monday".into(),
            filter: StoreFilter::default(),
        };
        let summary = get_day_summary(&EmptySource, &request).await.unwrap().summary;
        assert!(summary.hourly_data.is_empty());
        assert_eq!(summary.retail_total, 0.0);
        assert_eq!(summary.returns_percent, 0.0);
        assert_eq!(summary.vs_last_year.total_change_percent, None);
    }

    #[tokio::test]
    async fn test_partial_week_is_rejected() {
        let err = get_daily_performance(&ShortWeekSource, &StoreFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::Malformed(_))
        ));
    }
}
