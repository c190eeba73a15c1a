use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use contracts::dashboards::d410_store_performance::{
    DailyPerformanceResponse, DaySummaryRequest, DaySummaryResponse,
};
use contracts::domain::a030_store::StoreFilter;

use super::status_for;
use crate::api::AppState;
use crate::dashboards::d410_store_performance::service;

/// GET /api/d410/daily_performance?store_id=S001&region=&week=Week%203
pub async fn get_daily_performance(
    State(state): State<AppState>,
    Query(filter): Query<StoreFilter>,
) -> Result<Json<DailyPerformanceResponse>, StatusCode> {
    tracing::info!("D410 Dashboard: Getting daily performance for {:?}", filter);

    match service::get_daily_performance(state.source.as_ref(), &filter).await {
        Ok(response) => {
            tracing::info!(
                "D410 Dashboard: Returning {} rows for week {}",
                response.rows.len(),
                response.week_number
            );
            Ok(Json(response))
        }
        Err(e) => {
            let status = status_for(&e);
            if status == StatusCode::BAD_REQUEST {
                tracing::warn!("D410 Dashboard: Rejected filter: {}", e);
            } else {
                tracing::error!("D410 Dashboard: Failed to get daily performance: {}", e);
            }
            Err(status)
        }
    }
}

/// GET /api/d410/day_summary?day=Monday&store_id=&region=&week=Week%203
pub async fn get_day_summary(
    State(state): State<AppState>,
    Query(request): Query<DaySummaryRequest>,
) -> Result<Json<DaySummaryResponse>, StatusCode> {
    tracing::info!(
        "D410 Dashboard: Getting day summary for {} ({:?})",
        request.day,
        request.filter
    );

    match service::get_day_summary(state.source.as_ref(), &request).await {
        Ok(response) => {
            tracing::info!(
                "D410 Dashboard: Returning {} hourly rows for {}",
                response.summary.hourly_data.len(),
                response.day
            );
            Ok(Json(response))
        }
        Err(e) => {
            let status = status_for(&e);
            if status == StatusCode::BAD_REQUEST {
                tracing::warn!("D410 Dashboard: Rejected day summary request: {}", e);
            } else {
                tracing::error!("D410 Dashboard: Failed to get day summary: {}", e);
            }
            Err(status)
        }
    }
}
