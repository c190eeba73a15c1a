use axum::{extract::State, http::StatusCode, Json};
use contracts::dashboards::d411_sales_overview::{CustomerSale, OverviewResponse, StoreSale};
use contracts::shared::indicators::Kpi;

use super::status_for;
use crate::api::AppState;
use crate::dashboards::d411_sales_overview::service;

/// GET /api/d411/overview
pub async fn get_overview(
    State(state): State<AppState>,
) -> Result<Json<OverviewResponse>, StatusCode> {
    tracing::info!("D411 Dashboard: Getting overview");

    match service::get_overview(state.source.as_ref()).await {
        Ok(response) => {
            tracing::info!(
                "D411 Dashboard: Returning {} KPIs, {} stores, {} customers",
                response.kpis.len(),
                response.store_sales.len(),
                response.customer_sales.len()
            );
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!("D411 Dashboard: Failed to get overview: {}", e);
            Err(status_for(&e))
        }
    }
}

/// GET /api/d411/kpis
pub async fn get_kpis(State(state): State<AppState>) -> Result<Json<Vec<Kpi>>, StatusCode> {
    match service::get_kpis(state.source.as_ref()).await {
        Ok(kpis) => {
            tracing::info!("D411 Dashboard: Returning {} KPIs", kpis.len());
            Ok(Json(kpis))
        }
        Err(e) => {
            tracing::error!("D411 Dashboard: Failed to get KPIs: {}", e);
            Err(status_for(&e))
        }
    }
}

/// GET /api/d411/store_sales
pub async fn get_store_sales(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoreSale>>, StatusCode> {
    match service::get_store_sales(state.source.as_ref()).await {
        Ok(stores) => {
            tracing::info!("D411 Dashboard: Returning {} store sales", stores.len());
            Ok(Json(stores))
        }
        Err(e) => {
            tracing::error!("D411 Dashboard: Failed to get store sales: {}", e);
            Err(status_for(&e))
        }
    }
}

/// GET /api/d411/customer_sales
pub async fn get_customer_sales(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerSale>>, StatusCode> {
    match service::get_customer_sales(state.source.as_ref()).await {
        Ok(customers) => {
            tracing::info!(
                "D411 Dashboard: Returning {} customer sales",
                customers.len()
            );
            Ok(Json(customers))
        }
        Err(e) => {
            tracing::error!("D411 Dashboard: Failed to get customer sales: {}", e);
            Err(status_for(&e))
        }
    }
}
