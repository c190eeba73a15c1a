use serde::{Deserialize, Serialize};

use crate::shared::indicators::Kpi;

/// Yearly sales rollup of one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSale {
    pub store_id: String,
    pub store_name: String,
    pub region: String,
    pub current_year_sales: f64,
    pub previous_year_sales: f64,
    /// `None` when previous year sales are zero
    pub growth: Option<f64>,
}

/// Customer activity status.
///
/// Shipped record sources only ever emit `Active` and `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerStatus {
    Active,
    Inactive,
    New,
}

/// Yearly sales rollup of one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSale {
    pub customer_id: String,
    pub customer_name: String,
    pub current_year_sales: f64,
    pub previous_year_sales: f64,
    pub status: CustomerStatus,
    pub growth: Option<f64>,
}

/// Response for the overview page: KPI cards, store chart and customer list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub kpis: Vec<Kpi>,
    pub store_sales: Vec<StoreSale>,
    pub customer_sales: Vec<CustomerSale>,
}
