use axum::{extract::Query, Json};
use contracts::domain::a030_store::Store;
use serde::Deserialize;

use crate::shared::catalog;

#[derive(Debug, Default, Deserialize)]
pub struct StoresQuery {
    #[serde(default)]
    pub region: String,
}

/// GET /api/catalog/stores?region=Nova%20Scotia
pub async fn list_stores(Query(query): Query<StoresQuery>) -> Json<Vec<Store>> {
    let stores = catalog::stores_by_region(query.region.trim());
    tracing::info!(
        "Catalog: {} stores for region {:?}",
        stores.len(),
        query.region
    );
    Json(stores)
}

/// GET /api/catalog/regions
pub async fn list_regions() -> Json<Vec<String>> {
    Json(catalog::list_regions())
}

/// GET /api/catalog/weeks
pub async fn list_weeks() -> Json<Vec<String>> {
    Json(catalog::list_weeks())
}
