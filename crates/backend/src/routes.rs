use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{handlers, AppState};
use crate::shared::format::format_number;

/// Logs status, duration and body size of every response.
async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(
                "{} {} {} | {}ms | body error: {}",
                parts.status.as_u16(),
                method,
                uri.path(),
                start.elapsed().as_millis(),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    tracing::info!(
        "{} {} {} | {}ms | {} bytes",
        parts.status.as_u16(),
        method,
        uri.path(),
        start.elapsed().as_millis(),
        format_number(bytes.len() as u64)
    );

    Response::from_parts(parts, Body::from(bytes))
}

/// All application routes
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // CATALOG
        // ========================================
        .route("/api/catalog/stores", get(handlers::catalog::list_stores))
        .route("/api/catalog/regions", get(handlers::catalog::list_regions))
        .route("/api/catalog/weeks", get(handlers::catalog::list_weeks))
        // ========================================
        // D410 STORE PERFORMANCE
        // ========================================
        .route(
            "/api/d410/daily_performance",
            get(handlers::d410_store_performance::get_daily_performance),
        )
        .route(
            "/api/d410/day_summary",
            get(handlers::d410_store_performance::get_day_summary),
        )
        // ========================================
        // D411 SALES OVERVIEW
        // ========================================
        .route(
            "/api/d411/overview",
            get(handlers::d411_sales_overview::get_overview),
        )
        .route("/api/d411/kpis", get(handlers::d411_sales_overview::get_kpis))
        .route(
            "/api/d411/store_sales",
            get(handlers::d411_sales_overview::get_store_sales),
        )
        .route(
            "/api/d411/customer_sales",
            get(handlers::d411_sales_overview::get_customer_sales),
        )
        // ========================================
        // SESSIONS
        // ========================================
        .route("/api/session", post(handlers::session::create_session))
        .route(
            "/api/session/:id",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route(
            "/api/session/:id/filter",
            put(handlers::session::update_filter),
        )
        .route("/api/session/:id/tab", put(handlers::session::update_tab))
        .route("/api/session/:id/refresh", post(handlers::session::refresh))
        .with_state(state)
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
}
