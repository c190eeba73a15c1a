pub mod d410_store_performance;
pub mod d411_sales_overview;
