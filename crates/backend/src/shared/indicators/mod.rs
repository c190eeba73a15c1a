pub mod kpi;
pub mod metadata;
