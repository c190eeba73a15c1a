pub mod catalog;
pub mod config;
pub mod format;
pub mod indicators;
pub mod metrics;
pub mod record_source;
