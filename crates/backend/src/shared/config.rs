use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

use crate::shared::catalog::default_fiscal_year_start;

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "DASHBOARD_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub source: SourceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Mock,
    Fixed,
    Graph,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Simulated latency of the mock source
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Seed for a reproducible mock
    #[serde(default)]
    pub seed: Option<u64>,
    /// Sunday of fiscal week 1
    #[serde(default = "default_fiscal_year_start")]
    pub fiscal_year_start: NaiveDate,
    #[serde(default)]
    pub graph: Option<GraphConfig>,
}

/// Workbook API connection. The access token is issued elsewhere.
#[derive(Debug, Deserialize, Clone)]
pub struct GraphConfig {
    #[serde(default = "default_graph_base_url")]
    pub base_url: String,
    pub site_id: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub files: GraphFiles,
}

/// Drive item ids of the workbooks.
#[derive(Debug, Deserialize, Clone)]
pub struct GraphFiles {
    pub daily_sales: String,
    pub hourly_sales: String,
    pub kpis: String,
    pub customers: String,
}

fn default_latency_ms() -> u64 {
    400
}

fn default_graph_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[source]
kind = "mock"
latency_ms = 400
fiscal_year_start = "2024-01-14"
"#;

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(contents)?)
}

/// Load configuration
///
/// Search order:
/// 1. File named by `DASHBOARD_CONFIG`
/// 2. config.toml next to the executable
/// 3. Embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        let path = PathBuf::from(path);
        tracing::info!("Loading config from {}: {}", CONFIG_ENV, path.display());
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        return parse_config(&contents);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.source.kind, SourceKind::Mock);
        assert_eq!(config.source.latency_ms, 400);
        assert!(config.source.seed.is_none());
        assert!(config.source.graph.is_none());
        assert_eq!(
            config.source.fiscal_year_start,
            NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()
        );
    }

    #[test]
    fn test_graph_config_defaults() {
        let config = parse_config(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [source]
            kind = "graph"

            [source.graph]
            site_id = "contoso.sharepoint.com,1,2"

            [source.graph.files]
            daily_sales = "item-daily"
            hourly_sales = "item-hourly"
            kpis = "item-kpis"
            customers = "item-customers"
            "#,
        )
        .unwrap();

        let graph = config.source.graph.unwrap();
        assert_eq!(graph.base_url, "https://graph.microsoft.com/v1.0");
        assert_eq!(graph.timeout_secs, 30);
        assert!(graph.access_token.is_none());
        assert_eq!(graph.files.kpis, "item-kpis");
    }

    #[test]
    fn test_unknown_source_kind_is_rejected() {
        let result = parse_config(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [source]
            kind = "sqlite"
            "#,
        );
        assert!(result.is_err());
    }
}
