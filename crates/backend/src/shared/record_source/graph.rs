//! Reader for sales workbooks stored in a SharePoint document library.
//!
//! Rows are read through the Microsoft Graph workbook API as JSON cell arrays
//! (`/workbook/worksheets/{sheet}/tables/{table}/rows`). Workbook layout:
//!
//! | Workbook              | Sheet/Table | Columns                                                                                          |
//! |-----------------------|-------------|--------------------------------------------------------------------------------------------------|
//! | DailySalesPerformance | Sales       | Date, StoreID, NetSales, GPPercent, LYNetSales, LYGPPercent, Transactions                        |
//! | HourlySalesDetail     | Hourly      | Date, StoreID, Hour, RetailSales, ProSales, Returns, LYRetailSales, LYProSales, LYReturns, Visitors, Transactions |
//! | StoreKPIs             | KPIs        | Metric, Value, PreviousValue                                                                     |
//! | CustomerSales         | Customers   | CustomerID, CustomerName, CurrentYearSales, PreviousYearSales                                    |

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use contracts::dashboards::d410_store_performance::{DailyPerformance, DayDetail};
use contracts::dashboards::d411_sales_overview::{CustomerSale, StoreSale};
use contracts::shared::indicators::{IndicatorId, KpiRecord};
use serde::Deserialize;
use serde_json::Value;

use super::{RecordSource, SourceError};
use crate::shared::catalog::{self, ResolvedFilter, DAYS, HOURS};
use crate::shared::config::GraphConfig;
use crate::shared::indicators::metadata;
use crate::shared::metrics::{
    build_daily_row, compute_store_growth, customer_status, ratio_or_zero, weighted_percent,
    DayFigures, YtdFigures,
};

const SALES_TABLE: &str = "Sales";
const HOURLY_TABLE: &str = "Hourly";
const KPI_TABLE: &str = "KPIs";
const CUSTOMER_TABLE: &str = "Customers";

const DAYS_PER_FISCAL_YEAR: i64 = 364;

type Row = Vec<Value>;

/// Path of a worksheet table's rows, or of an address range when no table is given.
pub fn workbook_api_path(
    site_id: &str,
    file_id: &str,
    sheet_name: &str,
    table_name: Option<&str>,
    range: Option<&str>,
) -> String {
    let mut path = format!(
        "/sites/{}/drive/items/{}/workbook/worksheets/{}",
        site_id,
        file_id,
        urlencoding::encode(sheet_name)
    );
    if let Some(table) = table_name {
        path.push_str(&format!("/tables/{}/rows", urlencoding::encode(table)));
    } else if let Some(range) = range {
        path.push_str(&format!("/range(address='{}')", range));
    }
    path
}

#[derive(Debug, Deserialize)]
struct TableRowsResponse {
    value: Vec<TableRow>,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    values: Vec<Row>,
}

// ---------------------------------------------------------------------------
// Cell decoding
// ---------------------------------------------------------------------------

fn cell<'a>(row: &'a Row, idx: usize, column: &str) -> Result<&'a Value, SourceError> {
    row.get(idx)
        .ok_or_else(|| SourceError::Malformed(format!("missing column {}", column)))
}

fn cell_str(row: &Row, idx: usize, column: &str) -> Result<String, SourceError> {
    match cell(row, idx, column)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(SourceError::Malformed(format!(
            "{}: expected text, got {}",
            column, other
        ))),
    }
}

/// Numbers arrive as JSON numbers or as text; blank cells count as 0.
fn cell_f64(row: &Row, idx: usize, column: &str) -> Result<f64, SourceError> {
    match cell(row, idx, column)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| SourceError::Malformed(format!("{}: {} is not a number", column, n))),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .map_err(|_| SourceError::Malformed(format!("{}: {:?} is not a number", column, s))),
        Value::Null => Ok(0.0),
        other => Err(SourceError::Malformed(format!(
            "{}: expected number, got {}",
            column, other
        ))),
    }
}

/// Excel serial dates count days from 1899-12-30.
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(ChronoDuration::days(serial.trunc() as i64))
}

fn cell_date(row: &Row, idx: usize, column: &str) -> Result<NaiveDate, SourceError> {
    let parsed = match cell(row, idx, column)? {
        Value::Number(n) => n.as_f64().and_then(excel_serial_to_date),
        Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
        _ => None,
    };
    parsed.ok_or_else(|| SourceError::Malformed(format!("{}: invalid date", column)))
}

/// 8 -> "8am", 12 -> "12pm", 13 -> "1pm"
fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12am".to_string(),
        1..=11 => format!("{}am", hour),
        12 => "12pm".to_string(),
        _ => format!("{}pm", hour - 12),
    }
}

/// Whole hours (`13`, `13.0`) or an Excel time of day (`0.5417` is 13:00).
fn hour_from_number(value: f64) -> Option<u32> {
    if (0.0..1.0).contains(&value) {
        let hour = (value * 24.0).round();
        (hour < 24.0).then_some(hour as u32)
    } else if value.fract() == 0.0 && (1.0..24.0).contains(&value) {
        Some(value as u32)
    } else {
        None
    }
}

fn cell_hour(row: &Row, idx: usize, column: &str) -> Result<String, SourceError> {
    match cell(row, idx, column)? {
        Value::Number(n) => n
            .as_f64()
            .and_then(hour_from_number)
            .map(hour_label)
            .ok_or_else(|| SourceError::Malformed(format!("{}: invalid hour {}", column, n))),
        Value::String(s) => Ok(s.trim().to_lowercase().replace(' ', "")),
        other => Err(SourceError::Malformed(format!(
            "{}: expected hour, got {}",
            column, other
        ))),
    }
}

// ---------------------------------------------------------------------------
// Sheet rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SalesRow {
    pub date: NaiveDate,
    pub store_id: String,
    pub net_sales: f64,
    pub gp_percent: f64,
    pub ly_net_sales: f64,
    pub ly_gp_percent: f64,
    pub transactions: f64,
}

pub fn parse_sales_rows(rows: &[Row]) -> Result<Vec<SalesRow>, SourceError> {
    rows.iter()
        .map(|row| {
            Ok(SalesRow {
                date: cell_date(row, 0, "Date")?,
                store_id: cell_str(row, 1, "StoreID")?,
                net_sales: cell_f64(row, 2, "NetSales")?,
                gp_percent: cell_f64(row, 3, "GPPercent")?,
                ly_net_sales: cell_f64(row, 4, "LYNetSales")?,
                ly_gp_percent: cell_f64(row, 5, "LYGPPercent")?,
                transactions: cell_f64(row, 6, "Transactions")?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRow {
    pub date: NaiveDate,
    pub store_id: String,
    pub hour: String,
    pub retail_sales: f64,
    pub pro_sales: f64,
    pub returns: f64,
    pub ly_retail_sales: f64,
    pub ly_pro_sales: f64,
    pub ly_returns: f64,
    pub visitors: f64,
    pub transactions: f64,
}

pub fn parse_hourly_rows(rows: &[Row]) -> Result<Vec<HourlyRow>, SourceError> {
    rows.iter()
        .map(|row| {
            Ok(HourlyRow {
                date: cell_date(row, 0, "Date")?,
                store_id: cell_str(row, 1, "StoreID")?,
                hour: cell_hour(row, 2, "Hour")?,
                retail_sales: cell_f64(row, 3, "RetailSales")?,
                pro_sales: cell_f64(row, 4, "ProSales")?,
                returns: cell_f64(row, 5, "Returns")?,
                ly_retail_sales: cell_f64(row, 6, "LYRetailSales")?,
                ly_pro_sales: cell_f64(row, 7, "LYProSales")?,
                ly_returns: cell_f64(row, 8, "LYReturns")?,
                visitors: cell_f64(row, 9, "Visitors")?,
                transactions: cell_f64(row, 10, "Transactions")?,
            })
        })
        .collect()
}

pub fn parse_kpi_rows(rows: &[Row]) -> Result<Vec<KpiRecord>, SourceError> {
    rows.iter()
        .map(|row| {
            let id = IndicatorId::new(&cell_str(row, 0, "Metric")?);
            let value = cell_f64(row, 1, "Value")?;
            let previous = match row.get(2) {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) if s.trim().is_empty() => None,
                Some(_) => Some(cell_f64(row, 2, "PreviousValue")?),
            };
            Ok(metadata::record(id, value, previous))
        })
        .collect()
}

/// Status is derived from the figures; a Status column in the sheet is ignored.
pub fn parse_customer_rows(rows: &[Row]) -> Result<Vec<CustomerSale>, SourceError> {
    rows.iter()
        .map(|row| {
            let current = cell_f64(row, 2, "CurrentYearSales")?;
            let previous = cell_f64(row, 3, "PreviousYearSales")?;
            Ok(CustomerSale {
                customer_id: cell_str(row, 0, "CustomerID")?,
                customer_name: cell_str(row, 1, "CustomerName")?,
                current_year_sales: current,
                previous_year_sales: previous,
                status: customer_status(current, previous),
                growth: compute_store_growth(current, previous),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregation over freshly read rows
// ---------------------------------------------------------------------------

/// Store ids covered by the filter.
pub fn store_scope(filter: &ResolvedFilter) -> Vec<String> {
    match (filter.filter.store(), filter.filter.region()) {
        (Some(store_id), _) => vec![store_id.to_string()],
        (None, Some(region)) => catalog::stores_by_region(region)
            .into_iter()
            .map(|s| s.id)
            .collect(),
        (None, None) => catalog::list_stores().into_iter().map(|s| s.id).collect(),
    }
}

fn ytd_figures<'a>(rows: impl Iterator<Item = &'a SalesRow> + Clone) -> YtdFigures {
    YtdFigures {
        net_sales: rows.clone().map(|r| r.net_sales).sum(),
        gp_percent: weighted_percent(rows.clone().map(|r| (r.gp_percent, r.net_sales))),
        ly_net_sales: rows.clone().map(|r| r.ly_net_sales).sum(),
        ly_gp_percent: weighted_percent(rows.map(|r| (r.ly_gp_percent, r.ly_net_sales))),
    }
}

/// One row per day of the week; days without sheet rows come out as zeros.
pub fn aggregate_daily(
    rows: &[SalesRow],
    scope: &[String],
    fiscal_year_start: NaiveDate,
    week_number: u32,
) -> Vec<DailyPerformance> {
    let in_scope: Vec<&SalesRow> = rows
        .iter()
        .filter(|r| scope.contains(&r.store_id) && r.date >= fiscal_year_start)
        .collect();

    catalog::week_dates(fiscal_year_start, week_number)
        .into_iter()
        .enumerate()
        .map(|(index, date)| {
            let day_rows = in_scope.iter().copied().filter(|r| r.date == date);
            let net_sales: f64 = day_rows.clone().map(|r| r.net_sales).sum();
            let transactions: f64 = day_rows.clone().map(|r| r.transactions).sum();
            let figures = DayFigures {
                net_sales,
                gp_percent: weighted_percent(day_rows.clone().map(|r| (r.gp_percent, r.net_sales))),
                ly_net_sales: day_rows.clone().map(|r| r.ly_net_sales).sum(),
                ly_gp_percent: weighted_percent(
                    day_rows.map(|r| (r.ly_gp_percent, r.ly_net_sales)),
                ),
                basket_size: ratio_or_zero(net_sales, transactions),
            };
            let ytd = ytd_figures(in_scope.iter().copied().filter(|r| r.date <= date));
            build_daily_row(DAYS[index], date, figures, ytd)
        })
        .collect()
}

/// One row per operating hour of `date`, summed across the stores in scope.
pub fn aggregate_hourly(rows: &[HourlyRow], scope: &[String], date: NaiveDate) -> Vec<DayDetail> {
    let mut by_hour: HashMap<&str, Vec<&HourlyRow>> = HashMap::new();
    for row in rows
        .iter()
        .filter(|r| r.date == date && scope.contains(&r.store_id))
    {
        by_hour.entry(row.hour.as_str()).or_default().push(row);
    }

    HOURS
        .iter()
        .map(|hour| {
            let bucket = by_hour.get(hour).map(Vec::as_slice).unwrap_or(&[]);
            let sum = |f: fn(&HourlyRow) -> f64| bucket.iter().map(|r| f(r)).sum::<f64>();

            let retail_sales = sum(|r| r.retail_sales);
            let pro_sales = sum(|r| r.pro_sales);
            let ly_retail_sales = sum(|r| r.ly_retail_sales);
            let ly_pro_sales = sum(|r| r.ly_pro_sales);
            let visitors = sum(|r| r.visitors);

            DayDetail {
                hour: hour.to_string(),
                sales: retail_sales + pro_sales,
                retail_sales,
                pro_sales,
                ly_sales: ly_retail_sales + ly_pro_sales,
                ly_retail_sales,
                ly_pro_sales,
                returns: sum(|r| r.returns),
                ly_returns: sum(|r| r.ly_returns),
                visitors,
                conversion: ratio_or_zero(sum(|r| r.transactions), visitors) * 100.0,
            }
        })
        .collect()
}

/// Fiscal-year totals per store, in catalog order.
pub fn aggregate_store_sales(rows: &[SalesRow], fiscal_year_start: NaiveDate) -> Vec<StoreSale> {
    let year_end = fiscal_year_start + ChronoDuration::days(DAYS_PER_FISCAL_YEAR);
    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for row in rows
        .iter()
        .filter(|r| r.date >= fiscal_year_start && r.date < year_end)
    {
        let entry = totals.entry(row.store_id.as_str()).or_insert((0.0, 0.0));
        entry.0 += row.net_sales;
        entry.1 += row.ly_net_sales;
    }

    catalog::list_stores()
        .into_iter()
        .map(|store| {
            let (current, previous) = totals.get(store.id.as_str()).copied().unwrap_or((0.0, 0.0));
            StoreSale {
                store_id: store.id,
                store_name: store.name,
                region: store.region,
                current_year_sales: current,
                previous_year_sales: previous,
                growth: compute_store_growth(current, previous),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

pub struct GraphWorkbookSource {
    client: reqwest::Client,
    config: GraphConfig,
    fiscal_year_start: NaiveDate,
}

impl GraphWorkbookSource {
    pub fn new(config: GraphConfig, fiscal_year_start: NaiveDate) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            config,
            fiscal_year_start,
        })
    }

    fn table_url(&self, file_id: &str, table: &str) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            workbook_api_path(&self.config.site_id, file_id, table, Some(table), None)
        )
    }

    /// Reads all data rows of a table (header excluded).
    async fn read_table(&self, file_id: &str, table: &str) -> Result<Vec<Row>, SourceError> {
        let url = self.table_url(file_id, table);
        tracing::debug!("Workbook request: GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Workbook API request for {} failed: {} {}", table, status, body);
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let preview: String = body.chars().take(300).collect();
        tracing::debug!("Workbook {} response preview: {}", table, preview);

        let parsed: TableRowsResponse = serde_json::from_str(&body)
            .map_err(|e| SourceError::Malformed(format!("{} rows: {}", table, e)))?;

        Ok(parsed
            .value
            .into_iter()
            .filter_map(|row| row.values.into_iter().next())
            .collect())
    }

    async fn read_sales(&self) -> Result<Vec<SalesRow>, SourceError> {
        let rows = self
            .read_table(&self.config.files.daily_sales, SALES_TABLE)
            .await?;
        parse_sales_rows(&rows)
    }
}

#[async_trait]
impl RecordSource for GraphWorkbookSource {
    fn name(&self) -> &str {
        "graph-workbook"
    }

    async fn fetch_daily_records(
        &self,
        filter: &ResolvedFilter,
    ) -> Result<Vec<DailyPerformance>, SourceError> {
        let rows = self.read_sales().await?;
        Ok(aggregate_daily(
            &rows,
            &store_scope(filter),
            self.fiscal_year_start,
            filter.week_number,
        ))
    }

    async fn fetch_hourly_records(
        &self,
        day: &str,
        filter: &ResolvedFilter,
    ) -> Result<Vec<DayDetail>, SourceError> {
        let day_index =
            catalog::day_index(day).map_err(|e| SourceError::Malformed(e.to_string()))?;
        let date = catalog::week_date(self.fiscal_year_start, filter.week_number, day_index);

        let rows = self
            .read_table(&self.config.files.hourly_sales, HOURLY_TABLE)
            .await?;
        let rows = parse_hourly_rows(&rows)?;
        Ok(aggregate_hourly(&rows, &store_scope(filter), date))
    }

    async fn fetch_store_sales(&self) -> Result<Vec<StoreSale>, SourceError> {
        let rows = self.read_sales().await?;
        Ok(aggregate_store_sales(&rows, self.fiscal_year_start))
    }

    async fn fetch_customer_sales(&self) -> Result<Vec<CustomerSale>, SourceError> {
        let rows = self
            .read_table(&self.config.files.customers, CUSTOMER_TABLE)
            .await?;
        parse_customer_rows(&rows)
    }

    async fn fetch_kpi_records(&self) -> Result<Vec<KpiRecord>, SourceError> {
        let rows = self.read_table(&self.config.files.kpis, KPI_TABLE).await?;
        parse_kpi_rows(&rows)
    }
}
