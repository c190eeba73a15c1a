//! Static reference data: stores, regions and fiscal weeks.
//!
//! Used to populate filter options and to validate the filter before it reaches
//! the record source.

use chrono::{Duration, NaiveDate};
use contracts::domain::a030_store::{Store, StoreFilter};
use once_cell::sync::Lazy;
use thiserror::Error;

pub const WEEKS_PER_YEAR: u32 = 52;

const WEEK_PREFIX: &str = "Week ";

/// (id, name, region)
const STORES: [(&str, &str, &str); 6] = [
    ("S001", "Tantallon", "Nova Scotia"),
    ("S002", "Almon", "Nova Scotia"),
    ("S003", "Elmsdale", "Nova Scotia"),
    ("S004", "Windmill", "Nova Scotia"),
    ("S005", "Charlottetown", "Prince Edward Island"),
    ("S006", "Moncton", "New Brunswick"),
];

const REGIONS: [&str; 3] = ["Nova Scotia", "Prince Edward Island", "New Brunswick"];

/// Day names in table order.
pub const DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Operating hours, 8am to 8pm in 1-hour buckets.
pub const HOURS: [&str; 13] = [
    "8am", "9am", "10am", "11am", "12pm", "1pm", "2pm", "3pm", "4pm", "5pm", "6pm", "7pm", "8pm",
];

static WEEKS: Lazy<Vec<String>> = Lazy::new(|| {
    (1..=WEEKS_PER_YEAR)
        .map(|n| format!("{}{}", WEEK_PREFIX, n))
        .collect()
});

/// Filter rejected by the catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown store: {0}")]
    UnknownStore(String),

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("store {store_id} is not in region {region}")]
    StoreOutsideRegion { store_id: String, region: String },

    #[error("invalid week: {0}")]
    InvalidWeek(String),

    #[error("unknown day: {0}")]
    UnknownDay(String),
}

pub fn list_stores() -> Vec<Store> {
    STORES
        .iter()
        .map(|(id, name, region)| Store::new(id, name, region))
        .collect()
}

pub fn list_regions() -> Vec<String> {
    REGIONS.iter().map(|r| r.to_string()).collect()
}

pub fn list_weeks() -> Vec<String> {
    WEEKS.clone()
}

/// Stores whose region matches exactly. Empty region returns all stores.
pub fn stores_by_region(region: &str) -> Vec<Store> {
    if region.is_empty() {
        return list_stores();
    }
    list_stores()
        .into_iter()
        .filter(|s| s.region == region)
        .collect()
}

pub fn find_store(store_id: &str) -> Option<Store> {
    list_stores().into_iter().find(|s| s.id == store_id)
}

/// Parses `"Week N"` into `N` (1..=52).
pub fn parse_week(label: &str) -> Result<u32, FilterError> {
    let number = label
        .trim()
        .strip_prefix(WEEK_PREFIX)
        .and_then(|n| n.trim().parse::<u32>().ok())
        .ok_or_else(|| FilterError::InvalidWeek(label.to_string()))?;

    if (1..=WEEKS_PER_YEAR).contains(&number) {
        Ok(number)
    } else {
        Err(FilterError::InvalidWeek(label.to_string()))
    }
}

/// Position of a day name within the week (Sunday = 0).
pub fn day_index(day: &str) -> Result<usize, FilterError> {
    DAYS.iter()
        .position(|d| d.eq_ignore_ascii_case(day.trim()))
        .ok_or_else(|| FilterError::UnknownDay(day.to_string()))
}

/// Sunday of fiscal week 1 unless configured otherwise.
pub fn default_fiscal_year_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 14).expect("valid fiscal year start")
}

/// Calendar date of a day within a fiscal week.
pub fn week_date(fiscal_year_start: NaiveDate, week_number: u32, day_index: usize) -> NaiveDate {
    let offset = (week_number.saturating_sub(1) as i64) * 7 + day_index as i64;
    fiscal_year_start + Duration::days(offset)
}

/// Sunday..Saturday dates of a fiscal week.
pub fn week_dates(fiscal_year_start: NaiveDate, week_number: u32) -> Vec<NaiveDate> {
    (0..DAYS.len())
        .map(|i| week_date(fiscal_year_start, week_number, i))
        .collect()
}

/// Validated filter with the week resolved to its number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilter {
    pub filter: StoreFilter,
    pub week_number: u32,
}

/// Validates and normalizes a filter selection.
///
/// Values are trimmed, an empty week means Week 1, and a store must belong to the
/// selected region when both are given.
pub fn resolve_filter(filter: &StoreFilter) -> Result<ResolvedFilter, FilterError> {
    let region = match filter.region() {
        Some(r) if REGIONS.contains(&r) => r.to_string(),
        Some(r) => return Err(FilterError::UnknownRegion(r.to_string())),
        None => String::new(),
    };

    let store_id = match filter.store() {
        Some(id) => {
            let store = find_store(id).ok_or_else(|| FilterError::UnknownStore(id.to_string()))?;
            if !region.is_empty() && store.region != region {
                return Err(FilterError::StoreOutsideRegion {
                    store_id: store.id,
                    region,
                });
            }
            store.id
        }
        None => String::new(),
    };

    let week_number = match filter.week() {
        Some(w) => parse_week(w)?,
        None => 1,
    };

    Ok(ResolvedFilter {
        filter: StoreFilter {
            store_id,
            region,
            week: format!("{}{}", WEEK_PREFIX, week_number),
        },
        week_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_lists() {
        assert_eq!(list_stores().len(), 6);
        assert_eq!(list_regions().len(), 3);

        let weeks = list_weeks();
        assert_eq!(weeks.len(), 52);
        assert_eq!(weeks[0], "Week 1");
        assert_eq!(weeks[51], "Week 52");
    }

    #[test]
    fn test_stores_by_region() {
        let names: Vec<String> = stores_by_region("Nova Scotia")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Tantallon", "Almon", "Elmsdale", "Windmill"]);

        assert_eq!(stores_by_region("").len(), 6);
        assert_eq!(stores_by_region("New Brunswick")[0].name, "Moncton");
        assert!(stores_by_region("nova scotia").is_empty());
    }

    #[test]
    fn test_parse_week() {
        assert_eq!(parse_week("Week 1"), Ok(1));
        assert_eq!(parse_week(" Week 52 "), Ok(52));
        assert!(parse_week("Week 0").is_err());
        assert!(parse_week("Week 53").is_err());
        assert!(parse_week("12").is_err());
        assert!(parse_week("Week x").is_err());
    }

    #[test]
    fn test_day_index() {
        assert_eq!(day_index("Sunday"), Ok(0));
        assert_eq!(day_index("saturday"), Ok(6));
        assert!(day_index("Funday").is_err());
    }

    #[test]
    fn test_week_dates() {
        let start = default_fiscal_year_start();
        let dates = week_dates(start, 1);
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
        assert_eq!(dates[6], NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
        assert_eq!(week_date(start, 3, 2), NaiveDate::from_ymd_opt(2024, 1, 30).unwrap());
    }

    #[test]
    fn test_resolve_filter_defaults_to_week_one() {
        let resolved = resolve_filter(&StoreFilter::default()).unwrap();
        assert_eq!(resolved.week_number, 1);
        assert_eq!(resolved.filter, StoreFilter::new("", "", "Week 1"));
    }

    #[test]
    fn test_resolve_filter_rejects_store_outside_region() {
        let err = resolve_filter(&StoreFilter::new("S006", "Nova Scotia", "Week 2")).unwrap_err();
        assert_eq!(
            err,
            FilterError::StoreOutsideRegion {
                store_id: "S006".into(),
                region: "Nova Scotia".into()
            }
        );
    }

    #[test]
    fn test_resolve_filter_rejects_unknown_values() {
        assert_eq!(
            resolve_filter(&StoreFilter::new("S999", "", "")),
            Err(FilterError::UnknownStore("S999".into()))
        );
        assert_eq!(
            resolve_filter(&StoreFilter::new("", "Ontario", "")),
            Err(FilterError::UnknownRegion("Ontario".into()))
        );
        assert_eq!(
            resolve_filter(&StoreFilter::new("", "", "Week 60")),
            Err(FilterError::InvalidWeek("Week 60".into()))
        );
    }

    #[test]
    fn test_resolve_filter_keeps_matching_store() {
        let resolved = resolve_filter(&StoreFilter::new(" S005 ", "Prince Edward Island", "Week 10"))
            .unwrap();
        assert_eq!(resolved.filter.store_id, "S005");
        assert_eq!(resolved.week_number, 10);
    }
}
