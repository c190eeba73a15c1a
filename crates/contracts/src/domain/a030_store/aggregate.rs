use serde::{Deserialize, Serialize};

/// Store reference entry. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub region: String,
}

impl Store {
    pub fn new(id: &str, name: &str, region: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            region: region.to_string(),
        }
    }
}

/// Filter selection coming from the dashboard.
///
/// Empty strings mean "unconstrained", so the query string `?store_id=&region=`
/// deserializes into the same value as an empty query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFilter {
    #[serde(default)]
    pub store_id: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub week: String,
}

impl StoreFilter {
    pub fn new(store_id: &str, region: &str, week: &str) -> Self {
        Self {
            store_id: store_id.to_string(),
            region: region.to_string(),
            week: week.to_string(),
        }
    }

    /// Store id, `None` when unconstrained.
    pub fn store(&self) -> Option<&str> {
        non_empty(&self.store_id)
    }

    /// Region, `None` when unconstrained.
    pub fn region(&self) -> Option<&str> {
        non_empty(&self.region)
    }

    /// Week label, `None` when unconstrained.
    pub fn week(&self) -> Option<&str> {
        non_empty(&self.week)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_is_unconstrained() {
        let filter: StoreFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter, StoreFilter::default());
        assert!(filter.store().is_none());
        assert!(filter.region().is_none());
        assert!(filter.week().is_none());
    }

    #[test]
    fn test_blank_values_are_unconstrained() {
        let filter = StoreFilter::new("  ", "", "Week 3");
        assert!(filter.store().is_none());
        assert!(filter.region().is_none());
        assert_eq!(filter.week(), Some("Week 3"));
    }
}
