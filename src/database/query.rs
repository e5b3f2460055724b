use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;

use crate::types::Record;

/// Page size used when `_page` is given without `_limit`
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// List parameters accepted by `GET /records`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordQuery {
    /// Case-insensitive full-text match over every string field
    pub q: Option<String>,
    #[serde(rename = "_sort")]
    pub sort: Option<String>,
    #[serde(rename = "_order")]
    pub order: Option<SortOrder>,
    /// 1-based page number
    #[serde(rename = "_page")]
    pub page: Option<usize>,
    #[serde(rename = "_limit")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Result of a list query. `total` counts matches before paging.
#[derive(Debug, Clone)]
pub struct RecordPage {
    pub items: Vec<Record>,
    pub total: usize,
    pub paginated: bool,
}

impl RecordQuery {
    pub fn is_paginated(&self) -> bool {
        self.page.is_some() || self.limit.is_some()
    }

    pub fn apply(&self, records: &[Record]) -> RecordPage {
        let needle = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<(Value, &Record)> = records
            .iter()
            .filter_map(|record| {
                let value = serde_json::to_value(record).ok()?;
                match &needle {
                    Some(needle) if !contains_text(&value, needle) => None,
                    _ => Some((value, record)),
                }
            })
            .collect();

        if let Some(field) = self.sort.as_deref() {
            matched.sort_by(|(a, _), (b, _)| compare_values(a.get(field), b.get(field)));
            if self.order.unwrap_or_default() == SortOrder::Desc {
                matched.reverse();
            }
        }

        let total = matched.len();
        let items = matched.into_iter().map(|(_, record)| record.clone());

        let items: Vec<Record> = match (self.page, self.limit) {
            (Some(page), limit) => {
                let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
                items.skip(page.saturating_sub(1) * limit).take(limit).collect()
            }
            (None, Some(limit)) => items.take(limit).collect(),
            (None, None) => items.collect(),
        };

        RecordPage {
            items,
            total,
            paginated: self.is_paginated(),
        }
    }
}

fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|v| contains_text(v, needle)),
        Value::Object(map) => map.values().any(|v| contains_text(v, needle)),
        _ => false,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
        // Records missing the sort field go last
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn record(id: u64, title: &str, description: &str) -> Record {
        Record {
            id,
            title: title.to_string(),
            description: description.to_string(),
            extra: Map::new(),
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record(1, "Intro to Rust", "Ownership and borrowing"),
            record(2, "Axum", "Routers and handlers"),
            record(3, "Tokio", "Async runtime for Rust"),
        ]
    }

    #[test]
    fn full_text_search_is_case_insensitive() {
        let query = RecordQuery {
            q: Some("RUST".to_string()),
            ..Default::default()
        };
        let page = query.apply(&sample());
        let ids: Vec<u64> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(page.total, 2);
        assert!(!page.paginated);
    }

    #[test]
    fn sorts_descending_by_title() {
        let query = RecordQuery {
            sort: Some("title".to_string()),
            order: Some(SortOrder::Desc),
            ..Default::default()
        };
        let ids: Vec<u64> = query.apply(&sample()).items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn paginates_after_filtering() {
        let query = RecordQuery {
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        };
        let page = query.apply(&sample());
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, 3);
        assert_eq!(page.total, 3);
        assert!(page.paginated);
    }
}
