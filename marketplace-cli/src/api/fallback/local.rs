//! Client-side filtering, sorting and paging of bundled records

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;

use crate::api::models::Record;
use crate::api::query::{QueryDescriptor, ResultPage, SortOrder};

/// Evaluates a [`QueryDescriptor`] against records held in memory
pub struct LocalQuery<'a> {
    descriptor: &'a QueryDescriptor,
}

impl<'a> LocalQuery<'a> {
    pub fn new(descriptor: &'a QueryDescriptor) -> Self {
        Self { descriptor }
    }

    /// Filter, sort, then slice out the requested page
    pub fn apply(&self, records: &[Record]) -> ResultPage {
        let mut matching: Vec<Record> = records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();

        let field = self.descriptor.sort_by();
        if !field.is_empty() {
            // stable, so ties keep bundled order
            matching.sort_by(|a, b| {
                let ordering = compare(a.get(field), b.get(field));
                match self.descriptor.sort_order() {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        ResultPage::paginate(
            matching,
            self.descriptor.page(),
            self.descriptor.page_size(),
        )
    }

    /// Every filter must match; a record missing the field never matches
    fn matches(&self, record: &Record) -> bool {
        self.descriptor.filters().iter().all(|(key, wanted)| {
            record
                .get(key)
                .map(display)
                .is_some_and(|actual| actual.to_lowercase().contains(&wanted.to_lowercase()))
        })
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Sort key of one field value
///
/// Values of different kinds never compare by content: missing, null, bool,
/// number, timestamp, then any other value as lowercase text. Keeps the
/// ordering total when a field mixes types.
#[derive(Debug)]
enum SortKey {
    Missing,
    Null,
    Bool(bool),
    Number(f64),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl SortKey {
    fn of(value: Option<&Value>) -> Self {
        match value {
            None => Self::Missing,
            Some(Value::Null) => Self::Null,
            Some(Value::Bool(b)) => Self::Bool(*b),
            Some(Value::Number(n)) => n.as_f64().map_or(Self::Text(n.to_string()), Self::Number),
            Some(other) => match timestamp(other) {
                Some(ts) => Self::Timestamp(ts),
                None => Self::Text(display(other).to_lowercase()),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Null => 1,
            Self::Bool(_) => 2,
            Self::Number(_) => 3,
            Self::Timestamp(_) => 4,
            Self::Text(_) => 5,
        }
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = (SortKey::of(a), SortKey::of(b));
    match (&a, &b) {
        (SortKey::Bool(x), SortKey::Bool(y)) => x.cmp(y),
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Timestamp(x), SortKey::Timestamp(y)) => x.cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        _ => a.rank().cmp(&b.rank()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fallback::{FallbackCategory, FallbackResolver};
    use crate::api::query::QueryBuilder;
    use serde_json::json;

    fn ids(page: &ResultPage) -> Vec<i64> {
        page.items
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .collect()
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let products = FallbackResolver::new().records(FallbackCategory::Products);
        let descriptor = QueryBuilder::new()
            .page_size(50)
            .sort_by("id")
            .sort_order(SortOrder::Asc)
            .filter("vendor", "soundwave")
            .build();

        let page = LocalQuery::new(&descriptor).apply(products);
        assert_eq!(ids(&page), vec![1, 8]);
        assert_eq!(page.total_records, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_numeric_sort_and_paging() {
        let products = FallbackResolver::new().records(FallbackCategory::Products);
        let descriptor = QueryBuilder::new()
            .page(2)
            .page_size(5)
            .sort_by("price")
            .sort_order(SortOrder::Desc)
            .build();

        let page = LocalQuery::new(&descriptor).apply(products);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_records, products.len() as u64);
        assert_eq!(page.total_pages, 3);

        let prices: Vec<f64> = page
            .items
            .iter()
            .filter_map(|r| r.get("price").and_then(Value::as_f64))
            .collect();
        assert!(prices.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_timestamp_sort() {
        let records = crate::api::test_support::records(vec![
            json!({"id": 1, "created_at": "2024-01-01T00:00:00+02:00"}),
            json!({"id": 2, "created_at": "2023-12-31T23:30:00Z"}),
            json!({"id": 3}),
        ]);
        let descriptor = QueryBuilder::new()
            .sort_by("created_at")
            .sort_order(SortOrder::Asc)
            .build();

        // 2024-01-01T00:00+02:00 is 2023-12-31T22:00Z, earlier than id 2
        let page = LocalQuery::new(&descriptor).apply(&records);
        assert_eq!(ids(&page), vec![3, 1, 2]);
    }

    #[test]
    fn test_missing_filter_field_excludes_record() {
        let records = crate::api::test_support::records(vec![
            json!({"id": 1, "status": "active"}),
            json!({"id": 2}),
        ]);
        let descriptor = QueryBuilder::new().filter("status", "act").build();

        let page = LocalQuery::new(&descriptor).apply(&records);
        assert_eq!(ids(&page), vec![1]);
    }

    #[test]
    fn test_mixed_value_kinds_sort_by_kind_first() {
        let records = crate::api::test_support::records(
            (0..200)
                .map(|i| match i % 3 {
                    0 => json!({"id": i, "sku": i}),
                    1 => json!({"id": i, "sku": format!("{}a", i)}),
                    _ => json!({"id": i, "sku": 200 - i}),
                })
                .chain([
                    json!({"id": 900, "sku": "2024-05-01T10:00:00Z"}),
                    json!({"id": 901, "sku": null}),
                    json!({"id": 902, "sku": true}),
                    json!({"id": 903}),
                ])
                .collect(),
        );
        let descriptor = QueryBuilder::new()
            .page_size(500)
            .sort_by("sku")
            .sort_order(SortOrder::Asc)
            .build();

        let page = LocalQuery::new(&descriptor).apply(&records);
        assert_eq!(page.items.len(), 204);
        assert_eq!(ids(&page)[..3], [903, 901, 902]);

        let kinds: Vec<u8> = page
            .items
            .iter()
            .map(|r| SortKey::of(r.get("sku")).rank())
            .collect();
        assert!(kinds.windows(2).all(|w| w[0] <= w[1]));
        let timestamp_at = kinds.iter().position(|k| *k == 4).unwrap();
        assert_eq!(ids(&page)[timestamp_at], 900);

        let numbers: Vec<f64> = page
            .items
            .iter()
            .filter_map(|r| r.get("sku").and_then(Value::as_f64))
            .collect();
        assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
    }
}
