//! In-memory log store, the test double for the external backing store.
//!
//! Holds records in a [`DashMap`] and interprets [`Filter`] expressions
//! directly against them. This is the reference semantics for translation:
//! inclusive range bounds, anchored patterns, severity-ordered level
//! comparisons, and newest-first pagination with a stable tie-break.

use crate::models::record::LogRecord;
use crate::store::{FacetBucket, FacetDimension, LogStore, StoreResult, TimelineBucket};
use crate::translate::{FieldRef, Filter, FilterValue};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use uuid::Uuid;

/// In-memory backing store.
#[derive(Clone, Default)]
pub struct MemoryLogStore {
    records: Arc<DashMap<Uuid, LogRecord>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, as the ingestion pipeline would.
    pub fn insert(&self, record: LogRecord) {
        self.records.insert(record.id, record);
    }

    /// Insert a batch of records.
    pub fn insert_all(&self, records: impl IntoIterator<Item = LogRecord>) {
        for record in records {
            self.insert(record);
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matching(&self, filter: &Filter) -> Vec<LogRecord> {
        self.records
            .iter()
            .filter(|entry| record_matches(filter, entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn count(&self, filter: &Filter) -> StoreResult<u64> {
        Ok(self
            .records
            .iter()
            .filter(|entry| record_matches(filter, entry.value()))
            .count() as u64)
    }

    async fn fetch(&self, filter: &Filter, offset: u64, limit: u64) -> StoreResult<Vec<LogRecord>> {
        let mut records = self.matching(filter);

        // Newest first; tie-break on id so pagination is stable.
        records.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(records
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn facet_counts(
        &self,
        filter: &Filter,
        dimension: FacetDimension,
    ) -> StoreResult<Vec<FacetBucket>> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for record in self.matching(filter) {
            let value = match dimension {
                FacetDimension::Service => record.service.clone(),
                FacetDimension::Level => record.level.to_string(),
            };
            *counts.entry(value).or_insert(0) += 1;
        }

        let mut buckets: Vec<FacetBucket> = counts
            .into_iter()
            .map(|(value, count)| FacetBucket { value, count })
            .collect();
        buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        Ok(buckets)
    }

    async fn hourly_counts(
        &self,
        filter: &Filter,
        buckets: usize,
    ) -> StoreResult<Vec<TimelineBucket>> {
        let mut counts: BTreeMap<DateTime<Utc>, u64> = BTreeMap::new();
        for record in self.matching(filter) {
            *counts.entry(truncate_to_hour(record.timestamp)).or_insert(0) += 1;
        }

        Ok(counts
            .into_iter()
            .rev()
            .take(buckets)
            .map(|(hour, count)| TimelineBucket { hour, count })
            .collect())
    }

    async fn distinct_values(&self, field: &FieldRef, limit: usize) -> StoreResult<Vec<String>> {
        let mut values = BTreeSet::new();
        for entry in self.records.iter() {
            let record = entry.value();
            let value = match field {
                FieldRef::Level => Some(record.level.to_string()),
                FieldRef::Timestamp => None,
                _ => field_text(record, field).map(str::to_string),
            };
            if let Some(value) = value {
                values.insert(value);
            }
        }
        Ok(values.into_iter().take(limit).collect())
    }
}

/// Interpret a filter against a single record.
pub fn record_matches(filter: &Filter, record: &LogRecord) -> bool {
    match filter {
        Filter::All => true,
        Filter::MessageContains(needle) => record
            .message
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        Filter::Compare { field, op, value } => field_ordering(record, field, value)
            .map(|ord| op_accepts(*op, ord))
            .unwrap_or(false),
        Filter::Between { field, low, high } => {
            let above = field_ordering(record, field, low).map(|ord| ord != Ordering::Less);
            let below = field_ordering(record, field, high).map(|ord| ord != Ordering::Greater);
            above.unwrap_or(false) && below.unwrap_or(false)
        }
        Filter::Pattern { field, pattern } => field_text(record, field)
            .map(|text| pattern.matches(text))
            .unwrap_or(false),
        Filter::And(left, right) => record_matches(left, record) && record_matches(right, record),
        Filter::Or(left, right) => record_matches(left, record) || record_matches(right, record),
        Filter::Not(child) => !record_matches(child, record),
    }
}

/// Ordering of a record's field value relative to a filter literal.
///
/// `None` when the record carries no value for the field (absent optional
/// fields, missing metadata keys); absent values match no comparison,
/// including `!=`.
fn field_ordering(record: &LogRecord, field: &FieldRef, value: &FilterValue) -> Option<Ordering> {
    match value {
        FilterValue::Time(ts) => {
            matches!(field, FieldRef::Timestamp).then(|| record.timestamp.cmp(ts))
        }
        FilterValue::Level(level) => {
            matches!(field, FieldRef::Level).then(|| record.level.cmp(level))
        }
        FilterValue::Text(text) => field_text(record, field).map(|t| t.cmp(text.as_str())),
    }
}

/// Text value of a record's field, for text-kind fields only.
fn field_text<'a>(record: &'a LogRecord, field: &FieldRef) -> Option<&'a str> {
    match field {
        FieldRef::Service => Some(record.service.as_str()),
        FieldRef::Message => Some(record.message.as_str()),
        FieldRef::UserId => record.user_id.as_deref(),
        FieldRef::RequestId => record.request_id.as_deref(),
        FieldRef::Metadata(key) => record.metadata.get(key).map(String::as_str),
        FieldRef::Timestamp | FieldRef::Level => None,
    }
}

fn op_accepts(op: crate::query::CompareOp, ord: Ordering) -> bool {
    use crate::query::CompareOp;
    match op {
        CompareOp::Eq => ord == Ordering::Equal,
        CompareOp::Ne => ord != Ordering::Equal,
        CompareOp::Gt => ord == Ordering::Greater,
        CompareOp::Gte => ord != Ordering::Less,
        CompareOp::Lt => ord == Ordering::Less,
        CompareOp::Lte => ord != Ordering::Greater,
    }
}

fn truncate_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    let secs = ts.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(3600), 0).unwrap_or(ts)
}
