use crate::query::SearchFilters;
use crate::storage::{KeyValueStore, ANALYTICS_KEY, HISTORY_KEY};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

/// One remembered search, newest first, capped at the history limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    pub id: String,
    pub query: String,
    pub filters: SearchFilters,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub result_count: usize,
    pub clicked: bool,
}

/// Per-search analytics record; `clicked_results` grows as the UI
/// reports opened articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    pub search_id: String,
    pub query: String,
    pub result_count: usize,
    pub took_ms: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub session_id: String,
    pub filters: SearchFilters,
    pub clicked_results: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingQuery {
    pub query: String,
    pub count: u32,
}

/// Load a persisted JSON list, degrading to empty on absence or
/// corruption. Persistence problems must never reach the caller.
pub fn load_list<T: for<'de> Deserialize<'de>>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(key, %err, "discarding corrupt persisted state");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(err) => {
            tracing::warn!(key, %err, "storage read failed, starting empty");
            Vec::new()
        }
    }
}

pub fn persist_list<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) {
    match serde_json::to_string(items) {
        Ok(json) => {
            if let Err(err) = store.set(key, &json) {
                tracing::warn!(key, %err, "storage write failed");
            }
        }
        Err(err) => tracing::warn!(key, %err, "failed to serialize persisted state"),
    }
}

pub fn load_history(store: &dyn KeyValueStore) -> Vec<SearchHistoryItem> {
    load_list(store, HISTORY_KEY)
}

pub fn load_analytics(store: &dyn KeyValueStore) -> Vec<SearchRecord> {
    load_list(store, ANALYTICS_KEY)
}

/// Rebuild the trending query counters from persisted analytics; this
/// is how trending survives a cold start.
pub fn trending_from_analytics(records: &[SearchRecord]) -> HashMap<String, u32> {
    let mut trending = HashMap::new();
    for record in records {
        if record.query.is_empty() {
            continue;
        }
        *trending.entry(record.query.clone()).or_insert(0) += 1;
    }
    trending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn record(query: &str) -> SearchRecord {
        SearchRecord {
            search_id: "s1".into(),
            query: query.into(),
            result_count: 1,
            took_ms: 0.2,
            timestamp: OffsetDateTime::now_utc(),
            session_id: "sess".into(),
            filters: SearchFilters::default(),
            clicked_results: Vec::new(),
        }
    }

    #[test]
    fn corrupt_state_degrades_to_empty() {
        let store = MemoryStore::new();
        store.set(HISTORY_KEY, "{not json").unwrap();
        let history = load_history(&store);
        assert!(history.is_empty());
    }

    #[test]
    fn missing_state_degrades_to_empty() {
        let store = MemoryStore::new();
        assert!(load_analytics(&store).is_empty());
    }

    #[test]
    fn analytics_round_trip() {
        let store = MemoryStore::new();
        persist_list(&store, ANALYTICS_KEY, &[record("budget"), record("budget"), record("rain")]);
        let loaded = load_analytics(&store);
        assert_eq!(loaded.len(), 3);
        let trending = trending_from_analytics(&loaded);
        assert_eq!(trending.get("budget"), Some(&2));
        assert_eq!(trending.get("rain"), Some(&1));
    }
}
