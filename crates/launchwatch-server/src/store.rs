//! Search bookkeeping.
//!
//! One record per submitted search, keyed by the upstream task id. The store
//! also caches the final extraction so repeat polls after completion don't
//! re-run the pipeline (or hit the upstream service at all).

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use launchwatch_core::ExtractionResult;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SearchRecord {
    pub task_id: String,
    pub prompt: String,
    pub llm_model: String,
    pub live_url: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Terminal status once known ("finished", "failed", "stopped").
    pub final_status: Option<String>,
    /// Cached extraction, set together with `final_status`.
    pub result: Option<ExtractionResult>,
}

/// Repository of submitted searches.
pub trait SearchStore: Send + Sync {
    fn insert(&self, record: SearchRecord);
    fn get(&self, task_id: &str) -> Option<SearchRecord>;
    /// Marks a search terminal and caches its extraction. A no-op for an
    /// unknown task id.
    fn complete(&self, task_id: &str, final_status: &str, result: ExtractionResult);
}

/// In-process store; state does not survive a restart. Completed searches
/// remain queryable for the lifetime of the process.
#[derive(Default)]
pub struct InMemorySearchStore {
    records: RwLock<HashMap<String, SearchRecord>>,
}

impl InMemorySearchStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SearchStore for InMemorySearchStore {
    fn insert(&self, record: SearchRecord) {
        let mut records = self.records.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        records.insert(record.task_id.clone(), record);
    }

    fn get(&self, task_id: &str) -> Option<SearchRecord> {
        let records = self.records.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        records.get(task_id).cloned()
    }

    fn complete(&self, task_id: &str, final_status: &str, result: ExtractionResult) {
        let mut records = self.records.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(record) = records.get_mut(task_id) {
            record.final_status = Some(final_status.to_owned());
            record.result = Some(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(task_id: &str) -> SearchRecord {
        SearchRecord {
            task_id: task_id.to_owned(),
            prompt: "find launches".to_owned(),
            llm_model: "test-model".to_owned(),
            live_url: None,
            created_at: Utc::now(),
            final_status: None,
            result: None,
        }
    }

    #[test]
    fn insert_then_get_round_trips() {
        let store = InMemorySearchStore::new();
        store.insert(record("t-1"));
        let fetched = store.get("t-1").expect("record present");
        assert_eq!(fetched.prompt, "find launches");
        assert!(fetched.final_status.is_none());
        assert!(store.get("t-2").is_none());
    }

    #[test]
    fn complete_caches_status_and_result() {
        let store = InMemorySearchStore::new();
        store.insert(record("t-1"));
        store.complete("t-1", "finished", ExtractionResult::empty("done"));
        let fetched = store.get("t-1").expect("record present");
        assert_eq!(fetched.final_status.as_deref(), Some("finished"));
        assert_eq!(fetched.result.expect("cached").summary, "done");
    }

    #[test]
    fn complete_on_unknown_task_is_a_no_op() {
        let store = InMemorySearchStore::new();
        store.complete("ghost", "finished", ExtractionResult::empty("done"));
        assert!(store.get("ghost").is_none());
    }
}
