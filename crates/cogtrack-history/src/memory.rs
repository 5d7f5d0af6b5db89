//! In-memory history provider for testing and embedding.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use cogtrack_core::error::HistoryError;
use cogtrack_core::model::TestType;
use cogtrack_core::traits::{HistoryEntry, HistoryProvider};

use crate::record::StoredResult;

/// A history provider backed by an in-memory vector.
///
/// Useful for exercising the trend analyzer without a store on disk;
/// fetches can be counted and individual test types can be made to fail.
#[derive(Default)]
pub struct MemoryHistory {
    results: Mutex<Vec<StoredResult>>,
    /// Test types whose fetches should fail, for error-path tests.
    fail_types: Mutex<HashSet<TestType>>,
    /// Number of fetches served.
    fetch_count: AtomicU32,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider pre-populated with the given results.
    pub fn with_results(results: Vec<StoredResult>) -> Self {
        Self {
            results: Mutex::new(results),
            ..Self::default()
        }
    }

    /// Append one result.
    pub fn record(&self, result: StoredResult) {
        self.results.lock().unwrap().push(result);
    }

    /// Make fetches for one test type fail with a backend error.
    pub fn fail_type(&self, test_type: TestType) {
        self.fail_types.lock().unwrap().insert(test_type);
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl HistoryProvider for MemoryHistory {
    async fn fetch_recent(
        &self,
        user_id: &str,
        test_type: Option<TestType>,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);

        if let Some(t) = test_type {
            if self.fail_types.lock().unwrap().contains(&t) {
                return Err(HistoryError::Unavailable(format!(
                    "simulated outage for {t}"
                )));
            }
        }

        let results = self.results.lock().unwrap();
        let mut matching: Vec<&StoredResult> = results
            .iter()
            .filter(|r| r.completed && r.user_id == user_id)
            .filter(|r| test_type.map_or(true, |t| r.test_type == t))
            .collect();
        matching.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

        Ok(matching
            .into_iter()
            .take(limit)
            .map(StoredResult::to_entry)
            .collect())
    }
}
