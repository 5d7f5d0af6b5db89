//! JSON-file-backed history provider.
//!
//! The whole store is one JSON array of [`StoredResult`] rows. The file is
//! re-read on every fetch, so concurrent per-type breakdown queries stay
//! independent of each other and of writers.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use cogtrack_core::error::HistoryError;
use cogtrack_core::model::TestType;
use cogtrack_core::traits::{HistoryEntry, HistoryProvider};

use crate::record::StoredResult;

/// A history provider backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one result and rewrite the store.
    pub fn append(&self, result: StoredResult) -> Result<()> {
        let mut all = self.read_all()?;
        all.push(result);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&all).context("failed to serialize history")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write history to {}", self.path.display()))?;
        Ok(())
    }

    /// All stored rows; a missing file reads as an empty store.
    pub fn read_all(&self) -> Result<Vec<StoredResult>, HistoryError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("history store {} not found, treating as empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(HistoryError::Io(e)),
        };
        serde_json::from_str(&content).map_err(|e| {
            HistoryError::Malformed(format!("{}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl HistoryProvider for JsonFileHistory {
    async fn fetch_recent(
        &self,
        user_id: &str,
        test_type: Option<TestType>,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut matching: Vec<StoredResult> = self
            .read_all()?
            .into_iter()
            .filter(|r| r.completed && r.user_id == user_id)
            .filter(|r| test_type.map_or(true, |t| r.test_type == t))
            .collect();
        matching.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        matching.truncate(limit);
        Ok(matching.iter().map(StoredResult::to_entry).collect())
    }
}
