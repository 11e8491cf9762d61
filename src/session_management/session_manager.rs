use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use serde_json::Value;

use crate::capture::{CaptureSubmission, ClientMeta};
use crate::error_handling::types::{ApiError, StorageError};
use crate::session_management::types::ExportDocument;
use crate::storage::storage_trait::Storage;
use crate::storage::types::{AggregateStats, CapturedRecord};

/// Operations of a demonstration session.
///
/// # Fields Overview
///
/// - `storage`: backend holding the captured records and the aggregate
#[derive(Clone)]
pub struct SessionManager {
    storage: Arc<dyn Storage>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Validates `body`, stores it with the request metadata and counts it.
    ///
    /// Nothing is written when validation fails.
    pub async fn capture(
        &self,
        body: &Value,
        meta: ClientMeta,
    ) -> Result<CapturedRecord, ApiError> {
        let submission = CaptureSubmission::from_json(body).map_err(|e| {
            warn!("Rejected capture from {}: {}", meta.origin_address, e);
            e
        })?;
        let record = self
            .storage
            .insert_capture(submission.into_record(meta))
            .await?;
        info!(
            "Captured record {} for scenario '{}' from {}",
            record.id, record.scenario_label, record.origin_address
        );
        Ok(record)
    }

    pub async fn list_all(&self) -> Result<Vec<CapturedRecord>, StorageError> {
        self.storage.list_records().await
    }

    pub async fn get_stats(&self) -> Result<AggregateStats, StorageError> {
        self.storage.stats().await
    }

    pub async fn export(&self) -> Result<ExportDocument, StorageError> {
        let attempts = self.storage.list_records().await?;
        let doc = ExportDocument::new(Utc::now(), attempts);
        info!("Exported {} records", doc.total_attempts);
        Ok(doc)
    }

    /// Deletes all records. The aggregate is left as it is.
    pub async fn clear_records(&self) -> Result<u64, StorageError> {
        let removed = self.storage.clear_records().await?;
        info!("Cleared {} captured records", removed);
        Ok(removed)
    }

    /// Deletes all records and zeroes the aggregate.
    pub async fn reset_all(&self) -> Result<AggregateStats, StorageError> {
        let discarded = self.storage.count_records().await?;
        let stats = self.storage.reset().await?;
        info!("Demonstration reset, {} records discarded", discarded);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DatabaseStorage;
    use serde_json::json;
    use tempfile::TempDir;

    async fn manager() -> (TempDir, SessionManager) {
        let dir = TempDir::new().unwrap();
        let storage = DatabaseStorage::new_file(dir.path().join("session.sqlite3"))
            .await
            .unwrap();
        (dir, SessionManager::new(Arc::new(storage)))
    }

    fn meta() -> ClientMeta {
        ClientMeta::from_headers(Some("192.0.2.10"), Some("Mozilla/5.0"), None)
    }

    #[tokio::test]
    async fn test_example_walkthrough() {
        let (_dir, manager) = manager().await;

        let record = manager
            .capture(
                &json!({"identifier": "alice", "secret": "hunter2", "scenarioLabel": "gmail"}),
                meta(),
            )
            .await
            .unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.identifier, "alice");
        assert_eq!(record.secret, "hunter2");
        assert_eq!(record.origin_address, "192.0.2.10");

        let stats = manager.get_stats().await.unwrap();
        assert_eq!(stats.total_attempts, 1);
        assert_eq!(stats.scenario_counts.get("gmail"), 1);

        manager
            .capture(
                &json!({"identifier": "bob", "secret": "1234", "scenarioLabel": "banking"}),
                meta(),
            )
            .await
            .unwrap();
        let stats = manager.get_stats().await.unwrap();
        assert_eq!(stats.total_attempts, 2);
        assert_eq!(stats.scenario_counts.get("gmail"), 1);
        assert_eq!(stats.scenario_counts.get("banking"), 1);
        assert_eq!(stats.scenario_counts.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_capture_changes_nothing() {
        let (_dir, manager) = manager().await;
        manager
            .capture(&json!({"identifier": "a", "secret": "b"}), meta())
            .await
            .unwrap();
        let stats_before = manager.get_stats().await.unwrap();

        let err = manager
            .capture(&json!({"identifier": "alice"}), meta())
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(v) => assert!(v.has_field("secret")),
            other => panic!("unexpected error: {:?}", other),
        }

        assert_eq!(manager.list_all().await.unwrap().len(), 1);
        assert_eq!(manager.get_stats().await.unwrap(), stats_before);
    }

    #[tokio::test]
    async fn test_unlabelled_capture_counted_as_unspecified() {
        let (_dir, manager) = manager().await;
        manager
            .capture(&json!({"identifier": "a", "secret": "b"}), meta())
            .await
            .unwrap();
        let stats = manager.get_stats().await.unwrap();
        assert_eq!(stats.scenario_counts.get("unspecified"), 1);
    }

    #[tokio::test]
    async fn test_clear_then_reset() {
        let (_dir, manager) = manager().await;
        for i in 0..3 {
            manager
                .capture(
                    &json!({"identifier": format!("u{}", i), "secret": "p", "scenarioLabel": "social"}),
                    meta(),
                )
                .await
                .unwrap();
        }

        assert_eq!(manager.clear_records().await.unwrap(), 3);
        assert!(manager.list_all().await.unwrap().is_empty());
        assert_eq!(manager.get_stats().await.unwrap().total_attempts, 3);

        let stats = manager.reset_all().await.unwrap();
        assert_eq!(stats.total_attempts, 0);
        assert!(stats.last_reset.is_some());
        let again = manager.reset_all().await.unwrap();
        assert_eq!(again.total_attempts, 0);
        assert!(again.scenario_counts.is_empty());
    }

    #[tokio::test]
    async fn test_reset_discards_uncleared_records() {
        let (_dir, manager) = manager().await;
        for label in ["gmail", "banking"] {
            manager
                .capture(&json!({"identifier": "a", "secret": "b", "scenarioLabel": label}), meta())
                .await
                .unwrap();
        }

        let stats = manager.reset_all().await.unwrap();
        assert_eq!(stats.total_attempts, 0);
        assert!(manager.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_counts_records_not_aggregate() {
        let (_dir, manager) = manager().await;
        manager
            .capture(&json!({"identifier": "a", "secret": "b"}), meta())
            .await
            .unwrap();
        manager.clear_records().await.unwrap();
        manager
            .capture(&json!({"identifier": "c", "secret": "d"}), meta())
            .await
            .unwrap();

        let doc = manager.export().await.unwrap();
        assert_eq!(doc.total_attempts, 1);
        assert_eq!(doc.attempts[0].identifier, "c");
        tokio_test::assert_ok!(serde_json::to_string(&doc));
    }
}
