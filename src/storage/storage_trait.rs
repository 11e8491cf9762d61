//! Storage Trait
//!
//! This module defines the `Storage` trait, which provides an interface for
//! capture storage backends.
//!
//! Implementors of this trait are responsible for:
//! - Persisting captured records together with their aggregate increment
//! - Returning records in capture order
//! - Clearing records and resetting the aggregate
//!
//! All methods return a `Result` to handle potential storage errors.

use async_trait::async_trait;

use crate::error_handling::types::StorageError;
use crate::storage::types::{AggregateStats, CapturedRecord, NewCapturedRecord};

#[async_trait]
pub trait Storage: Send + Sync {
    /// Inserts a record and increments the aggregate for its scenario.
    ///
    /// Either both happen or neither does. The returned record carries the
    /// assigned id and capture time.
    async fn insert_capture(
        &self,
        record: NewCapturedRecord,
    ) -> Result<CapturedRecord, StorageError>;

    /// All records, ascending by capture time then id.
    async fn list_records(&self) -> Result<Vec<CapturedRecord>, StorageError>;

    async fn count_records(&self) -> Result<u64, StorageError>;

    /// Current aggregate, or a zeroed default when none exists yet.
    async fn stats(&self) -> Result<AggregateStats, StorageError>;

    /// Deletes every record without touching the aggregate. Returns the number removed.
    async fn clear_records(&self) -> Result<u64, StorageError>;

    /// Deletes every record and zeroes the aggregate, stamping the reset time.
    async fn reset(&self) -> Result<AggregateStats, StorageError>;
}
