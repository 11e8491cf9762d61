use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use log::{error, info};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ConnectOptions, ConnectionTrait,
    Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    TransactionTrait,
};

use crate::aggregation::{self, ScenarioCounts, STATS_ROW_ID};
use crate::error_handling::types::StorageError;
use crate::storage::db_entities::{captured_records, scenario_counts, session_stats};
use crate::storage::storage_trait::Storage;
use crate::storage::types::{
    ceil_to_micros, decode_timestamp, encode_timestamp, AggregateStats, CaptureClock,
    CapturedRecord, NewCapturedRecord,
};

const SCHEMA: [&str; 4] = [
    "PRAGMA journal_mode = WAL;",
    "CREATE TABLE IF NOT EXISTS captured_records (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        origin_address TEXT NOT NULL,
        identifier TEXT NOT NULL,
        secret TEXT NOT NULL,
        agent TEXT,
        scenario_label TEXT NOT NULL,
        captured_fields TEXT,
        captured_at TEXT NOT NULL
    );",
    "CREATE TABLE IF NOT EXISTS session_stats (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        total_attempts INTEGER NOT NULL DEFAULT 0 CHECK (total_attempts >= 0),
        last_reset TEXT
    );",
    "CREATE TABLE IF NOT EXISTS scenario_counts (
        label TEXT PRIMARY KEY,
        count INTEGER NOT NULL CHECK (count >= 0)
    );",
];

fn read_err(e: DbErr) -> StorageError {
    error!("Database read failed: {}", e);
    StorageError::ReadFailed
}

fn write_err(e: DbErr) -> StorageError {
    error!("Database write failed: {}", e);
    StorageError::WriteFailed
}

impl TryFrom<captured_records::Model> for CapturedRecord {
    type Error = StorageError;

    fn try_from(row: captured_records::Model) -> Result<Self, Self::Error> {
        Ok(CapturedRecord {
            id: row.id,
            origin_address: row.origin_address,
            identifier: row.identifier,
            secret: row.secret,
            agent: row.agent,
            scenario_label: row.scenario_label,
            captured_fields: row.captured_fields,
            captured_at: decode_timestamp(&row.captured_at)?,
        })
    }
}

/// SQLite-backed storage of captured records and session statistics.
pub struct DatabaseStorage {
    db: DatabaseConnection,
    clock: CaptureClock,
}

impl DatabaseStorage {
    /// Creates or opens the database at `path` and ensures the schema exists.
    pub async fn new_file<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    error!("Failed to create database dir {}: {}", parent.display(), e);
                    StorageError::WriteFailed
                })?;
            }
        }

        let mut opts = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path_ref.display()));
        opts.max_connections(5).sqlx_logging(false);
        let db = Database::connect(opts).await.map_err(|e| {
            error!("Failed to open database {}: {}", path_ref.display(), e);
            StorageError::ConnectionFailed
        })?;

        for statement in SCHEMA {
            db.execute_unprepared(statement).await.map_err(write_err)?;
        }
        info!("Database storage initialized at {}", path_ref.display());

        Ok(Self {
            db,
            clock: CaptureClock::new(),
        })
    }

    async fn read_stats<C: ConnectionTrait>(conn: &C) -> Result<AggregateStats, StorageError> {
        let row = session_stats::Entity::find_by_id(STATS_ROW_ID)
            .one(conn)
            .await
            .map_err(read_err)?;
        let Some(row) = row else {
            return Ok(AggregateStats::default());
        };

        let counters = scenario_counts::Entity::find()
            .all(conn)
            .await
            .map_err(read_err)?;
        let scenario_counts: ScenarioCounts = counters
            .into_iter()
            .map(|c| (c.label, c.count.max(0) as u64))
            .collect();

        Ok(AggregateStats {
            total_attempts: row.total_attempts.max(0) as u64,
            scenario_counts,
            last_reset: row.last_reset.as_deref().map(decode_timestamp).transpose()?,
        })
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn insert_capture(
        &self,
        record: NewCapturedRecord,
    ) -> Result<CapturedRecord, StorageError> {
        let txn = self.db.begin().await.map_err(write_err)?;

        // The counter upsert takes the write lock, so the timestamp read below
        // and the id assigned by the insert follow the same commit order.
        aggregation::increment(&txn, &record.scenario_label)
            .await
            .map_err(write_err)?;

        let row = captured_records::ActiveModel {
            id: NotSet,
            origin_address: Set(record.origin_address),
            identifier: Set(record.identifier),
            secret: Set(record.secret),
            agent: Set(record.agent),
            scenario_label: Set(record.scenario_label),
            captured_fields: Set(record.captured_fields),
            captured_at: Set(encode_timestamp(self.clock.now())),
        }
        .insert(&txn)
        .await
        .map_err(write_err)?;

        txn.commit().await.map_err(write_err)?;
        row.try_into()
    }

    async fn list_records(&self) -> Result<Vec<CapturedRecord>, StorageError> {
        let rows = captured_records::Entity::find()
            .order_by_asc(captured_records::Column::CapturedAt)
            .order_by_asc(captured_records::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_err)?;
        rows.into_iter().map(CapturedRecord::try_from).collect()
    }

    async fn count_records(&self) -> Result<u64, StorageError> {
        captured_records::Entity::find()
            .count(&self.db)
            .await
            .map_err(read_err)
    }

    async fn stats(&self) -> Result<AggregateStats, StorageError> {
        // One read transaction so the total and the counters come from the same snapshot.
        let txn = self.db.begin().await.map_err(read_err)?;
        let stats = Self::read_stats(&txn).await?;
        txn.commit().await.map_err(read_err)?;
        Ok(stats)
    }

    async fn clear_records(&self) -> Result<u64, StorageError> {
        let res = captured_records::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(write_err)?;
        Ok(res.rows_affected)
    }

    async fn reset(&self) -> Result<AggregateStats, StorageError> {
        let txn = self.db.begin().await.map_err(write_err)?;

        captured_records::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(write_err)?;
        let reset_at = ceil_to_micros(Utc::now());
        aggregation::zero(&txn, encode_timestamp(reset_at))
            .await
            .map_err(write_err)?;
        let stats = Self::read_stats(&txn).await?;

        txn.commit().await.map_err(write_err)?;
        Ok(stats)
    }
}
