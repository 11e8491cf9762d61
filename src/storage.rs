//! Storage subsystem
//!
//! This module provides the abstraction and implementation for persisting
//! captured records and the aggregate statistics of a demonstration session.
//!
//! Components:
//! - `storage_trait`: the Storage trait defining a uniform API.
//! - `types`: shared data types used by storage backends.
//! - `database_storage`: ORM-based SQLite implementation using SeaORM.
//! - `db_entities`: SeaORM entity models for the database backend.

pub mod database_storage;
pub mod db_entities;
pub mod storage_trait;
pub mod types;

pub use database_storage::DatabaseStorage;
pub use storage_trait::Storage;
pub use types::{AggregateStats, CapturedRecord, NewCapturedRecord};
