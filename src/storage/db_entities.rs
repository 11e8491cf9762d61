//! SeaORM entity models used by the database storage backend.
//!
//! These structs map to the SQLite tables created by `database_storage`:
//! - `captured_records`: one row per captured submission
//! - `session_stats`: the single aggregate row (`id = 1`)
//! - `scenario_counts`: per-scenario counters belonging to the aggregate

/// Captured submissions table.
pub mod captured_records {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "captured_records")]
    pub struct Model {
        /// AUTOINCREMENT row id, never reused after deletes
        #[sea_orm(primary_key)]
        pub id: i64,
        /// Origin network address derived from the request
        pub origin_address: String,
        pub identifier: String,
        pub secret: String,
        /// User-Agent header, if sent
        pub agent: Option<String>,
        pub scenario_label: String,
        /// Free-form captured-field blob, stored verbatim
        pub captured_fields: Option<String>,
        /// Fixed-width RFC3339 timestamp (microseconds, UTC)
        pub captured_at: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Aggregate statistics table. Holds at most one row.
pub mod session_stats {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "session_stats")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i32,
        pub total_attempts: i64,
        /// Optional RFC3339 timestamp of the last reset
        pub last_reset: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Per-scenario counters of the aggregate.
pub mod scenario_counts {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "scenario_counts")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub label: String,
        pub count: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
