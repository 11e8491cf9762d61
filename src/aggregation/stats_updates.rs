//! Atomic updates of the aggregate statistics.
//!
//! Both tables are written with `INSERT ... ON CONFLICT DO UPDATE`, so the
//! row is created lazily on first use and concurrent captures never lose an
//! increment: the addition happens inside the database, not in a
//! read-modify-write cycle here.

use log::debug;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveValue::Set, ConnectionTrait, DbErr, EntityTrait};

use crate::storage::db_entities::{scenario_counts, session_stats};

/// Primary key of the single aggregate row.
pub const STATS_ROW_ID: i32 = 1;

/// Label counted when a capture does not name its scenario.
pub const UNSPECIFIED_SCENARIO: &str = "unspecified";

/// Adds one attempt to the total and to `label`'s counter.
pub async fn increment<C: ConnectionTrait>(conn: &C, label: &str) -> Result<(), DbErr> {
    let stats = session_stats::ActiveModel {
        id: Set(STATS_ROW_ID),
        total_attempts: Set(1),
        last_reset: Set(None),
    };
    session_stats::Entity::insert(stats)
        .on_conflict(
            OnConflict::column(session_stats::Column::Id)
                .value(
                    session_stats::Column::TotalAttempts,
                    Expr::col(session_stats::Column::TotalAttempts).add(1),
                )
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let counter = scenario_counts::ActiveModel {
        label: Set(label.to_string()),
        count: Set(1),
    };
    scenario_counts::Entity::insert(counter)
        .on_conflict(
            OnConflict::column(scenario_counts::Column::Label)
                .value(
                    scenario_counts::Column::Count,
                    Expr::col(scenario_counts::Column::Count).add(1),
                )
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    debug!("Incremented aggregate for scenario '{}'", label);
    Ok(())
}

/// Zeroes the aggregate and stamps `last_reset`, creating the row if absent.
///
/// Scenario keys are removed rather than set to zero.
pub async fn zero<C: ConnectionTrait>(conn: &C, last_reset: String) -> Result<(), DbErr> {
    scenario_counts::Entity::delete_many().exec(conn).await?;

    let stats = session_stats::ActiveModel {
        id: Set(STATS_ROW_ID),
        total_attempts: Set(0),
        last_reset: Set(Some(last_reset)),
    };
    session_stats::Entity::insert(stats)
        .on_conflict(
            OnConflict::column(session_stats::Column::Id)
                .update_columns([
                    session_stats::Column::TotalAttempts,
                    session_stats::Column::LastReset,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
