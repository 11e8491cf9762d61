//! Aggregation subsystem
//!
//! Maintains the single running-total statistics row of a demonstration
//! session. Counters are updated with atomic upserts executed on whatever
//! connection or transaction the caller hands in, so the capture insert and
//! its increment commit together.
//!
//! Components:
//! - `scenario_counts`: the label → count mapping exposed on the wire.
//! - `stats_updates`: increment / zero operations against the stats tables.

pub mod scenario_counts;
pub mod stats_updates;

pub use scenario_counts::ScenarioCounts;
pub use stats_updates::{increment, zero, STATS_ROW_ID, UNSPECIFIED_SCENARIO};
