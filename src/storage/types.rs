use std::sync::Mutex;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregation::ScenarioCounts;
use crate::error_handling::types::StorageError;

/// A stored credential-like submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedRecord {
    pub id: i64,
    pub origin_address: String,
    pub identifier: String,
    pub secret: String,
    pub agent: Option<String>,
    pub scenario_label: String,
    pub captured_fields: Option<String>,
    pub captured_at: DateTime<Utc>,
}

/// Everything needed to insert a record; id and capture time are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCapturedRecord {
    pub origin_address: String,
    pub identifier: String,
    pub secret: String,
    pub agent: Option<String>,
    pub scenario_label: String,
    pub captured_fields: Option<String>,
}

/// Running totals since the last reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_attempts: u64,
    pub scenario_counts: ScenarioCounts,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_reset: Option<DateTime<Utc>>,
}

/// Encodes a timestamp as fixed-width RFC3339 so that text order equals time order.
pub fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| StorageError::ReadFailed)
}

/// Hands out capture times that never go backwards and never repeat.
///
/// Wall-clock readings are rounded up to the stored microsecond precision; a
/// reading that is not after the previous one is bumped by one microsecond.
#[derive(Debug, Default)]
pub struct CaptureClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl CaptureClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> DateTime<Utc> {
        let reading = ceil_to_micros(Utc::now());
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let next = match *last {
            Some(prev) if reading <= prev => prev + Duration::microseconds(1),
            _ => reading,
        };
        *last = Some(next);
        next
    }
}

/// Rounds up to whole microseconds, so the stored value is never before `ts`.
pub fn ceil_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    let mut micros = ts.timestamp_micros();
    if ts.timestamp_subsec_nanos() % 1_000 != 0 {
        micros += 1;
    }
    DateTime::from_timestamp_micros(micros).unwrap_or(ts)
}
