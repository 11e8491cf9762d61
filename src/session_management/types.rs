use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::storage::types::CapturedRecord;

/// Snapshot of the captured records handed out by the export endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub export_date: DateTime<Utc>,
    pub attempts: Vec<CapturedRecord>,
    /// Number of exported records, not the aggregate total.
    pub total_attempts: usize,
}

impl ExportDocument {
    pub fn new(export_date: DateTime<Utc>, attempts: Vec<CapturedRecord>) -> Self {
        Self {
            export_date,
            total_attempts: attempts.len(),
            attempts,
        }
    }

    /// Download name, e.g. `phishlab-export-2024-05-01.json`.
    pub fn filename(&self) -> String {
        format!("phishlab-export-{}.json", self.export_date.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_export_filename_and_count() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 13, 45, 0).unwrap();
        let doc = ExportDocument::new(date, Vec::new());
        assert_eq!(doc.filename(), "phishlab-export-2024-05-01.json");
        assert_eq!(doc.total_attempts, 0);

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("exportDate").is_some());
        assert_eq!(json["totalAttempts"], 0);
    }
}
