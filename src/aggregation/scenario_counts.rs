use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-scenario attempt counters.
///
/// Serialized as a flat JSON object (`{"gmail": 1, "banking": 2}`); keys are
/// kept sorted so exports and dashboard output are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioCounts(BTreeMap<String, u64>);

impl ScenarioCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> u64 {
        self.0.get(label).copied().unwrap_or(0)
    }

    pub fn insert(&mut self, label: impl Into<String>, count: u64) {
        self.0.insert(label.into(), count);
    }

    /// Sum over all scenarios. Equal to the stored total attempt count.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(String, u64)> for ScenarioCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
