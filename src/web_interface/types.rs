use serde::Serialize;

use crate::capture::scenario::{ScenarioInfo, GENERAL_RED_FLAGS, PREVENTION_TIPS};
use crate::capture::Scenario;
use crate::error_handling::types::{ApiError, FieldViolation};
use crate::storage::types::AggregateStats;

/// Error payload returned with every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

impl ErrorBody {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Validation(v) => Self {
                message: "Invalid data".to_string(),
                errors: Some(v.violations.clone()),
            },
            ApiError::MalformedBody(reason) => Self::message(format!("Malformed request body: {}", reason)),
            // store details stay in the server log
            ApiError::Storage(_) => Self::message("Internal storage failure"),
            ApiError::NotFound(what) => Self::message(format!("{} not found", what)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: String,
    pub stats: AggregateStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioCatalog {
    pub scenarios: Vec<ScenarioInfo>,
    pub general_red_flags: &'static [&'static str],
    pub prevention_tips: &'static [&'static str],
}

impl ScenarioCatalog {
    pub fn new() -> Self {
        Self {
            scenarios: Scenario::ALL.iter().map(|s| s.info()).collect(),
            general_red_flags: GENERAL_RED_FLAGS,
            prevention_tips: PREVENTION_TIPS,
        }
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::types::{StorageError, ValidationError};

    #[test]
    fn test_validation_body_lists_violations() {
        let err = ApiError::Validation(ValidationError {
            violations: vec![FieldViolation::new("identifier", "Required")],
        });
        let json = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(json["message"], "Invalid data");
        assert_eq!(json["errors"][0]["field"], "identifier");
    }

    #[test]
    fn test_storage_body_is_generic() {
        let json = serde_json::to_value(ErrorBody::from(&ApiError::Storage(
            StorageError::WriteFailed,
        )))
        .unwrap();
        assert_eq!(json["message"], "Internal storage failure");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_catalog_lists_all_scenarios() {
        let catalog = ScenarioCatalog::new();
        assert_eq!(catalog.scenarios.len(), Scenario::ALL.len());
        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json["preventionTips"].as_array().unwrap().len() >= 3);
    }
}
