//! Validation of capture payloads.
//!
//! Bodies arrive as arbitrary JSON, so they are checked field by field
//! rather than deserialized straight into a struct; that way every problem
//! is reported at once and unknown fields are simply ignored.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::aggregation::UNSPECIFIED_SCENARIO;
use crate::capture::client_meta::ClientMeta;
use crate::error_handling::types::{FieldViolation, ValidationError};
use crate::storage::types::NewCapturedRecord;

fn label_pattern() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("static label pattern"))
}

/// A validated capture payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSubmission {
    pub identifier: String,
    pub secret: String,
    pub scenario_label: Option<String>,
    pub captured_fields: Option<String>,
}

impl CaptureSubmission {
    /// Validates a request body.
    ///
    /// `identifier` and `secret` must be strings, empty ones included. Length is
    /// bounded only by the request body limit. `scenarioLabel`, when
    /// present, must be a short slug. `capturedFieldsBlob` may be any JSON value;
    /// strings are kept verbatim and everything else is re-serialized. An
    /// `agent` in the body is ignored, the header value is used instead.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let Some(obj) = body.as_object() else {
            return Err(ValidationError {
                violations: vec![FieldViolation::new("body", "Expected a JSON object")],
            });
        };

        let mut violations = Vec::new();
        let identifier = required_string(obj, "identifier", &mut violations);
        let secret = required_string(obj, "secret", &mut violations);

        let scenario_label = match obj.get("scenarioLabel") {
            None | Some(Value::Null) => None,
            Some(Value::String(label)) if label_pattern().is_match(label) => Some(label.clone()),
            Some(Value::String(_)) => {
                violations.push(FieldViolation::new(
                    "scenarioLabel",
                    "Must be 1-64 letters, digits, '-' or '_'",
                ));
                None
            }
            Some(_) => {
                violations.push(FieldViolation::new("scenarioLabel", "Expected string"));
                None
            }
        };

        let captured_fields = match obj.get("capturedFieldsBlob") {
            None | Some(Value::Null) => None,
            Some(Value::String(blob)) => Some(blob.clone()),
            Some(other) => Some(other.to_string()),
        };

        match (identifier, secret) {
            (Some(identifier), Some(secret)) if violations.is_empty() => Ok(Self {
                identifier,
                secret,
                scenario_label,
                captured_fields,
            }),
            _ => Err(ValidationError { violations }),
        }
    }

    /// Label the capture is counted under.
    pub fn effective_label(&self) -> &str {
        self.scenario_label.as_deref().unwrap_or(UNSPECIFIED_SCENARIO)
    }

    /// Combines the payload with server-derived request metadata.
    pub fn into_record(self, meta: ClientMeta) -> NewCapturedRecord {
        let scenario_label = self.effective_label().to_string();
        NewCapturedRecord {
            origin_address: meta.origin_address,
            identifier: self.identifier,
            secret: self.secret,
            agent: meta.agent,
            scenario_label,
            captured_fields: self.captured_fields,
        }
    }
}

fn required_string(
    obj: &Map<String, Value>,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match obj.get(field) {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new(field, "Required"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            violations.push(FieldViolation::new(field, "Expected string"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_minimal_payload() {
        let sub = CaptureSubmission::from_json(&json!({
            "identifier": "alice",
            "secret": "hunter2"
        }))
        .unwrap();
        assert_eq!(sub.identifier, "alice");
        assert_eq!(sub.secret, "hunter2");
        assert_eq!(sub.effective_label(), UNSPECIFIED_SCENARIO);
        assert!(sub.captured_fields.is_none());
    }

    #[test]
    fn test_reports_every_missing_field() {
        let err = CaptureSubmission::from_json(&json!({"scenarioLabel": "gmail"})).unwrap_err();
        assert!(err.has_field("identifier"));
        assert!(err.has_field("secret"));
        assert_eq!(err.violations.len(), 2);
    }

    #[test]
    fn test_rejects_wrong_types() {
        let err = CaptureSubmission::from_json(&json!({
            "identifier": 42,
            "secret": ["x"],
            "scenarioLabel": 7
        }))
        .unwrap_err();
        assert!(err.has_field("identifier"));
        assert!(err.has_field("secret"));
        assert!(err.has_field("scenarioLabel"));
    }

    #[test]
    fn test_accepts_empty_and_long_strings() {
        let sub = CaptureSubmission::from_json(&json!({"identifier": "", "secret": "x"})).unwrap();
        assert_eq!(sub.identifier, "");

        let long = "a".repeat(600);
        let sub = CaptureSubmission::from_json(&json!({
            "identifier": long, "secret": "", "capturedFieldsBlob": "b".repeat(9000)
        }))
        .unwrap();
        assert_eq!(sub.identifier.len(), 600);
        assert_eq!(sub.secret, "");
        assert_eq!(sub.captured_fields.map(|b| b.len()), Some(9000));
    }

    #[test]
    fn test_rejects_non_object() {
        let err = CaptureSubmission::from_json(&json!("alice:hunter2")).unwrap_err();
        assert!(err.has_field("body"));
    }

    #[test]
    fn test_label_shape() {
        let base = |label: &str| json!({"identifier": "a", "secret": "b", "scenarioLabel": label});
        assert!(CaptureSubmission::from_json(&base("gmail")).is_ok());
        assert!(CaptureSubmission::from_json(&base("social_media-2")).is_ok());
        assert!(CaptureSubmission::from_json(&base("")).is_err());
        assert!(CaptureSubmission::from_json(&base("a\"b")).is_err());
        assert!(CaptureSubmission::from_json(&base(&"x".repeat(65))).is_err());
    }

    #[test]
    fn test_blob_kept_or_serialized() {
        let sub = CaptureSubmission::from_json(&json!({
            "identifier": "a", "secret": "b", "capturedFieldsBlob": "{\"pin\":\"1234\"}"
        }))
        .unwrap();
        assert_eq!(sub.captured_fields.as_deref(), Some("{\"pin\":\"1234\"}"));

        let sub = CaptureSubmission::from_json(&json!({
            "identifier": "a", "secret": "b", "capturedFieldsBlob": {"pin": "1234"}
        }))
        .unwrap();
        assert_eq!(sub.captured_fields.as_deref(), Some(r#"{"pin":"1234"}"#));
    }

    #[test]
    fn test_into_record_uses_server_metadata() {
        let sub = CaptureSubmission::from_json(&json!({
            "identifier": "alice", "secret": "hunter2", "scenarioLabel": "gmail",
            "agent": "spoofed"
        }))
        .unwrap();
        let meta = ClientMeta {
            origin_address: "198.51.100.1".into(),
            agent: Some("Mozilla/5.0".into()),
        };
        let record = sub.into_record(meta);
        assert_eq!(record.origin_address, "198.51.100.1");
        assert_eq!(record.agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(record.scenario_label, "gmail");
    }
}
