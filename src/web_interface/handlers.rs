//! Request handlers for the JSON API.
//!
//! Handlers return `ApiError` rejections; `handle_rejection` turns every
//! rejection into a JSON error body with the matching status code.

use std::convert::Infallible;
use std::net::SocketAddr;

use log::error;
use serde_json::Value;
use warp::{http::StatusCode, reply, Rejection, Reply};

use super::types::{ErrorBody, MessageResponse, ResetResponse, ScenarioCatalog};
use crate::capture::{ClientMeta, Scenario};
use crate::error_handling::types::ApiError;
use crate::session_management::SessionManager;

fn reject(err: impl Into<ApiError>) -> Rejection {
    warp::reject::custom(err.into())
}

/// GET /api/stats
pub async fn get_stats(manager: SessionManager) -> Result<impl Reply, Rejection> {
    let stats = manager.get_stats().await.map_err(reject)?;
    Ok(reply::json(&stats))
}

/// POST /api/captured-records
pub async fn create_record(
    body: Value,
    forwarded_for: Option<String>,
    user_agent: Option<String>,
    remote: Option<SocketAddr>,
    manager: SessionManager,
) -> Result<impl Reply, Rejection> {
    let meta = ClientMeta::from_headers(forwarded_for.as_deref(), user_agent.as_deref(), remote);
    let record = manager.capture(&body, meta).await.map_err(reject)?;
    Ok(reply::with_status(reply::json(&record), StatusCode::CREATED))
}

/// GET /api/captured-records
pub async fn list_records(manager: SessionManager) -> Result<impl Reply, Rejection> {
    let records = manager.list_all().await.map_err(reject)?;
    Ok(reply::json(&records))
}

/// DELETE /api/captured-records
pub async fn clear_records(manager: SessionManager) -> Result<impl Reply, Rejection> {
    manager.clear_records().await.map_err(reject)?;
    Ok(reply::json(&MessageResponse {
        message: "Captured data cleared successfully".to_string(),
    }))
}

/// POST /api/reset
pub async fn reset(manager: SessionManager) -> Result<impl Reply, Rejection> {
    let stats = manager.reset_all().await.map_err(reject)?;
    Ok(reply::json(&ResetResponse {
        message: "Demonstration reset successfully".to_string(),
        stats,
    }))
}

/// GET /api/export
pub async fn export(manager: SessionManager) -> Result<impl Reply, Rejection> {
    let doc = manager.export().await.map_err(reject)?;
    let disposition = format!("attachment; filename=\"{}\"", doc.filename());
    Ok(reply::with_header(
        reply::json(&doc),
        "Content-Disposition",
        disposition,
    ))
}

/// GET /api/scenarios
pub async fn list_scenarios() -> Result<impl Reply, Rejection> {
    Ok(reply::json(&ScenarioCatalog::new()))
}

/// GET /api/scenarios/:label
pub async fn get_scenario(label: String) -> Result<impl Reply, Rejection> {
    let scenario = Scenario::from_label(&label)
        .ok_or_else(|| reject(ApiError::NotFound(format!("Scenario '{}'", label))))?;
    Ok(reply::json(&scenario.info()))
}

/// Maps a rejection to a status code and error body.
pub fn rejection_response(err: &Rejection) -> (StatusCode, ErrorBody) {
    if let Some(api) = err.find::<ApiError>() {
        if let ApiError::Storage(e) = api {
            error!("Request failed: {}", e);
        }
        (api.status(), ErrorBody::from(api))
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, ErrorBody::message("Not found"))
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        let api = ApiError::MalformedBody(e.to_string());
        (api.status(), ErrorBody::from(&api))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorBody::message("Request body too large"),
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorBody::message("Request body must be application/json"),
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (
            StatusCode::LENGTH_REQUIRED,
            ErrorBody::message("Content-Length header is required"),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorBody::message("Method not allowed"),
        )
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::message("Internal server error"),
        )
    }
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, body) = rejection_response(&err);
    Ok(reply::with_status(reply::json(&body), status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::types::{FieldViolation, StorageError, ValidationError};

    #[test]
    fn test_custom_rejections_keep_status() {
        let validation = reject(ValidationError {
            violations: vec![FieldViolation::new("secret", "Required")],
        });
        let (status, body) = rejection_response(&validation);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.errors.unwrap().len(), 1);

        let (status, _) = rejection_response(&reject(StorageError::ReadFailed));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, body) = rejection_response(&reject(ApiError::NotFound("Scenario 'x'".into())));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Scenario 'x' not found");
    }

    #[test]
    fn test_builtin_not_found() {
        let (status, body) = rejection_response(&warp::reject::not_found());
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Not found");
    }

    #[tokio::test]
    async fn test_unknown_scenario_rejected() {
        assert!(get_scenario("fax".into()).await.is_err());
        assert!(get_scenario("banking".into()).await.is_ok());
    }
}
