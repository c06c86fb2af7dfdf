use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::JobServiceError;
use crate::domain::JobId;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

pub fn parse_job_id(raw: &str) -> Result<JobId, Response> {
    Uuid::parse_str(raw)
        .map(JobId::from_uuid)
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, format!("Invalid job ID: {}", raw)))
}

/// Maps service failures onto HTTP statuses. Lookups of unknown jobs are
/// ordinary client traffic and only logged at debug.
pub fn service_error_response(error: JobServiceError) -> Response {
    match &error {
        JobServiceError::Validation(_) => {
            tracing::debug!(error = %error, "Rejected job request");
            error_response(StatusCode::BAD_REQUEST, error.to_string())
        }
        JobServiceError::NotFound(_) => {
            tracing::debug!(error = %error, "Job lookup missed");
            error_response(StatusCode::NOT_FOUND, error.to_string())
        }
        JobServiceError::NotReady { .. } => error_response(StatusCode::CONFLICT, error.to_string()),
        JobServiceError::QueueUnavailable => {
            tracing::warn!("Pipeline queue full; rejecting job");
            error_response(StatusCode::SERVICE_UNAVAILABLE, error.to_string())
        }
        JobServiceError::Repository(_) | JobServiceError::Storage(_) => {
            tracing::error!(error = %error, "Job request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
    }
}
