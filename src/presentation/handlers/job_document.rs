use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use super::error_response::{parse_job_id, service_error_response};
use crate::presentation::state::AppState;

#[tracing::instrument(skip(state))]
pub async fn job_document_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let job_id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.job_service.get_job_artifact(job_id).await {
        Ok(download) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                download.filename.replace('"', "")
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, download.content_type),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                download.bytes,
            )
                .into_response()
        }
        Err(e) => service_error_response(e),
    }
}
