use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::error_response::{parse_job_id, service_error_response};
use crate::domain::{
    BusinessProfile, ComparisonData, ImageSet, Job, JobStatus, Narrative, ParsedStatement,
    StepName, StepStatus,
};
use crate::presentation::state::AppState;

/// Polling view of a job. Built only from persisted state, so repeated
/// reads of an unchanged job serialize identically.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub current_step: Option<StepName>,
    pub owner_id: String,
    pub organization_id: String,
    pub business_name: String,
    pub steps: Vec<StepStatus>,
    pub artifacts: ArtifactsResponse,
    pub errors: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactsResponse {
    pub statement: Option<ParsedStatement>,
    pub business_profile: Option<BusinessProfile>,
    pub comparison: Option<ComparisonData>,
    pub narrative: Option<Narrative>,
    pub images: Option<ImageSet>,
    pub document: Option<DocumentReference>,
}

#[derive(Debug, Serialize)]
pub struct DocumentReference {
    pub filename: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub download_url: String,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        let job_id = job.id.to_string();
        let artifacts = job.artifacts;
        let document = artifacts.rendered_document.map(|doc| DocumentReference {
            filename: doc.filename,
            content_type: doc.content_type,
            size_bytes: doc.size_bytes,
            download_url: format!("/api/v1/jobs/{}/document", job_id),
        });

        Self {
            status: job.status,
            current_step: job.current_step,
            owner_id: job.owner_id.as_str().to_string(),
            organization_id: job.organization_id.as_str().to_string(),
            business_name: job.input.merchant.business_name,
            steps: job.steps,
            artifacts: ArtifactsResponse {
                statement: artifacts.statement,
                business_profile: artifacts.business_profile,
                comparison: artifacts.comparison,
                narrative: artifacts.narrative,
                images: artifacts.images,
                document,
            },
            errors: job.errors,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
            completed_at: job.completed_at.map(|t| t.to_rfc3339()),
            job_id,
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let job_id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.job_service.get_job_status(job_id).await {
        Ok(job) => (StatusCode::OK, Json(JobStatusResponse::from(job))).into_response(),
        Err(e) => service_error_response(e),
    }
}
