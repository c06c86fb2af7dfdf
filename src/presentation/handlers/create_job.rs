use axum::Json;
use axum::extract::{Multipart, State};
use axum::extract::multipart::Field;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::error_response::{error_response, service_error_response};
use crate::application::services::{CreateJobRequest, UploadedDocument};
use crate::domain::{ContentType, JobStatus, MerchantProfile, OrganizationId, OwnerId, ProposalOptions};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct CreateJobResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub message: String,
}

#[derive(Default)]
struct CreateJobForm {
    business_name: Option<String>,
    website: Option<String>,
    industry: Option<String>,
    contact_name: Option<String>,
    owner_id: Option<String>,
    organization_id: Option<String>,
    include_narrative: Option<bool>,
    include_images: Option<bool>,
    documents: Vec<UploadedDocument>,
}

impl CreateJobForm {
    fn into_request(self) -> Result<CreateJobRequest, String> {
        let defaults = ProposalOptions::default();
        Ok(CreateJobRequest {
            owner_id: OwnerId::new(self.owner_id.ok_or("owner_id is required")?),
            organization_id: OrganizationId::new(
                self.organization_id.ok_or("organization_id is required")?,
            ),
            merchant: MerchantProfile {
                business_name: self.business_name.ok_or("business_name is required")?,
                website: self.website,
                industry: self.industry,
                contact_name: self.contact_name,
            },
            options: ProposalOptions {
                include_narrative: self.include_narrative.unwrap_or(defaults.include_narrative),
                include_images: self.include_images.unwrap_or(defaults.include_images),
            },
            documents: self.documents,
        })
    }
}

#[tracing::instrument(skip(state, multipart))]
pub async fn create_job_handler(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let request = match form.into_request() {
        Ok(request) => request,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    tracing::debug!(
        business_name = %request.merchant.business_name,
        documents = request.documents.len(),
        "Creating proposal job"
    );

    match state.job_service.create_job(request).await {
        Ok(job_id) => (
            StatusCode::ACCEPTED,
            Json(CreateJobResponse {
                job_id: job_id.to_string(),
                status: JobStatus::Pending,
                message: "Proposal generation started".to_string(),
            }),
        )
            .into_response(),
        Err(e) => service_error_response(e),
    }
}

async fn read_form(mut multipart: Multipart) -> Result<CreateJobForm, Response> {
    let mut form = CreateJobForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart");
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {}", e),
                ));
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "document" => form.documents.push(read_document(field).await?),
            "business_name" => form.business_name = text(field).await?,
            "website" => form.website = text(field).await?,
            "industry" => form.industry = text(field).await?,
            "contact_name" => form.contact_name = text(field).await?,
            "owner_id" => form.owner_id = text(field).await?,
            "organization_id" => form.organization_id = text(field).await?,
            "include_narrative" => form.include_narrative = flag(&name, field).await?,
            "include_images" => form.include_images = flag(&name, field).await?,
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(form)
}

async fn read_document(field: Field<'_>) -> Result<UploadedDocument, Response> {
    let filename = field.file_name().unwrap_or("statement").to_string();
    let mime = field.content_type().map(str::to_string);

    let Some(content_type) = ContentType::detect(mime.as_deref(), &filename) else {
        return Err(error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!(
                "Unsupported content type for {}: {}",
                filename,
                mime.as_deref().unwrap_or("unknown")
            ),
        ));
    };

    let data = field.bytes().await.map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, format!("Failed to read file: {}", e))
    })?;

    tracing::debug!(filename = %filename, bytes = data.len(), "Statement received");
    Ok(UploadedDocument {
        filename,
        content_type,
        data,
    })
}

/// Blank text fields count as absent.
async fn text(field: Field<'_>) -> Result<Option<String>, Response> {
    let value = field.text().await.map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, format!("Failed to read field: {}", e))
    })?;
    let trimmed = value.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

async fn flag(name: &str, field: Field<'_>) -> Result<Option<bool>, Response> {
    match text(field).await?.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(None),
        Some("true" | "1" | "yes" | "on") => Ok(Some(true)),
        Some("false" | "0" | "no" | "off") => Ok(Some(false)),
        Some(other) => Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("{} must be true or false, got {}", name, other),
        )),
    }
}
