use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::application::ports::{ArtifactStore, ArtifactStoreError, JobRepository, RepositoryError};
use crate::domain::{
    ContentType, InputSnapshot, Job, JobId, JobStatus, MerchantProfile, OrganizationId, OwnerId,
    ProposalOptions, SourceDocument, StoragePath,
};

use super::pipeline_worker::PipelineMessage;

pub struct UploadedDocument {
    pub filename: String,
    pub content_type: ContentType,
    pub data: Bytes,
}

pub struct CreateJobRequest {
    pub owner_id: OwnerId,
    pub organization_id: OrganizationId,
    pub merchant: MerchantProfile,
    pub options: ProposalOptions,
    pub documents: Vec<UploadedDocument>,
}

#[derive(Debug, Clone)]
pub struct DocumentDownload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Entry point for clients: creates jobs, reports their status and serves
/// the finished proposal.
pub struct JobService {
    job_repository: Arc<dyn JobRepository>,
    artifact_store: Arc<dyn ArtifactStore>,
    sender: mpsc::Sender<PipelineMessage>,
}

impl JobService {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        artifact_store: Arc<dyn ArtifactStore>,
        sender: mpsc::Sender<PipelineMessage>,
    ) -> Self {
        Self {
            job_repository,
            artifact_store,
            sender,
        }
    }

    /// Stages the uploads, records a pending job and queues it for the worker.
    /// Returns as soon as the job is queued.
    #[tracing::instrument(skip(self, request), fields(merchant = %request.merchant.business_name))]
    pub async fn create_job(&self, request: CreateJobRequest) -> Result<JobId, JobServiceError> {
        validate(&request)?;

        let permit = self
            .sender
            .try_reserve()
            .map_err(|_| JobServiceError::QueueUnavailable)?;

        let job_id = JobId::new();
        let mut documents = Vec::with_capacity(request.documents.len());
        for (index, upload) in request.documents.into_iter().enumerate() {
            let storage_path = StoragePath::input(&job_id, index, &upload.filename);
            let size_bytes = match self.artifact_store.put(&storage_path, upload.data).await {
                Ok(size_bytes) => size_bytes,
                Err(e) => {
                    self.discard_staged(&documents).await;
                    return Err(e.into());
                }
            };
            documents.push(SourceDocument {
                filename: upload.filename,
                content_type: upload.content_type,
                size_bytes,
                storage_path,
            });
        }

        let input = InputSnapshot {
            merchant: request.merchant,
            documents,
            options: request.options,
        };
        let job = Job::new(job_id, input, request.owner_id, request.organization_id);
        if let Err(e) = self.job_repository.create(&job).await {
            self.discard_staged(&job.input.documents).await;
            return Err(e.into());
        }

        permit.send(PipelineMessage::start(job_id));
        tracing::info!(job_id = %job_id, documents = job.input.documents.len(), "Proposal job queued");

        Ok(job_id)
    }

    /// Best-effort removal of uploads staged for a job that was never recorded.
    async fn discard_staged(&self, documents: &[SourceDocument]) {
        for document in documents {
            if let Err(e) = self.artifact_store.delete(&document.storage_path).await {
                tracing::warn!(
                    path = %document.storage_path,
                    error = %e,
                    "Failed to remove staged upload"
                );
            }
        }
    }

    pub async fn get_job_status(&self, job_id: JobId) -> Result<Job, JobServiceError> {
        self.job_repository
            .get_by_id(job_id)
            .await?
            .ok_or(JobServiceError::NotFound(job_id))
    }

    pub async fn get_job_artifact(&self, job_id: JobId) -> Result<DocumentDownload, JobServiceError> {
        let job = self.get_job_status(job_id).await?;
        if job.status != JobStatus::Completed {
            return Err(JobServiceError::NotReady {
                job_id,
                status: job.status,
            });
        }

        let document = job
            .artifacts
            .rendered_document
            .ok_or(JobServiceError::NotFound(job_id))?;
        let bytes = self.artifact_store.fetch(&document.storage_path).await?;

        Ok(DocumentDownload {
            filename: document.filename,
            content_type: document.content_type,
            bytes,
        })
    }
}

fn validate(request: &CreateJobRequest) -> Result<(), JobServiceError> {
    if request.merchant.business_name.trim().is_empty() {
        return Err(JobServiceError::Validation(
            "business_name is required".to_string(),
        ));
    }
    if request.owner_id.as_str().trim().is_empty() {
        return Err(JobServiceError::Validation("owner_id is required".to_string()));
    }
    if request.organization_id.as_str().trim().is_empty() {
        return Err(JobServiceError::Validation(
            "organization_id is required".to_string(),
        ));
    }
    if request.documents.is_empty() {
        return Err(JobServiceError::Validation(
            "at least one statement document is required".to_string(),
        ));
    }
    if let Some(empty) = request.documents.iter().find(|d| d.data.is_empty()) {
        return Err(JobServiceError::Validation(format!(
            "document {} is empty",
            empty.filename
        )));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("job {job_id} is {status}; document not ready")]
    NotReady { job_id: JobId, status: JobStatus },
    #[error("pipeline queue full or worker unavailable")]
    QueueUnavailable,
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("storage: {0}")]
    Storage(#[from] ArtifactStoreError),
}
