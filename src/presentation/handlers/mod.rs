mod create_job;
mod error_response;
mod health;
mod job_document;
mod job_status;

pub use create_job::{CreateJobResponse, create_job_handler};
pub use error_response::ErrorResponse;
pub use health::health_handler;
pub use job_document::job_document_handler;
pub use job_status::{ArtifactsResponse, DocumentReference, JobStatusResponse, job_status_handler};
