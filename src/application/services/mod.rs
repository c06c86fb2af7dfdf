mod job_service;
mod orchestrator;
mod pipeline_worker;
pub mod stages;

pub use job_service::{
    CreateJobRequest, DocumentDownload, JobService, JobServiceError, UploadedDocument,
};
pub use orchestrator::{INTERRUPTED_ERROR, OrchestratorError, PipelineOrchestrator};
pub use pipeline_worker::{PipelineMessage, PipelineWorker, recover_unfinished_jobs};
pub use stages::{
    Collaborators, StageError, StageExecutors, StageOutcome, StageSettings, StageTimeouts,
    fallback_message,
};
