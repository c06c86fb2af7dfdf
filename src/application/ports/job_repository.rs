use async_trait::async_trait;

use crate::domain::{ArtifactValue, Job, JobId, JobStatus, StepEvent};

use super::RepositoryError;

/// Durable job records.
///
/// Writes to the same job are serialized; writes to different jobs never
/// wait on each other.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// Runs `events` through [`Job::apply_all`] under the job's lock and
    /// persists the result. Nothing is written if any event is rejected.
    async fn apply_transition(
        &self,
        id: JobId,
        events: &[StepEvent],
    ) -> Result<Job, RepositoryError>;

    /// Writes an artifact field once. Writing a field that is already set
    /// keeps the stored value and logs a warning.
    async fn set_artifact(&self, id: JobId, value: ArtifactValue) -> Result<Job, RepositoryError>;

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError>;
}
