use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::instrument;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{ArtifactValue, ArtifactWrite, Job, JobId, JobStatus, StepEvent};

/// Process-local job store. Each job sits behind its own mutex, so writers
/// to one job queue up while other jobs proceed untouched.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<JobId, Arc<Mutex<Job>>>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, id: JobId) -> Result<Arc<Mutex<Job>>, RepositoryError> {
        self.jobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("job {}", id)))
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "job {} already exists",
                job.id
            )));
        }
        jobs.insert(job.id, Arc::new(Mutex::new(job.clone())));
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let entry = self.jobs.read().await.get(&id).cloned();
        match entry {
            Some(entry) => Ok(Some(entry.lock().await.clone())),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, events), fields(job_id = %id, events = events.len()))]
    async fn apply_transition(
        &self,
        id: JobId,
        events: &[StepEvent],
    ) -> Result<Job, RepositoryError> {
        let entry = self.entry(id).await?;
        let mut job = entry.lock().await;
        let next = job.apply_all(events)?;
        *job = next.clone();
        Ok(next)
    }

    #[instrument(skip(self, value), fields(job_id = %id, artifact = %value.name()))]
    async fn set_artifact(&self, id: JobId, value: ArtifactValue) -> Result<Job, RepositoryError> {
        let entry = self.entry(id).await?;
        let mut job = entry.lock().await;
        let name = value.name();
        if job.set_artifact(value) == ArtifactWrite::AlreadySet {
            tracing::warn!(artifact = %name, "Artifact already set; keeping existing value");
        }
        Ok(job.clone())
    }

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError> {
        let entries: Vec<Arc<Mutex<Job>>> = self.jobs.read().await.values().cloned().collect();

        let mut jobs = Vec::new();
        for entry in entries {
            let job = entry.lock().await;
            if job.status == status {
                jobs.push(job.clone());
            }
        }
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}
