use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobStatus};

use super::orchestrator::{OrchestratorError, PipelineOrchestrator};

#[derive(Debug, Clone)]
pub struct PipelineMessage {
    pub job_id: JobId,
    /// Set for jobs a previous process left running.
    pub resume: bool,
}

impl PipelineMessage {
    pub fn start(job_id: JobId) -> Self {
        Self {
            job_id,
            resume: false,
        }
    }

    pub fn resume(job_id: JobId) -> Self {
        Self {
            job_id,
            resume: true,
        }
    }
}

type JobResult = (JobId, Result<Job, OrchestratorError>);

/// Receives queued jobs and runs each one as its own task.
pub struct PipelineWorker {
    receiver: mpsc::Receiver<PipelineMessage>,
    orchestrator: Arc<PipelineOrchestrator>,
    permits: Arc<Semaphore>,
}

impl PipelineWorker {
    pub fn new(
        receiver: mpsc::Receiver<PipelineMessage>,
        orchestrator: Arc<PipelineOrchestrator>,
        max_concurrent_jobs: usize,
    ) -> Self {
        Self {
            receiver,
            orchestrator,
            permits: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Pipeline worker started");
        let mut tasks: JoinSet<JobResult> = JoinSet::new();
        let mut running: HashMap<tokio::task::Id, JobId> = HashMap::new();

        loop {
            tokio::select! {
                message = self.receiver.recv() => match message {
                    Some(message) => self.spawn_job(&mut tasks, &mut running, message).await,
                    None => break,
                },
                Some(joined) = tasks.join_next_with_id(), if !tasks.is_empty() => {
                    reap(joined, &mut running);
                }
            }
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            reap(joined, &mut running);
        }
        tracing::info!("Pipeline worker stopped: channel closed");
    }

    async fn spawn_job(
        &self,
        tasks: &mut JoinSet<JobResult>,
        running: &mut HashMap<tokio::task::Id, JobId>,
        message: PipelineMessage,
    ) {
        let PipelineMessage { job_id, resume } = message;
        let permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Worker semaphore closed");
                return;
            }
        };

        let orchestrator = Arc::clone(&self.orchestrator);
        let span = tracing::info_span!("pipeline_job", job_id = %job_id);
        let handle = tasks.spawn(
            async move {
                let result = if resume {
                    orchestrator.resume(job_id).await
                } else {
                    orchestrator.run(job_id).await
                };
                drop(permit);
                (job_id, result)
            }
            .instrument(span),
        );
        running.insert(handle.id(), job_id);
    }
}

fn reap(
    joined: Result<(tokio::task::Id, JobResult), tokio::task::JoinError>,
    running: &mut HashMap<tokio::task::Id, JobId>,
) {
    match joined {
        Ok((task_id, (job_id, result))) => {
            running.remove(&task_id);
            match result {
                Ok(job) => tracing::debug!(job_id = %job_id, status = %job.status, "Pipeline task finished"),
                Err(e) => tracing::error!(job_id = %job_id, error = %e, "Pipeline task failed"),
            }
        }
        Err(e) => {
            let job_id = running.remove(&e.id());
            tracing::error!(job_id = ?job_id.map(|id| id.to_string()), error = %e, "Pipeline task panicked");
        }
    }
}

/// Re-queues jobs a previous process did not finish: pending jobs start
/// from the beginning, running jobs resume at their interrupted step.
pub async fn recover_unfinished_jobs(
    job_repository: &dyn JobRepository,
    sender: &mpsc::Sender<PipelineMessage>,
) -> Result<usize, RepositoryError> {
    let interrupted = job_repository.list_by_status(JobStatus::Running).await?;
    let pending = job_repository.list_by_status(JobStatus::Pending).await?;
    if !interrupted.is_empty() {
        tracing::warn!(count = interrupted.len(), "Resuming jobs left running by a previous process");
    }

    let messages = interrupted
        .iter()
        .map(|job| PipelineMessage::resume(job.id))
        .chain(pending.iter().map(|job| PipelineMessage::start(job.id)));

    let mut requeued = 0;
    for message in messages {
        if sender.send(message).await.is_err() {
            tracing::warn!("Pipeline queue closed during recovery");
            break;
        }
        requeued += 1;
    }

    if requeued > 0 {
        tracing::info!(count = requeued, "Requeued unfinished jobs");
    }
    Ok(requeued)
}
