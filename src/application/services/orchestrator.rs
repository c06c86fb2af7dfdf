use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{FailureClass, Job, JobId, JobStatus, STEP_TABLE, StepEvent, StepName};

use super::stages::{StageError, StageExecutors, fallback_message};

/// Error recorded on a hard-fail step that was running when the process stopped.
pub const INTERRUPTED_ERROR: &str = "interrupted by restart before the step finished";

/// Runs a job's steps in table order and applies the hard/soft failure policy.
pub struct PipelineOrchestrator {
    job_repository: Arc<dyn JobRepository>,
    executors: Arc<StageExecutors>,
}

impl PipelineOrchestrator {
    pub fn new(job_repository: Arc<dyn JobRepository>, executors: Arc<StageExecutors>) -> Self {
        Self {
            job_repository,
            executors,
        }
    }

    /// Drives a pending job to a terminal state.
    ///
    /// The resolution of one step and the start of the next are persisted as
    /// a single transition, so the stored job always has a running step while
    /// it is running.
    pub async fn run(&self, job_id: JobId) -> Result<Job, OrchestratorError> {
        let job = self
            .job_repository
            .get_by_id(job_id)
            .await?
            .ok_or(OrchestratorError::JobNotFound(job_id))?;

        if job.status != JobStatus::Pending {
            return Err(OrchestratorError::AlreadyStarted {
                job_id,
                status: job.status,
            });
        }

        tracing::info!(steps = STEP_TABLE.len(), "Pipeline started");
        let job = self
            .transition(job_id, &[StepEvent::started(STEP_TABLE[0].name)])
            .await?;

        self.drive(job, 0).await
    }

    /// Settles the step a previous process left running, then carries on.
    ///
    /// A hard-fail step is failed with [`INTERRUPTED_ERROR`]. A soft-fail step
    /// takes its fallback and the remaining steps run as usual.
    pub async fn resume(&self, job_id: JobId) -> Result<Job, OrchestratorError> {
        let job = self
            .job_repository
            .get_by_id(job_id)
            .await?
            .ok_or(OrchestratorError::JobNotFound(job_id))?;

        if job.status != JobStatus::Running {
            return Err(OrchestratorError::NotInterrupted {
                job_id,
                status: job.status,
            });
        }
        let (position, step) = job
            .running_step()
            .and_then(|step| {
                STEP_TABLE
                    .iter()
                    .position(|d| d.name == step)
                    .map(|position| (position, step))
            })
            .ok_or(OrchestratorError::NoRunningStep(job_id))?;

        tracing::warn!(step = %step, "Resuming job interrupted by restart");
        let resolution = match step.failure_class() {
            FailureClass::Hard => StepEvent::failed(step, INTERRUPTED_ERROR),
            FailureClass::Soft => {
                if let Some(fallback) = self.executors.fallback_artifact(step, &job) {
                    self.job_repository.set_artifact(job_id, fallback).await?;
                }
                StepEvent::completed(step, fallback_message(step))
            }
        };
        let job = self.advance(job_id, position, resolution).await?;

        self.drive(job, position + 1).await
    }

    /// Executes steps from `from` onwards until the job is terminal.
    async fn drive(&self, mut job: Job, from: usize) -> Result<Job, OrchestratorError> {
        for (position, descriptor) in STEP_TABLE.iter().enumerate().skip(from) {
            if job.status.is_terminal() {
                break;
            }
            let resolution = self.execute_step(&job, descriptor.name).await?;
            job = self.advance(job.id, position, resolution).await?;
        }

        match job.status {
            JobStatus::Completed => tracing::info!("Pipeline completed"),
            status => tracing::warn!(status = %status, errors = ?job.errors, "Pipeline stopped"),
        }

        Ok(job)
    }

    /// Persists the resolution of the step at `position` together with the
    /// start of the next one, unless the step failed.
    async fn advance(
        &self,
        job_id: JobId,
        position: usize,
        resolution: StepEvent,
    ) -> Result<Job, OrchestratorError> {
        let failed = matches!(resolution, StepEvent::Failed { .. });
        let mut events = vec![resolution];
        if !failed {
            if let Some(next) = STEP_TABLE.get(position + 1) {
                events.push(StepEvent::started(next.name));
            }
        }
        self.transition(job_id, &events).await
    }

    /// Runs one executor and turns its result into the event that resolves the step.
    /// Artifacts are persisted before the event is returned.
    async fn execute_step(&self, job: &Job, step: StepName) -> Result<StepEvent, OrchestratorError> {
        let started = Instant::now();
        let result = AssertUnwindSafe(self.executors.execute(step, job))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(StageError::Panicked(panic_message(panic))));
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(outcome) => {
                for artifact in outcome.artifacts {
                    self.job_repository.set_artifact(job.id, artifact).await?;
                }
                tracing::info!(step = %step, elapsed_ms, message = %outcome.message, "Step completed");
                Ok(StepEvent::completed(step, outcome.message))
            }
            Err(error) => match step.failure_class() {
                FailureClass::Hard => {
                    tracing::error!(step = %step, elapsed_ms, error = %error, "Step failed; aborting job");
                    Ok(StepEvent::failed(step, error.to_string()))
                }
                FailureClass::Soft => {
                    tracing::warn!(step = %step, elapsed_ms, error = %error, "Step degraded; continuing with fallback");
                    if let Some(fallback) = self.executors.fallback_artifact(step, job) {
                        self.job_repository.set_artifact(job.id, fallback).await?;
                    }
                    Ok(StepEvent::completed(step, fallback_message(step)))
                }
            },
        }
    }

    async fn transition(&self, job_id: JobId, events: &[StepEvent]) -> Result<Job, OrchestratorError> {
        for event in events {
            tracing::debug!(step = %event.step(), event = ?event, "Step transition");
        }
        Ok(self.job_repository.apply_transition(job_id, events).await?)
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("job not found: {0}")]
    JobNotFound(JobId),
    #[error("job {job_id} is already {status}")]
    AlreadyStarted { job_id: JobId, status: JobStatus },
    #[error("job {job_id} is {status}, not interrupted")]
    NotInterrupted { job_id: JobId, status: JobStatus },
    #[error("job {0} is running without a running step")]
    NoRunningStep(JobId),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
