use chrono::{DateTime, Utc};

use super::job_status::JobStatus;
use super::step::{StepName, StepState};

/// A single change to one step of a job.
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    Started {
        step: StepName,
        at: DateTime<Utc>,
    },
    Completed {
        step: StepName,
        message: Option<String>,
        at: DateTime<Utc>,
    },
    Failed {
        step: StepName,
        error: String,
        at: DateTime<Utc>,
    },
}

impl StepEvent {
    pub fn started(step: StepName) -> Self {
        StepEvent::Started {
            step,
            at: Utc::now(),
        }
    }

    pub fn completed(step: StepName, message: impl Into<String>) -> Self {
        StepEvent::Completed {
            step,
            message: Some(message.into()),
            at: Utc::now(),
        }
    }

    pub fn failed(step: StepName, error: impl Into<String>) -> Self {
        StepEvent::Failed {
            step,
            error: error.into(),
            at: Utc::now(),
        }
    }

    pub fn step(&self) -> StepName {
        match self {
            StepEvent::Started { step, .. }
            | StepEvent::Completed { step, .. }
            | StepEvent::Failed { step, .. } => *step,
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            StepEvent::Started { at, .. }
            | StepEvent::Completed { at, .. }
            | StepEvent::Failed { at, .. } => *at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("job is already {0}")]
    JobTerminal(JobStatus),
    #[error("step {0} is not part of this job")]
    UnknownStep(StepName),
    #[error("step {step} cannot start from {state}")]
    NotPending { step: StepName, state: StepState },
    #[error("step {step} cannot resolve from {state}")]
    NotRunning { step: StepName, state: StepState },
    #[error("step {step} cannot start while {running} is running")]
    AnotherStepRunning { step: StepName, running: StepName },
    #[error("step {step} cannot start before {blocking} completes")]
    OutOfOrder { step: StepName, blocking: StepName },
    #[error("step {0} is soft-fail and cannot be marked failed")]
    SoftStepCannotFail(StepName),
}
