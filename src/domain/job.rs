use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::artifacts::{ArtifactValue, ArtifactWrite, Artifacts};
use super::job_id::{JobId, OrganizationId, OwnerId};
use super::job_status::JobStatus;
use super::merchant::InputSnapshot;
use super::step::{STEP_TABLE, StepName, StepState, StepStatus};
use super::step_event::{StepEvent, TransitionError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub owner_id: OwnerId,
    pub organization_id: OrganizationId,
    pub status: JobStatus,
    pub current_step: Option<StepName>,
    pub steps: Vec<StepStatus>,
    pub input: InputSnapshot,
    pub artifacts: Artifacts,
    pub errors: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(
        id: JobId,
        input: InputSnapshot,
        owner_id: OwnerId,
        organization_id: OrganizationId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id,
            organization_id,
            status: JobStatus::Pending,
            current_step: None,
            steps: STEP_TABLE.iter().map(StepStatus::pending).collect(),
            input,
            artifacts: Artifacts::default(),
            errors: Vec::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn step(&self, name: StepName) -> Option<&StepStatus> {
        self.steps.iter().find(|s| s.step == name)
    }

    pub fn running_step(&self) -> Option<StepName> {
        self.steps
            .iter()
            .find(|s| s.status == StepState::Running)
            .map(|s| s.step)
    }

    pub fn has_failed_hard_step(&self) -> bool {
        self.steps
            .iter()
            .any(|s| s.status == StepState::Failed && s.step.is_hard_fail())
    }

    /// Returns the job as it is after `event`, leaving `self` untouched.
    pub fn apply(&self, event: &StepEvent) -> Result<Job, TransitionError> {
        let mut next = self.clone();
        next.apply_in_place(event)?;
        Ok(next)
    }

    /// Applies events in order; either all are accepted or none are.
    pub fn apply_all(&self, events: &[StepEvent]) -> Result<Job, TransitionError> {
        let mut next = self.clone();
        for event in events {
            next.apply_in_place(event)?;
        }
        Ok(next)
    }

    fn apply_in_place(&mut self, event: &StepEvent) -> Result<(), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::JobTerminal(self.status));
        }

        let step = event.step();
        let index = self
            .steps
            .iter()
            .position(|s| s.step == step)
            .ok_or(TransitionError::UnknownStep(step))?;

        match event {
            StepEvent::Started { at, .. } => {
                let state = self.steps[index].status;
                if state != StepState::Pending {
                    return Err(TransitionError::NotPending { step, state });
                }
                if let Some(running) = self.running_step() {
                    return Err(TransitionError::AnotherStepRunning { step, running });
                }
                if let Some(blocking) = self.steps[..index]
                    .iter()
                    .find(|s| s.status != StepState::Completed)
                {
                    return Err(TransitionError::OutOfOrder {
                        step,
                        blocking: blocking.step,
                    });
                }

                let status = &mut self.steps[index];
                status.status = StepState::Running;
                status.started_at = Some(*at);
                self.status = JobStatus::Running;
            }
            StepEvent::Completed { message, at, .. } => {
                let status = &mut self.steps[index];
                if status.status != StepState::Running {
                    return Err(TransitionError::NotRunning {
                        step,
                        state: status.status,
                    });
                }

                status.status = StepState::Completed;
                status.completed_at = Some(*at);
                if let Some(message) = message {
                    status.message = message.clone();
                }

                if index == self.steps.len() - 1 {
                    self.status = JobStatus::Completed;
                    self.completed_at = Some(*at);
                }
            }
            StepEvent::Failed { error, at, .. } => {
                if !step.is_hard_fail() {
                    return Err(TransitionError::SoftStepCannotFail(step));
                }
                let status = &mut self.steps[index];
                if status.status != StepState::Running {
                    return Err(TransitionError::NotRunning {
                        step,
                        state: status.status,
                    });
                }

                status.status = StepState::Failed;
                status.completed_at = Some(*at);
                status.error = Some(error.clone());
                self.status = JobStatus::Failed;
                self.errors.push(error.clone());
            }
        }

        self.current_step = Some(step);
        self.updated_at = event.at();
        Ok(())
    }

    pub fn set_artifact(&mut self, value: ArtifactValue) -> ArtifactWrite {
        let outcome = self.artifacts.set(value);
        if outcome == ArtifactWrite::Written {
            self.updated_at = Utc::now();
        }
        outcome
    }
}
