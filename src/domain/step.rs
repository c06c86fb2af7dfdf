use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named stage of the proposal pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    ParseStatements,
    EnrichMerchant,
    ComputeComparison,
    GenerateNarrative,
    GenerateImages,
    RenderDocument,
    Finalize,
}

/// How the orchestrator reacts when a stage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The job aborts.
    Hard,
    /// The step completes with a fallback message and the job continues.
    Soft,
}

#[derive(Debug, Clone, Copy)]
pub struct StepDescriptor {
    pub name: StepName,
    pub description: &'static str,
    pub failure_class: FailureClass,
}

/// Every job carries exactly these steps, in this order.
pub const STEP_TABLE: [StepDescriptor; 7] = [
    StepDescriptor {
        name: StepName::ParseStatements,
        description: "Parsing processing statements",
        failure_class: FailureClass::Hard,
    },
    StepDescriptor {
        name: StepName::EnrichMerchant,
        description: "Looking up merchant business details",
        failure_class: FailureClass::Soft,
    },
    StepDescriptor {
        name: StepName::ComputeComparison,
        description: "Computing pricing comparison",
        failure_class: FailureClass::Hard,
    },
    StepDescriptor {
        name: StepName::GenerateNarrative,
        description: "Writing proposal narrative",
        failure_class: FailureClass::Soft,
    },
    StepDescriptor {
        name: StepName::GenerateImages,
        description: "Generating proposal imagery",
        failure_class: FailureClass::Soft,
    },
    StepDescriptor {
        name: StepName::RenderDocument,
        description: "Rendering proposal document",
        failure_class: FailureClass::Hard,
    },
    StepDescriptor {
        name: StepName::Finalize,
        description: "Finalizing proposal",
        failure_class: FailureClass::Hard,
    },
];

impl StepName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepName::ParseStatements => "parse_statements",
            StepName::EnrichMerchant => "enrich_merchant",
            StepName::ComputeComparison => "compute_comparison",
            StepName::GenerateNarrative => "generate_narrative",
            StepName::GenerateImages => "generate_images",
            StepName::RenderDocument => "render_document",
            StepName::Finalize => "finalize",
        }
    }

    pub fn descriptor(&self) -> &'static StepDescriptor {
        &STEP_TABLE[self.position()]
    }

    /// Index of this step in [`STEP_TABLE`].
    pub fn position(&self) -> usize {
        match self {
            StepName::ParseStatements => 0,
            StepName::EnrichMerchant => 1,
            StepName::ComputeComparison => 2,
            StepName::GenerateNarrative => 3,
            StepName::GenerateImages => 4,
            StepName::RenderDocument => 5,
            StepName::Finalize => 6,
        }
    }

    pub fn failure_class(&self) -> FailureClass {
        self.descriptor().failure_class
    }

    pub fn is_hard_fail(&self) -> bool {
        self.failure_class() == FailureClass::Hard
    }

    pub fn is_last(&self) -> bool {
        self.position() == STEP_TABLE.len() - 1
    }
}

impl FromStr for StepName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STEP_TABLE
            .iter()
            .map(|d| d.name)
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("Invalid step name: {}", s))
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl StepState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepState::Pending => "pending",
            StepState::Running => "running",
            StepState::Completed => "completed",
            StepState::Failed => "failed",
        }
    }
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStatus {
    pub step: StepName,
    pub status: StepState,
    pub message: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl StepStatus {
    pub fn pending(descriptor: &StepDescriptor) -> Self {
        Self {
            step: descriptor.name,
            status: StepState::Pending,
            message: descriptor.description.to_string(),
            started_at: None,
            completed_at: None,
            error: None,
        }
    }
}
