//! Stage executors: one async function per pipeline step.
//!
//! Executors read the job's input snapshot and the artifacts written by
//! earlier steps, call their collaborators under explicit timeouts, and hand
//! back the artifacts they produced. They never touch the job store; the
//! orchestrator persists their results.

mod compare;
mod enrich;
mod finalize;
mod images;
mod narrative;
mod parse;
mod render;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, DocumentRenderer, EnrichmentClient, ImageGenerator,
    NarrativeGenerator, StatementParser,
};
use crate::domain::{
    ArtifactName, ArtifactValue, BusinessProfile, ImageSet, Job, Narrative, PricingTerms,
    StepName,
};

/// External services the stages depend on.
#[derive(Clone)]
pub struct Collaborators {
    pub artifact_store: Arc<dyn ArtifactStore>,
    pub statement_parser: Arc<dyn StatementParser>,
    pub enrichment_client: Arc<dyn EnrichmentClient>,
    pub narrative_generator: Arc<dyn NarrativeGenerator>,
    pub image_generator: Arc<dyn ImageGenerator>,
    pub document_renderer: Arc<dyn DocumentRenderer>,
}

#[derive(Debug, Clone, Copy)]
pub struct StageTimeouts {
    pub parse: Duration,
    pub enrichment: Duration,
    pub narrative: Duration,
    pub image: Duration,
    pub render: Duration,
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            parse: Duration::from_secs(60),
            enrichment: Duration::from_secs(10),
            narrative: Duration::from_secs(30),
            image: Duration::from_secs(30),
            render: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StageSettings {
    pub pricing: PricingTerms,
    pub image_variants: usize,
    pub timeouts: StageTimeouts,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            pricing: PricingTerms::default(),
            image_variants: 3,
            timeouts: StageTimeouts::default(),
        }
    }
}

/// What a successful stage reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome {
    pub message: String,
    pub artifacts: Vec<ArtifactValue>,
}

impl StageOutcome {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            artifacts: Vec::new(),
        }
    }

    pub fn with_artifact(mut self, artifact: ArtifactValue) -> Self {
        self.artifacts.push(artifact);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{collaborator} failed: {reason}")]
    Collaborator {
        collaborator: &'static str,
        reason: String,
    },
    #[error("{collaborator} timed out after {}ms", .after.as_millis())]
    TimedOut {
        collaborator: &'static str,
        after: Duration,
    },
    #[error("rendering failed: {0}")]
    Rendering(String),
    #[error("storage: {0}")]
    Storage(#[from] ArtifactStoreError),
    #[error("missing artifact: {0}")]
    MissingArtifact(ArtifactName),
    #[error("verification failed: {0}")]
    Verification(String),
    #[error("stage panicked: {0}")]
    Panicked(String),
}

impl StageError {
    pub fn collaborator(collaborator: &'static str, reason: impl ToString) -> Self {
        StageError::Collaborator {
            collaborator,
            reason: reason.to_string(),
        }
    }
}

pub struct StageExecutors {
    collaborators: Collaborators,
    settings: StageSettings,
}

impl StageExecutors {
    pub fn new(collaborators: Collaborators, settings: StageSettings) -> Self {
        Self {
            collaborators,
            settings,
        }
    }

    pub async fn execute(&self, step: StepName, job: &Job) -> Result<StageOutcome, StageError> {
        match step {
            StepName::ParseStatements => self.parse_statements(job).await,
            StepName::EnrichMerchant => self.enrich_merchant(job).await,
            StepName::ComputeComparison => self.compute_comparison(job),
            StepName::GenerateNarrative => self.generate_narrative(job).await,
            StepName::GenerateImages => self.generate_images(job).await,
            StepName::RenderDocument => self.render_document(job).await,
            StepName::Finalize => self.finalize(job).await,
        }
    }

    /// Default data a soft-fail step leaves behind when its collaborator fails.
    pub fn fallback_artifact(&self, step: StepName, job: &Job) -> Option<ArtifactValue> {
        match step {
            StepName::EnrichMerchant => Some(ArtifactValue::BusinessProfile(
                BusinessProfile::unavailable(),
            )),
            StepName::GenerateNarrative => Some(ArtifactValue::Narrative(Narrative::standard(
                &job.input.merchant,
                job.artifacts.comparison.as_ref(),
            ))),
            StepName::GenerateImages => Some(ArtifactValue::Images(ImageSet::empty())),
            _ => None,
        }
    }
}

/// Message recorded on a soft-fail step whose collaborator failed.
pub fn fallback_message(step: StepName) -> &'static str {
    match step {
        StepName::EnrichMerchant => "Business lookup unavailable; proceeding without enrichment",
        StepName::GenerateNarrative => "Narrative generation unavailable; using standard summary",
        StepName::GenerateImages => "Image generation unavailable; proceeding without imagery",
        _ => "Step failed",
    }
}

async fn within<T>(
    collaborator: &'static str,
    limit: Duration,
    call: impl Future<Output = T>,
) -> Result<T, StageError> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| StageError::TimedOut {
            collaborator,
            after: limit,
        })
}
