#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use proposal_pipeline::application::ports::{
    ArtifactStore, DocumentRenderer, DocumentRendererError, EnrichmentClient, EnrichmentError,
    ImageGenerator, ImageGeneratorError, JobRepository, NarrativeGenerator,
    NarrativeGeneratorError, RenderContext, RenderedBytes, RepositoryError,
};
use proposal_pipeline::application::services::{
    Collaborators, CreateJobRequest, JobService, PipelineMessage, PipelineOrchestrator,
    StageExecutors, StageSettings, StageTimeouts, UploadedDocument,
};
use proposal_pipeline::domain::{
    ArtifactValue, BusinessProfile, ContentType, Job, JobId, JobStatus, MerchantProfile,
    OrganizationId, OwnerId, ProfileSource, ProposalOptions, StepEvent,
};
use proposal_pipeline::infrastructure::persistence::InMemoryJobRepository;
use proposal_pipeline::infrastructure::statement_parsing::TextStatementParser;
use proposal_pipeline::infrastructure::storage::ObjectArtifactStore;

pub const STATEMENT_TEXT: &str = "Processor: Acme Merchant Services\n\
Statement Period: March 2025\n\
Total Volume: $25,000.00\n\
Total Transactions: 500\n\
Total Fees: $750.00\n\
Visa: $15,000.00\n\
Mastercard: $10,000.00\n";

pub const UNPARSEABLE_TEXT: &str = "Thank you for your business!\nPlease call us with questions.\n";

pub const RENDERED_BYTES: &[u8] = b"%PDF-1.7 fake proposal";

const SHORT_TIMEOUT: Duration = Duration::from_millis(200);
const STALL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, PartialEq)]
pub enum Behavior {
    Succeed,
    Fail,
    Stall,
}

pub struct FakeEnrichment(pub Behavior);

#[async_trait]
impl EnrichmentClient for FakeEnrichment {
    async fn lookup(&self, website: &str) -> Result<BusinessProfile, EnrichmentError> {
        match self.0 {
            Behavior::Succeed => Ok(BusinessProfile {
                title: Some("Corner Bakery | Fresh bread daily".to_string()),
                description: Some("Neighborhood bakery since 1998".to_string()),
                site_name: Some("Corner Bakery".to_string()),
                source: ProfileSource::Website,
            }),
            Behavior::Fail => Err(EnrichmentError::RequestFailed(format!("{website} refused"))),
            Behavior::Stall => {
                tokio::time::sleep(STALL).await;
                Err(EnrichmentError::NothingFound(website.to_string()))
            }
        }
    }
}

pub struct FakeNarrative(pub Behavior);

#[async_trait]
impl NarrativeGenerator for FakeNarrative {
    async fn generate(&self, _prompt: &str, context: &str) -> Result<String, NarrativeGeneratorError> {
        match self.0 {
            Behavior::Succeed => Ok(format!("A tailored summary.\n\n{}", context.lines().next().unwrap_or_default())),
            Behavior::Fail => Err(NarrativeGeneratorError::RateLimited),
            Behavior::Stall => {
                tokio::time::sleep(STALL).await;
                Ok("too late".to_string())
            }
        }
    }
}

/// Fails any prompt containing one of `failing_variants`.
pub struct FakeImages {
    pub behavior: Behavior,
    pub failing_variants: Vec<&'static str>,
}

impl FakeImages {
    pub fn succeeding() -> Self {
        Self {
            behavior: Behavior::Succeed,
            failing_variants: Vec::new(),
        }
    }

    pub fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            failing_variants: Vec::new(),
        }
    }
}

#[async_trait]
impl ImageGenerator for FakeImages {
    async fn generate(&self, prompt: &str) -> Result<Vec<String>, ImageGeneratorError> {
        if self
            .failing_variants
            .iter()
            .any(|v| prompt.to_lowercase().contains(v))
        {
            return Err(ImageGeneratorError::Rejected("policy".to_string()));
        }
        match self.behavior {
            Behavior::Succeed => Ok(vec![format!(
                "https://images.test/{}.png",
                prompt.len()
            )]),
            Behavior::Fail => Err(ImageGeneratorError::ApiRequestFailed("HTTP 500".to_string())),
            Behavior::Stall => {
                tokio::time::sleep(STALL).await;
                Ok(Vec::new())
            }
        }
    }
}

pub struct FakeRenderer(pub Behavior);

#[async_trait]
impl DocumentRenderer for FakeRenderer {
    async fn render(&self, _context: &RenderContext) -> Result<RenderedBytes, DocumentRendererError> {
        match self.0 {
            Behavior::Succeed => Ok(RenderedBytes {
                bytes: RENDERED_BYTES.to_vec(),
                content_type: "application/pdf".to_string(),
                extension: "pdf".to_string(),
            }),
            Behavior::Fail => Err(DocumentRendererError::ServiceError {
                status: 502,
                body: "renderer down".to_string(),
            }),
            Behavior::Stall => {
                tokio::time::sleep(STALL).await;
                Err(DocumentRendererError::EmptyDocument)
            }
        }
    }
}

/// Wraps the in-memory store and keeps a snapshot of every persisted job state.
#[derive(Default)]
pub struct RecordingJobRepository {
    inner: InMemoryJobRepository,
    history: Mutex<Vec<Job>>,
}

impl RecordingJobRepository {
    pub fn history(&self) -> Vec<Job> {
        self.history.lock().unwrap().clone()
    }

    fn record(&self, job: &Job) {
        self.history.lock().unwrap().push(job.clone());
    }
}

#[async_trait]
impl JobRepository for RecordingJobRepository {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        self.inner.create(job).await?;
        self.record(job);
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        self.inner.get_by_id(id).await
    }

    async fn apply_transition(&self, id: JobId, events: &[StepEvent]) -> Result<Job, RepositoryError> {
        let job = self.inner.apply_transition(id, events).await?;
        self.record(&job);
        Ok(job)
    }

    async fn set_artifact(&self, id: JobId, value: ArtifactValue) -> Result<Job, RepositoryError> {
        let job = self.inner.set_artifact(id, value).await?;
        self.record(&job);
        Ok(job)
    }

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError> {
        self.inner.list_by_status(status).await
    }
}

pub struct Fakes {
    pub enrichment: Behavior,
    pub narrative: Behavior,
    pub images: FakeImages,
    pub renderer: Behavior,
}

impl Default for Fakes {
    fn default() -> Self {
        Self {
            enrichment: Behavior::Succeed,
            narrative: Behavior::Succeed,
            images: FakeImages::succeeding(),
            renderer: Behavior::Succeed,
        }
    }
}

/// A wired pipeline backed by in-memory stores and fake collaborators.
pub struct TestPipeline {
    pub repository: Arc<RecordingJobRepository>,
    pub store: Arc<ObjectArtifactStore>,
    pub orchestrator: PipelineOrchestrator,
    pub job_service: Arc<JobService>,
    pub receiver: mpsc::Receiver<PipelineMessage>,
}

impl TestPipeline {
    pub fn new(fakes: Fakes) -> Self {
        let repository = Arc::new(RecordingJobRepository::default());
        let store = Arc::new(ObjectArtifactStore::in_memory());

        let collaborators = Collaborators {
            artifact_store: store.clone(),
            statement_parser: Arc::new(TextStatementParser),
            enrichment_client: Arc::new(FakeEnrichment(fakes.enrichment)),
            narrative_generator: Arc::new(FakeNarrative(fakes.narrative)),
            image_generator: Arc::new(fakes.images),
            document_renderer: Arc::new(FakeRenderer(fakes.renderer)),
        };
        let settings = StageSettings {
            timeouts: StageTimeouts {
                parse: SHORT_TIMEOUT,
                enrichment: SHORT_TIMEOUT,
                narrative: SHORT_TIMEOUT,
                image: SHORT_TIMEOUT,
                render: SHORT_TIMEOUT,
            },
            ..StageSettings::default()
        };
        let executors = Arc::new(StageExecutors::new(collaborators, settings));
        let orchestrator = PipelineOrchestrator::new(repository.clone(), executors);

        let (sender, receiver) = mpsc::channel(16);
        let job_service = Arc::new(JobService::new(repository.clone(), store.clone(), sender));

        Self {
            repository,
            store,
            orchestrator,
            job_service,
            receiver,
        }
    }

    pub async fn submit(&self, statement: &str, options: ProposalOptions) -> JobId {
        self.job_service
            .create_job(create_request(statement, options))
            .await
            .expect("job creation should succeed")
    }

    pub async fn run(&self, statement: &str, options: ProposalOptions) -> Job {
        let job_id = self.submit(statement, options).await;
        self.orchestrator
            .run(job_id)
            .await
            .expect("pipeline run should reach a terminal state")
    }
}

pub fn merchant() -> MerchantProfile {
    MerchantProfile {
        business_name: "Corner Bakery".to_string(),
        website: Some("cornerbakery.example".to_string()),
        industry: Some("Food & Beverage".to_string()),
        contact_name: Some("Sam Rivera".to_string()),
    }
}

pub fn create_request(statement: &str, options: ProposalOptions) -> CreateJobRequest {
    CreateJobRequest {
        owner_id: OwnerId::new("user-1"),
        organization_id: OrganizationId::new("org-1"),
        merchant: merchant(),
        options,
        documents: vec![UploadedDocument {
            filename: "march.txt".to_string(),
            content_type: ContentType::Text,
            data: Bytes::from(statement.to_string()),
        }],
    }
}

