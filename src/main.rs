use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use proposal_pipeline::application::ports::JobRepository;
use proposal_pipeline::application::services::{
    Collaborators, JobService, PipelineOrchestrator, PipelineWorker, StageExecutors,
    recover_unfinished_jobs,
};
use proposal_pipeline::infrastructure::enrichment::WebsiteEnrichmentClient;
use proposal_pipeline::infrastructure::llm::GeneratorFactory;
use proposal_pipeline::infrastructure::observability::{TracingConfig, init_tracing};
use proposal_pipeline::infrastructure::persistence::{
    InMemoryJobRepository, PgJobRepository, create_pool, run_migrations,
};
use proposal_pipeline::infrastructure::rendering::RendererFactory;
use proposal_pipeline::infrastructure::statement_parsing::StatementParserFactory;
use proposal_pipeline::infrastructure::storage::ArtifactStoreFactory;
use proposal_pipeline::presentation::config::{DatabaseProvider, DatabaseSettings};
use proposal_pipeline::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env()?;

    let settings = Settings::load(environment).context("Failed to load configuration")?;
    init_tracing(&TracingConfig::from_settings(environment, &settings.logging));

    let job_repository = build_job_repository(&settings.database).await?;
    let artifact_store = ArtifactStoreFactory::create(&settings.storage)
        .context("Failed to initialize artifact store")?;

    let (narrative_generator, image_generator) =
        GeneratorFactory::create(&settings.collaborators.openai);
    let collaborators = Collaborators {
        artifact_store: Arc::clone(&artifact_store),
        statement_parser: StatementParserFactory::create(
            &settings.collaborators.statement_parsing,
        ),
        enrichment_client: Arc::new(WebsiteEnrichmentClient::new(
            &settings.collaborators.enrichment.user_agent,
        )),
        narrative_generator,
        image_generator,
        document_renderer: RendererFactory::create(&settings.collaborators.renderer)?,
    };

    let executors = Arc::new(StageExecutors::new(
        collaborators,
        settings.pipeline.stage_settings(),
    ));
    let orchestrator = Arc::new(PipelineOrchestrator::new(
        Arc::clone(&job_repository),
        executors,
    ));

    let (sender, receiver) = mpsc::channel(settings.pipeline.queue_capacity.max(1));
    let worker = PipelineWorker::new(
        receiver,
        orchestrator,
        settings.pipeline.max_concurrent_jobs,
    );
    tokio::spawn(worker.run());

    recover_unfinished_jobs(job_repository.as_ref(), &sender)
        .await
        .context("Failed to recover unfinished jobs")?;

    let job_service = Arc::new(JobService::new(
        Arc::clone(&job_repository),
        artifact_store,
        sender,
    ));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let router = create_router(AppState {
        job_service,
        settings,
    });

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, environment = %environment, "Listening");

    axum::serve(listener, router).await?;

    Ok(())
}

async fn build_job_repository(
    settings: &DatabaseSettings,
) -> anyhow::Result<Arc<dyn JobRepository>> {
    match settings.provider {
        DatabaseProvider::Memory => {
            tracing::warn!("Using in-memory job repository; jobs are lost on restart");
            Ok(Arc::new(InMemoryJobRepository::new()))
        }
        DatabaseProvider::Postgres => {
            let url = settings
                .url
                .as_deref()
                .context("database.url is required for the postgres provider")?;
            let pool = create_pool(url, settings.max_connections).await?;
            tracing::info!("Running database migrations");
            run_migrations(&pool).await?;
            Ok(Arc::new(PgJobRepository::new(pool)))
        }
    }
}
