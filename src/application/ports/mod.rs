mod artifact_store;
mod document_renderer;
mod enrichment_client;
mod image_generator;
mod job_repository;
mod narrative_generator;
mod repository_error;
mod statement_parser;

pub use artifact_store::{ArtifactStore, ArtifactStoreError};
pub use document_renderer::{DocumentRenderer, DocumentRendererError, RenderContext, RenderedBytes};
pub use enrichment_client::{EnrichmentClient, EnrichmentError};
pub use image_generator::{ImageGenerator, ImageGeneratorError};
pub use job_repository::JobRepository;
pub use narrative_generator::{NarrativeGenerator, NarrativeGeneratorError};
pub use repository_error::RepositoryError;
pub use statement_parser::{StatementParser, StatementParserError};
