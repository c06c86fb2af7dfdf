use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    BusinessProfile, ComparisonData, GeneratedImage, MerchantProfile, Narrative, ParsedStatement,
};

/// Everything the renderer needs to lay out a proposal.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub merchant: MerchantProfile,
    pub statement: ParsedStatement,
    pub business_profile: BusinessProfile,
    pub comparison: ComparisonData,
    pub narrative: Option<Narrative>,
    pub images: Vec<GeneratedImage>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RenderedBytes {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub extension: String,
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, context: &RenderContext) -> Result<RenderedBytes, DocumentRendererError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentRendererError {
    #[error("render request failed: {0}")]
    RequestFailed(String),
    #[error("renderer returned {status}: {body}")]
    ServiceError { status: u16, body: String },
    #[error("template error: {0}")]
    Template(String),
    #[error("renderer returned an empty document")]
    EmptyDocument,
}
