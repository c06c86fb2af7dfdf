use async_trait::async_trait;

#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, context: &str)
    -> Result<String, NarrativeGeneratorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NarrativeGeneratorError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
