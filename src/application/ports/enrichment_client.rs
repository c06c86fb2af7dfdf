use async_trait::async_trait;

use crate::domain::BusinessProfile;

/// Looks up public business details for a merchant website.
#[async_trait]
pub trait EnrichmentClient: Send + Sync {
    async fn lookup(&self, website: &str) -> Result<BusinessProfile, EnrichmentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("invalid website: {0}")]
    InvalidWebsite(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("no business details found at {0}")]
    NothingFound(String),
}
