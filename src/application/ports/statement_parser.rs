use async_trait::async_trait;

use crate::domain::{ParsedStatement, SourceDocument};

#[async_trait]
pub trait StatementParser: Send + Sync {
    async fn parse(
        &self,
        data: &[u8],
        document: &SourceDocument,
    ) -> Result<ParsedStatement, StatementParserError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StatementParserError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("no pricing data found in {0}")]
    NoPricingData(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
    #[error("figures in {0} are out of range")]
    OutOfRange(String),
}
