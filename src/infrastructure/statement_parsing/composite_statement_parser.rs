use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{StatementParser, StatementParserError};
use crate::domain::{ContentType, ParsedStatement, SourceDocument};

/// Routes each document to the parser registered for its content type.
pub struct CompositeStatementParser {
    parsers: HashMap<ContentType, Arc<dyn StatementParser>>,
}

impl CompositeStatementParser {
    pub fn new(parsers: Vec<(ContentType, Arc<dyn StatementParser>)>) -> Self {
        Self {
            parsers: parsers.into_iter().collect(),
        }
    }
}

#[async_trait]
impl StatementParser for CompositeStatementParser {
    async fn parse(
        &self,
        data: &[u8],
        document: &SourceDocument,
    ) -> Result<ParsedStatement, StatementParserError> {
        let parser = self.parsers.get(&document.content_type).ok_or_else(|| {
            StatementParserError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            )
        })?;

        parser.parse(data, document).await
    }
}
