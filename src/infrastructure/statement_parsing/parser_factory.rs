use std::sync::Arc;

use crate::application::ports::StatementParser;
use crate::domain::ContentType;
use crate::presentation::config::StatementParsingSettings;

use super::composite_statement_parser::CompositeStatementParser;
use super::doc_intel_statement_parser::DocIntelStatementParser;
use super::text_statement_parser::TextStatementParser;

pub struct StatementParserFactory;

impl StatementParserFactory {
    pub fn create(settings: &StatementParsingSettings) -> Arc<dyn StatementParser> {
        let text: Arc<dyn StatementParser> = Arc::new(TextStatementParser);
        let mut parsers = vec![
            (ContentType::Text, Arc::clone(&text)),
            (ContentType::Csv, text),
        ];

        match (
            settings.doc_intel_endpoint.as_deref(),
            settings.doc_intel_key.as_deref(),
        ) {
            (Some(endpoint), Some(key)) => {
                tracing::info!(endpoint, "Loading Document Intelligence statement parser");
                parsers.push((
                    ContentType::Pdf,
                    Arc::new(DocIntelStatementParser::new(endpoint, key)),
                ));
            }
            _ => {
                tracing::warn!("Document Intelligence not configured; PDF statements will be rejected");
            }
        }

        Arc::new(CompositeStatementParser::new(parsers))
    }
}
