mod composite_statement_parser;
mod doc_intel_statement_parser;
mod parser_factory;
mod text_statement_parser;

pub use composite_statement_parser::CompositeStatementParser;
pub use doc_intel_statement_parser::DocIntelStatementParser;
pub use parser_factory::StatementParserFactory;
pub use text_statement_parser::{TextStatementParser, parse_statement_text};
