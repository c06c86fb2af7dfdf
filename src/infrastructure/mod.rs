pub mod enrichment;
pub mod llm;
pub mod observability;
pub mod persistence;
pub mod rendering;
pub mod statement_parsing;
pub mod storage;
