use serde::{Deserialize, Serialize};

use super::storage_path::StoragePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Csv,
    Pdf,
}

impl ContentType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(Self::Pdf),
            "text/csv" => Some(Self::Csv),
            "text/plain" => Some(Self::Text),
            _ => None,
        }
    }

    /// Falls back to the file extension when the client sends a generic mime type.
    pub fn detect(mime: Option<&str>, filename: &str) -> Option<Self> {
        if let Some(ct) = mime.and_then(Self::from_mime) {
            return Some(ct);
        }
        let extension = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "csv" => Some(Self::Csv),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Csv => "text/csv",
            Self::Text => "text/plain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantProfile {
    pub business_name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub contact_name: Option<String>,
}

/// An uploaded statement staged in the artifact store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub filename: String,
    pub content_type: ContentType,
    pub size_bytes: u64,
    pub storage_path: StoragePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalOptions {
    pub include_narrative: bool,
    pub include_images: bool,
}

impl Default for ProposalOptions {
    fn default() -> Self {
        Self {
            include_narrative: true,
            include_images: true,
        }
    }
}

/// Caller-supplied metadata captured when the job is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub merchant: MerchantProfile,
    pub documents: Vec<SourceDocument>,
    pub options: ProposalOptions,
}
