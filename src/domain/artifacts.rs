use std::fmt;

use serde::{Deserialize, Serialize};

use super::business_profile::BusinessProfile;
use super::comparison::ComparisonData;
use super::images::ImageSet;
use super::narrative::Narrative;
use super::statement::ParsedStatement;
use super::storage_path::StoragePath;

/// Reference to the rendered proposal in the artifact store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub storage_path: StoragePath,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactName {
    Statement,
    BusinessProfile,
    Comparison,
    Narrative,
    Images,
    RenderedDocument,
}

impl ArtifactName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactName::Statement => "statement",
            ArtifactName::BusinessProfile => "business_profile",
            ArtifactName::Comparison => "comparison",
            ArtifactName::Narrative => "narrative",
            ArtifactName::Images => "images",
            ArtifactName::RenderedDocument => "rendered_document",
        }
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactValue {
    Statement(ParsedStatement),
    BusinessProfile(BusinessProfile),
    Comparison(ComparisonData),
    Narrative(Narrative),
    Images(ImageSet),
    RenderedDocument(RenderedDocument),
}

impl ArtifactValue {
    pub fn name(&self) -> ArtifactName {
        match self {
            ArtifactValue::Statement(_) => ArtifactName::Statement,
            ArtifactValue::BusinessProfile(_) => ArtifactName::BusinessProfile,
            ArtifactValue::Comparison(_) => ArtifactName::Comparison,
            ArtifactValue::Narrative(_) => ArtifactName::Narrative,
            ArtifactValue::Images(_) => ArtifactName::Images,
            ArtifactValue::RenderedDocument(_) => ArtifactName::RenderedDocument,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactWrite {
    Written,
    AlreadySet,
}

/// Data accumulated by the pipeline. Each field is written at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artifacts {
    pub statement: Option<ParsedStatement>,
    pub business_profile: Option<BusinessProfile>,
    pub comparison: Option<ComparisonData>,
    pub narrative: Option<Narrative>,
    pub images: Option<ImageSet>,
    pub rendered_document: Option<RenderedDocument>,
}

impl Artifacts {
    pub fn is_set(&self, name: ArtifactName) -> bool {
        match name {
            ArtifactName::Statement => self.statement.is_some(),
            ArtifactName::BusinessProfile => self.business_profile.is_some(),
            ArtifactName::Comparison => self.comparison.is_some(),
            ArtifactName::Narrative => self.narrative.is_some(),
            ArtifactName::Images => self.images.is_some(),
            ArtifactName::RenderedDocument => self.rendered_document.is_some(),
        }
    }

    /// Writes the field if it is still empty. An existing value is kept.
    pub fn set(&mut self, value: ArtifactValue) -> ArtifactWrite {
        if self.is_set(value.name()) {
            return ArtifactWrite::AlreadySet;
        }
        match value {
            ArtifactValue::Statement(v) => self.statement = Some(v),
            ArtifactValue::BusinessProfile(v) => self.business_profile = Some(v),
            ArtifactValue::Comparison(v) => self.comparison = Some(v),
            ArtifactValue::Narrative(v) => self.narrative = Some(v),
            ArtifactValue::Images(v) => self.images = Some(v),
            ArtifactValue::RenderedDocument(v) => self.rendered_document = Some(v),
        }
        ArtifactWrite::Written
    }
}
