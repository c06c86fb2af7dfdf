use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub variant: String,
    pub url: String,
}

/// Result of one image generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImageOutcome {
    Generated {
        variant: String,
        images: Vec<GeneratedImage>,
    },
    Failed {
        variant: String,
        reason: String,
    },
    TimedOut {
        variant: String,
        after_ms: u64,
    },
}

impl ImageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ImageOutcome::Generated { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageGenerationStatus {
    Complete,
    Partial,
    Failed,
}

impl ImageGenerationStatus {
    /// All calls succeeded, some did, or none did. No calls at all counts as none.
    pub fn aggregate(outcomes: &[ImageOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        match succeeded {
            0 => ImageGenerationStatus::Failed,
            n if n == outcomes.len() => ImageGenerationStatus::Complete,
            _ => ImageGenerationStatus::Partial,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageGenerationStatus::Complete => "complete",
            ImageGenerationStatus::Partial => "partial",
            ImageGenerationStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSet {
    pub status: ImageGenerationStatus,
    pub outcomes: Vec<ImageOutcome>,
}

impl ImageSet {
    pub fn from_outcomes(outcomes: Vec<ImageOutcome>) -> Self {
        Self {
            status: ImageGenerationStatus::aggregate(&outcomes),
            outcomes,
        }
    }

    pub fn empty() -> Self {
        Self {
            status: ImageGenerationStatus::Failed,
            outcomes: Vec::new(),
        }
    }

    pub fn images(&self) -> impl Iterator<Item = &GeneratedImage> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                ImageOutcome::Generated { images, .. } => Some(images),
                _ => None,
            })
            .flatten()
    }
}
