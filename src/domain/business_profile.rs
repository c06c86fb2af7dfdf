use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Website,
    Unavailable,
}

/// Best-effort public details about the merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub title: Option<String>,
    pub description: Option<String>,
    pub site_name: Option<String>,
    pub source: ProfileSource,
}

impl BusinessProfile {
    pub fn unavailable() -> Self {
        Self {
            title: None,
            description: None,
            site_name: None,
            source: ProfileSource::Unavailable,
        }
    }

    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.site_name
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(fallback)
    }
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self::unavailable()
    }
}
