use std::fmt;

use serde::{Deserialize, Serialize};

use super::job_id::JobId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoragePath(String);

impl StoragePath {
    /// Location of an uploaded statement, prefixed by its upload position so
    /// duplicate filenames do not collide.
    pub fn input(job_id: &JobId, index: usize, filename: &str) -> Self {
        Self(format!(
            "jobs/{}/inputs/{}-{}",
            job_id.as_uuid(),
            index,
            sanitize_segment(filename)
        ))
    }

    pub fn document(job_id: &JobId, extension: &str) -> Self {
        Self(format!("jobs/{}/proposal.{}", job_id.as_uuid(), extension))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn sanitize_segment(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    if cleaned.trim().is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
