use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::object_artifact_store::ObjectArtifactStore;

pub struct ArtifactStoreFactory;

impl ArtifactStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn ArtifactStore>, ArtifactStoreError> {
        match settings.provider {
            StorageProviderSetting::Memory => {
                tracing::warn!("Using in-memory artifact store; documents are lost on restart");
                Ok(Arc::new(ObjectArtifactStore::in_memory()))
            }
            StorageProviderSetting::Local => {
                let path = PathBuf::from(&settings.local_path);
                tracing::info!(path = %path.display(), "Using local artifact store");
                Ok(Arc::new(ObjectArtifactStore::local(path)?))
            }
            StorageProviderSetting::Azure => {
                let account = settings.azure_account.as_deref().ok_or_else(|| {
                    ArtifactStoreError::Configuration("azure_account required".into())
                })?;
                let key = settings.azure_access_key.as_deref().ok_or_else(|| {
                    ArtifactStoreError::Configuration("azure_access_key required".into())
                })?;
                let container = settings.azure_container.as_deref().ok_or_else(|| {
                    ArtifactStoreError::Configuration("azure_container required".into())
                })?;
                tracing::info!(account, container, "Using Azure blob artifact store");
                Ok(Arc::new(ObjectArtifactStore::azure(account, key, container)?))
            }
        }
    }
}
