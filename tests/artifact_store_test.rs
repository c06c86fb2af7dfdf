use bytes::Bytes;

use proposal_pipeline::application::ports::{ArtifactStore, ArtifactStoreError};
use proposal_pipeline::domain::{JobId, StoragePath};
use proposal_pipeline::infrastructure::storage::{ArtifactStoreFactory, ObjectArtifactStore};
use proposal_pipeline::presentation::config::{StorageProviderSetting, StorageSettings};

fn create_local_store() -> (tempfile::TempDir, ObjectArtifactStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = ObjectArtifactStore::local(dir.path().join("artifacts")).unwrap();
    (dir, store)
}

#[tokio::test]
async fn given_bytes_when_putting_to_local_store_then_file_is_persisted() {
    let (dir, store) = create_local_store();
    let job_id = JobId::new();
    let path = StoragePath::input(&job_id, 0, "march.txt");

    let size = store.put(&path, Bytes::from("hello world")).await.unwrap();

    assert_eq!(size, 11);
    let on_disk = dir.path().join("artifacts").join(path.as_str());
    assert_eq!(std::fs::read(on_disk).unwrap(), b"hello world");
}

#[tokio::test]
async fn given_stored_object_when_fetching_then_bytes_match_original() {
    let (_dir, store) = create_local_store();
    let path = StoragePath::document(&JobId::new(), "pdf");

    store.put(&path, Bytes::from_static(b"%PDF")).await.unwrap();

    assert_eq!(store.fetch(&path).await.unwrap(), b"%PDF");
    assert_eq!(store.head(&path).await.unwrap(), 4);
}

#[tokio::test]
async fn given_deleted_object_when_fetching_then_not_found() {
    let store = ObjectArtifactStore::in_memory();
    let path = StoragePath::document(&JobId::new(), "html");
    store.put(&path, Bytes::from("<html>")).await.unwrap();

    store.delete(&path).await.unwrap();

    assert!(matches!(
        store.fetch(&path).await,
        Err(ArtifactStoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn given_missing_object_when_heading_then_not_found() {
    let store = ObjectArtifactStore::in_memory();

    let result = store.head(&StoragePath::from_raw("jobs/missing/proposal.pdf")).await;

    assert!(matches!(result, Err(ArtifactStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_azure_provider_without_credentials_when_creating_then_configuration_error() {
    let settings = StorageSettings {
        provider: StorageProviderSetting::Azure,
        ..StorageSettings::default()
    };

    let result = ArtifactStoreFactory::create(&settings);

    assert!(matches!(result, Err(ArtifactStoreError::Configuration(_))));
}

#[test]
fn given_filename_with_separators_when_building_input_path_then_sanitized() {
    let job_id = JobId::new();

    let path = StoragePath::input(&job_id, 2, "../etc/passwd");

    assert_eq!(
        path.as_str(),
        format!("jobs/{}/inputs/2-.._etc_passwd", job_id.as_uuid())
    );
}
