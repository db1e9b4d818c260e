mod common;

use std::io::{self, Cursor};
use std::sync::Arc;

use anyhow::Result;
use apparchive::{
    FileImporter, ImportErrorKind, ImporterConfig, InMemoryStorage, ProjectStorage, UploadStatus,
};
use apparchive_test_utils::sample_project_archive;
use common::{importer, OWNER, OWNER_EMAIL};

const LIMIT: u64 = 64;

fn small_storage() -> Arc<InMemoryStorage> {
    Arc::new(
        InMemoryStorage::new()
            .with_user(OWNER, OWNER_EMAIL)
            .with_max_job_size(LIMIT),
    )
}

#[test]
fn file_at_limit_is_accepted_and_one_more_byte_is_not() -> Result<()> {
    let storage = small_storage();
    let importer = importer(&storage);
    // Archive imports carry no per-upload ceiling, so seeding works here.
    let id = importer
        .import_project(OWNER, "Maze", Cursor::new(sample_project_archive()?))?
        .project_id;

    let version = importer.import_file(
        OWNER,
        id,
        "assets/exact.bin",
        Cursor::new(vec![1u8; LIMIT as usize]),
    )?;
    assert_eq!(version, 1);

    let err = importer
        .import_file(
            OWNER,
            id,
            "assets/big.bin",
            Cursor::new(vec![1u8; LIMIT as usize + 1]),
        )
        .unwrap_err();
    assert_eq!(err.status(), Some(UploadStatus::FileTooLarge));
    assert_eq!(err.error_code(), "FILE_TOO_LARGE");
    assert!(storage.file_content(id, "assets/big.bin").is_none());
    assert!(!storage
        .list_source_files(OWNER, id)?
        .iter()
        .any(|path| path == "assets/big.bin"));
    Ok(())
}

#[test]
fn config_limit_applies_when_smaller_than_backend() -> Result<()> {
    let storage = common::storage();
    let id = importer(&storage)
        .import_project(OWNER, "Maze", Cursor::new(sample_project_archive()?))?
        .project_id;
    let config = ImporterConfig::from_toml_str("max_asset_size_megs = 0.5")?;
    let importer = FileImporter::new(storage.clone(), config);

    let half_meg = 512 * 1024;
    assert_eq!(importer.max_upload_bytes(), half_meg);
    let err = importer
        .import_file(OWNER, id, "assets/big.bin", io::repeat(0))
        .unwrap_err();
    assert_eq!(err.kind(), ImportErrorKind::SizeLimitExceeded);
    Ok(())
}

#[test]
fn reimporting_a_file_overwrites_it() -> Result<()> {
    let storage = common::storage();
    let importer = importer(&storage);
    let id = importer
        .import_project(OWNER, "Maze", Cursor::new(sample_project_archive()?))?
        .project_id;
    let registered = storage.list_source_files(OWNER, id)?.len();

    assert_eq!(
        importer.import_file(OWNER, id, "assets/kitty.png", Cursor::new(b"v2".to_vec()))?,
        2
    );
    assert_eq!(storage.list_source_files(OWNER, id)?.len(), registered);
    assert_eq!(storage.file_content(id, "assets/kitty.png"), Some(b"v2".to_vec()));
    Ok(())
}

#[test]
fn user_files_are_bounded_and_overwritten() -> Result<()> {
    let storage = small_storage();
    let importer = importer(&storage);

    importer.import_user_file(OWNER, "android.keystore", Cursor::new(b"first".to_vec()))?;
    importer.import_user_file(OWNER, "android.keystore", Cursor::new(b"second".to_vec()))?;
    assert_eq!(storage.list_user_files(OWNER)?, vec!["android.keystore".to_string()]);
    assert_eq!(
        storage.user_file(OWNER, "android.keystore"),
        Some(b"second".to_vec())
    );

    let err = importer
        .import_user_file(OWNER, "huge.keystore", Cursor::new(vec![0u8; LIMIT as usize + 1]))
        .unwrap_err();
    assert_eq!(err.status(), Some(UploadStatus::FileTooLarge));
    assert!(storage.user_file(OWNER, "huge.keystore").is_none());
    Ok(())
}

#[test]
fn temp_files_come_back_by_name() -> Result<()> {
    let storage = small_storage();
    let importer = importer(&storage);

    let first = importer.import_temp_file(Cursor::new(b"one".to_vec()))?;
    let second = importer.import_temp_file(Cursor::new(b"two".to_vec()))?;
    assert_ne!(first, second);
    assert_eq!(storage.temp_file(&first), Some(b"one".to_vec()));
    assert_eq!(storage.temp_file(&second), Some(b"two".to_vec()));

    let err = importer.import_temp_file(io::repeat(7)).unwrap_err();
    assert_eq!(err.kind(), ImportErrorKind::SizeLimitExceeded);
    Ok(())
}
