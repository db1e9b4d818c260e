mod common;

use std::io::Cursor;

use anyhow::Result;
use apparchive::naming::RenameToken;
use apparchive::screen::BoundaryAwareRewrite;
use apparchive::{ImportErrorKind, ProjectId, ProjectStorage};
use apparchive_test_utils::{sample_project_archive, sample_screen_archive, ArchiveBuilder};
use common::{fixed_token, importer, storage, OWNER};

const PARENT_DIR: &str = "src/appinventor/ai_dana_k";

fn seeded(storage: &std::sync::Arc<apparchive::InMemoryStorage>) -> Result<ProjectId> {
    let project =
        importer(storage).import_project(OWNER, "Maze", Cursor::new(sample_project_archive()?))?;
    Ok(project.project_id)
}

fn text(storage: &apparchive::InMemoryStorage, id: ProjectId, path: &str) -> Option<String> {
    storage
        .file_content(id, path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

#[test]
fn screen_files_are_renamed_and_rewritten() -> Result<()> {
    let storage = storage();
    let id = seeded(&storage)?;
    let importer = importer(&storage).with_token_source(fixed_token("AB12C3"));

    let imported =
        importer.import_project_screen(OWNER, id, "Maze", Cursor::new(sample_screen_archive()?))?;

    assert_eq!(imported.screen_name, "ScreenAB12C3");
    assert_eq!(imported.project.project_id, id);
    assert_eq!(
        imported.files,
        vec![
            format!("{}/ScreenAB12C3.scm", PARENT_DIR),
            format!("{}/ScreenAB12C3.bky", PARENT_DIR),
            format!("{}/ScreenAB12C3.yail", PARENT_DIR),
        ]
    );

    assert_eq!(
        text(&storage, id, &format!("{}/ScreenAB12C3.scm", PARENT_DIR)).as_deref(),
        Some("{\"$Name\":\"ScreenAB12C3\",\"Title\":\"ScreenAB12C3\"}")
    );
    assert_eq!(
        text(&storage, id, &format!("{}/ScreenAB12C3.yail", PARENT_DIR)).as_deref(),
        Some("(define-form appinventor.ai_alice.HelloPurr.ScreenAB12C3 ScreenAB12C3)")
    );
    Ok(())
}

#[test]
fn every_occurrence_of_the_old_name_is_replaced() -> Result<()> {
    let storage = storage();
    let id = seeded(&storage)?;
    let archive = ArchiveBuilder::new()
        .file("src/appinventor/ai_x/P/Screen1.scm", "Screen1 says Screen1 twice, Screen1!")
        .build()?;

    let imported = importer(&storage)
        .with_token_source(fixed_token("AB12C3"))
        .import_project_screen(OWNER, id, "Maze", Cursor::new(archive))?;

    let path = &imported.files[0];
    assert!(path.ends_with("/ScreenAB12C3.scm"));
    let content = text(&storage, id, path).expect("screen stored");
    assert_eq!(content, "ScreenAB12C3 says ScreenAB12C3 twice, ScreenAB12C3!");
    assert!(!content.contains("Screen1"));
    Ok(())
}

#[test]
fn screen_import_skips_everything_but_screen_sources() -> Result<()> {
    let storage = storage();
    let id = seeded(&storage)?;
    let before = storage.list_source_files(OWNER, id)?.len();

    let imported = importer(&storage)
        .with_token_source(fixed_token("ZZZZZZ"))
        .import_project_screen(OWNER, id, "Maze", Cursor::new(sample_screen_archive()?))?;

    assert_eq!(imported.files.len(), 3);
    assert_eq!(storage.list_source_files(OWNER, id)?.len(), before + 3);
    assert_eq!(
        storage.file_content(id, "assets/kitty.png"),
        Some(b"\x89PNG\x00\x01\x02\x03".to_vec())
    );
    Ok(())
}

#[test]
fn screen_import_does_not_need_a_manifest() -> Result<()> {
    let storage = storage();
    let id = seeded(&storage)?;
    let archive = ArchiveBuilder::new()
        .file("src/x/Screen3.scm", "Screen3")
        .build()?;

    let imported = importer(&storage)
        .with_token_source(fixed_token("000000"))
        .import_project_screen(OWNER, id, "Maze", Cursor::new(archive))?;
    assert_eq!(imported.files, vec![format!("{}/Screen000000.scm", PARENT_DIR)]);
    Ok(())
}

#[test]
fn reimporting_a_screen_overwrites_in_place() -> Result<()> {
    let storage = storage();
    let id = seeded(&storage)?;
    let importer = importer(&storage).with_token_source(fixed_token("AB12C3"));

    importer.import_project_screen(OWNER, id, "Maze", Cursor::new(sample_screen_archive()?))?;
    let registered = storage.list_source_files(OWNER, id)?.len();

    let second = ArchiveBuilder::new()
        .file("src/p/Screen1.scm", "second Screen1")
        .build()?;
    importer.import_project_screen(OWNER, id, "Maze", Cursor::new(second))?;

    assert_eq!(storage.list_source_files(OWNER, id)?.len(), registered);
    assert_eq!(
        text(&storage, id, &format!("{}/ScreenAB12C3.scm", PARENT_DIR)).as_deref(),
        Some("second ScreenAB12C3")
    );
    Ok(())
}

#[test]
fn failed_write_keeps_earlier_screen_files() -> Result<()> {
    let storage = storage();
    let id = seeded(&storage)?;
    storage.fail_writes_after(1);

    let err = importer(&storage)
        .with_token_source(fixed_token("AB12C3"))
        .import_project_screen(OWNER, id, "Maze", Cursor::new(sample_screen_archive()?))
        .unwrap_err();

    assert_eq!(err.kind(), ImportErrorKind::Storage);
    assert!(storage
        .file_content(id, &format!("{}/ScreenAB12C3.scm", PARENT_DIR))
        .is_some());
    assert!(storage
        .file_content(id, &format!("{}/ScreenAB12C3.bky", PARENT_DIR))
        .is_none());
    Ok(())
}

#[test]
fn boundary_aware_rewrite_can_be_injected() -> Result<()> {
    let storage = storage();
    let id = seeded(&storage)?;
    let archive = ArchiveBuilder::new()
        .file("src/p/Screen1.scm", "Screen1 Screen10")
        .build()?;

    importer(&storage)
        .with_token_source(fixed_token("AB12C3"))
        .with_rewriter(std::sync::Arc::new(BoundaryAwareRewrite))
        .import_project_screen(OWNER, id, "Maze", Cursor::new(archive))?;

    assert_eq!(
        text(&storage, id, &format!("{}/ScreenAB12C3.scm", PARENT_DIR)).as_deref(),
        Some("ScreenAB12C3 Screen10")
    );
    Ok(())
}

#[test]
fn generated_screen_names_are_well_formed() -> Result<()> {
    let storage = storage();
    let id = seeded(&storage)?;

    let imported = importer(&storage).import_project_screen(
        OWNER,
        id,
        "Maze",
        Cursor::new(sample_screen_archive()?),
    )?;

    let token = imported
        .screen_name
        .strip_prefix("Screen")
        .expect("screen prefix");
    assert!(RenameToken::parse(token).is_some());
    Ok(())
}

#[test]
fn screen_import_into_unknown_project_fails() -> Result<()> {
    let storage = storage();
    let err = importer(&storage)
        .import_project_screen(OWNER, 42, "Maze", Cursor::new(sample_screen_archive()?))
        .unwrap_err();
    assert_eq!(err.kind(), ImportErrorKind::Storage);
    Ok(())
}
