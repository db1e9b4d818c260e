#![allow(dead_code)]

use std::sync::Arc;

use apparchive::naming::{FixedToken, RenameToken};
use apparchive::{FileImporter, ImporterConfig, InMemoryStorage};

pub const OWNER: &str = "u1";
pub const OWNER_EMAIL: &str = "dana.k@example.com";
pub const SOURCE_DIR: &str = "src/appinventor/ai_dana_k/Maze";

pub fn storage() -> Arc<InMemoryStorage> {
    Arc::new(InMemoryStorage::new().with_user(OWNER, OWNER_EMAIL))
}

pub fn importer(storage: &Arc<InMemoryStorage>) -> FileImporter {
    FileImporter::new(storage.clone(), ImporterConfig::default())
}

pub fn fixed_token(raw: &str) -> Arc<FixedToken> {
    let token = RenameToken::parse(raw).expect("well-formed token");
    Arc::new(FixedToken::new(token))
}
