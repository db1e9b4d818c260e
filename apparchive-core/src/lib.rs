//! Project archive import engine.
//!
//! Ingests zip-packaged projects and commits them to a storage backend as a
//! new project, a screen added to an existing project, or a single
//! asset/user file.

pub mod archive;
pub mod bounded;
pub mod commit;
pub mod config;
pub mod errors;
pub mod importer;
pub mod naming;
pub mod screen;
pub mod storage;

pub use config::ImporterConfig;
pub use errors::{ImportError, ImportErrorKind, ImportResult, UploadStatus};
pub use importer::FileImporter;
pub use screen::ScreenImport;
pub use storage::{InMemoryStorage, ProjectId, ProjectStorage, UserProject};
