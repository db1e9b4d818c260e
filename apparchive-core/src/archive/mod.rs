//! Archive ingestion: streaming classification of zip entries, path
//! rewriting into the destination namespace, and draft assembly for new
//! projects.

pub mod draft;
pub mod paths;
pub mod reader;

pub use draft::{DraftBuilder, ProjectDraft, RawFile, TextFile, YOUNG_ANDROID_PROJECT_TYPE};
pub use reader::{ArchiveEntry, ArchiveReader, ClassifiedEntry, EntryKind, IgnoreSet};
