pub mod archive;
pub mod fixtures;

pub use archive::{corrupt_entry_header, ArchiveBuilder};
pub use fixtures::{
    sample_project_archive, sample_screen_archive, sample_streamed_project_archive,
    SAMPLE_MANIFEST,
};
