use std::collections::BTreeSet;
use std::io::{Cursor, Read};

use tracing::{debug, error};
use zip::ZipArchive;

use crate::archive::paths::{
    ANDROID_KEYSTORE_FILENAME, PROJECT_PROPERTIES_FILE_NAME, REMIX_INFORMATION_FILE_PATH,
};
use crate::errors::{ImportError, ImportResult};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    /// The project properties file that marks the archive as a project
    Manifest,
    /// Present in the archive but never imported
    Ignored,
    Regular,
}

/// One file pulled out of the container.
#[derive(Clone, Debug)]
pub struct ArchiveEntry {
    pub path: String,
    pub content: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct ClassifiedEntry {
    pub kind: EntryKind,
    pub entry: ArchiveEntry,
}

/// Paths that are skipped on import.
#[derive(Clone, Debug)]
pub struct IgnoreSet(BTreeSet<String>);

impl IgnoreSet {
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.0.insert(path.into());
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }
}

impl Default for IgnoreSet {
    /// Remix metadata cannot be verified on upload, and keystores are not
    /// kept per project.
    fn default() -> Self {
        Self::empty()
            .with_path(REMIX_INFORMATION_FILE_PATH)
            .with_path(ANDROID_KEYSTORE_FILENAME)
    }
}

fn classify(ignored: &IgnoreSet, path: &str) -> EntryKind {
    if path == PROJECT_PROPERTIES_FILE_NAME {
        EntryKind::Manifest
    } else if ignored.contains(path) {
        EntryKind::Ignored
    } else {
        EntryKind::Regular
    }
}

/// Walks the entries of a zip container in central-directory order,
/// dropping directories and tagging each file.
///
/// The upload is read to its end on the first call to [`next_entry`] and the
/// container is indexed from the buffered bytes, so entries whose sizes only
/// follow their data (general-purpose flag bit 3) are read like any other.
/// The upload stream is released as soon as it has been buffered.
///
/// [`next_entry`]: ArchiveReader::next_entry
pub struct ArchiveReader<R: Read> {
    upload: Option<R>,
    archive: Option<ZipArchive<Cursor<Vec<u8>>>>,
    next_index: usize,
    ignored: IgnoreSet,
    manifest_seen: bool,
    finished: bool,
}

impl<R: Read> ArchiveReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_ignored(reader, IgnoreSet::default())
    }

    pub fn with_ignored(reader: R, ignored: IgnoreSet) -> Self {
        Self {
            upload: Some(reader),
            archive: None,
            next_index: 0,
            ignored,
            manifest_seen: false,
            finished: false,
        }
    }

    pub fn classify(&self, path: &str) -> EntryKind {
        classify(&self.ignored, path)
    }

    fn open(&mut self) -> ImportResult<()> {
        let Some(mut upload) = self.upload.take() else {
            return Ok(());
        };
        let mut bytes = Vec::new();
        upload.read_to_end(&mut bytes)?;
        drop(upload);

        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(|err| {
            error!("Invalid project archive format: {}", err);
            ImportError::from_container(err)
        })?;
        debug!(entries = archive.len(), "Opened archive");
        self.archive = Some(archive);
        Ok(())
    }

    /// Next non-directory entry, or `None` once the container is exhausted.
    ///
    /// Ignored entries are reported with empty content; their bytes are never
    /// decompressed.
    pub fn next_entry(&mut self) -> ImportResult<Option<ClassifiedEntry>> {
        if self.finished {
            return Ok(None);
        }
        if let Err(err) = self.open() {
            self.finished = true;
            return Err(err);
        }

        if let Some(archive) = self.archive.as_mut() {
            while self.next_index < archive.len() {
                let index = self.next_index;
                self.next_index += 1;

                let mut file = match archive.by_index(index) {
                    Ok(file) => file,
                    Err(err) => {
                        self.finished = true;
                        error!(index, "Invalid project archive format: {}", err);
                        return Err(ImportError::from_container(err));
                    }
                };
                if file.is_dir() {
                    continue;
                }

                let path = file.name().to_string();
                let kind = classify(&self.ignored, &path);
                let mut content = Vec::new();
                if kind != EntryKind::Ignored {
                    if let Err(err) = file.read_to_end(&mut content) {
                        self.finished = true;
                        error!(path = %path, "Failed to read archive entry: {}", err);
                        return Err(ImportError::from_entry_read(err));
                    }
                }
                if kind == EntryKind::Manifest {
                    self.manifest_seen = true;
                }

                debug!(path = %path, kind = ?kind, bytes = content.len(), "Classified archive entry");
                return Ok(Some(ClassifiedEntry {
                    kind,
                    entry: ArchiveEntry { path, content },
                }));
            }
        }

        self.finished = true;
        self.archive = None;
        Ok(None)
    }

    pub fn manifest_seen(&self) -> bool {
        self.manifest_seen
    }

    /// Fails with `MissingManifest` unless a manifest entry has been seen.
    pub fn require_manifest(&self) -> ImportResult<()> {
        if self.manifest_seen {
            Ok(())
        } else {
            Err(ImportError::MissingManifest)
        }
    }

    /// Drain the whole container.
    pub fn read_all(mut self) -> ImportResult<Vec<ClassifiedEntry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }
}
