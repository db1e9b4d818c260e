//! Import error types
//!
//! Every import operation returns [`ImportError`] on failure. Two kinds are
//! classified into an [`UploadStatus`] that callers can surface to users;
//! storage and I/O failures are propagated unclassified.
//!
//! # Examples
//!
//! ```rust
//! use apparchive::errors::{ImportError, ImportErrorKind, UploadStatus};
//!
//! let err = ImportError::SizeLimitExceeded { limit: 1024 };
//! assert_eq!(err.kind(), ImportErrorKind::SizeLimitExceeded);
//! assert_eq!(err.status(), Some(UploadStatus::FileTooLarge));
//! assert_eq!(err.error_code(), "FILE_TOO_LARGE");
//! ```

use std::fmt;
use std::io;

use thiserror::Error;
use zip::result::ZipError;

use super::StorageError;

/// Status taxonomy reported back to whoever uploaded the file.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum UploadStatus {
    NotProjectArchive,
    FileTooLarge,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::NotProjectArchive => "NOT_PROJECT_ARCHIVE",
            UploadStatus::FileTooLarge => "FILE_TOO_LARGE",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImportErrorKind {
    ArchiveFormat,
    MissingManifest,
    SizeLimitExceeded,
    Storage,
    Io,
}

/// Import operation errors
#[derive(Error, Debug)]
pub enum ImportError {
    /// The uploaded bytes are not a readable zip container
    #[error("Invalid project archive format: {0}")]
    ArchiveFormat(#[source] ZipError),

    /// The container parsed but never yielded a project properties entry
    #[error("Archive does not contain a project properties file")]
    MissingManifest,

    /// The uploaded file is larger than the effective byte ceiling
    #[error("File exceeds the maximum upload size of {limit} bytes")]
    SizeLimitExceeded { limit: u64 },

    /// A storage collaborator call failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Reading the upload stream failed
    #[error("IO error: {0}")]
    Io(#[source] io::Error),
}

impl ImportError {
    pub fn kind(&self) -> ImportErrorKind {
        match self {
            ImportError::ArchiveFormat(_) => ImportErrorKind::ArchiveFormat,
            ImportError::MissingManifest => ImportErrorKind::MissingManifest,
            ImportError::SizeLimitExceeded { .. } => ImportErrorKind::SizeLimitExceeded,
            ImportError::Storage(_) => ImportErrorKind::Storage,
            ImportError::Io(_) => ImportErrorKind::Io,
        }
    }

    /// Classified status, or `None` for errors that are propagated as-is
    pub fn status(&self) -> Option<UploadStatus> {
        match self.kind() {
            ImportErrorKind::ArchiveFormat | ImportErrorKind::MissingManifest => {
                Some(UploadStatus::NotProjectArchive)
            }
            ImportErrorKind::SizeLimitExceeded => Some(UploadStatus::FileTooLarge),
            ImportErrorKind::Storage | ImportErrorKind::Io => None,
        }
    }

    /// Check if this error is the uploader's fault rather than the backend's
    pub fn is_client_error(&self) -> bool {
        self.status().is_some()
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ImportError::ArchiveFormat(_) | ImportError::MissingManifest => {
                UploadStatus::NotProjectArchive.as_str()
            }
            ImportError::SizeLimitExceeded { .. } => UploadStatus::FileTooLarge.as_str(),
            ImportError::Storage(_) => "STORAGE_ERROR",
            ImportError::Io(_) => "IO_ERROR",
        }
    }

    /// Classify an error raised while walking the zip container.
    ///
    /// A stream that ends early or carries undecodable data is a broken
    /// container; any other I/O failure belongs to the transport.
    pub(crate) fn from_container(err: ZipError) -> Self {
        match err {
            ZipError::Io(io_err) if !is_container_damage(&io_err) => ImportError::Io(io_err),
            other => ImportError::ArchiveFormat(other),
        }
    }

    /// Classify an error raised while reading one entry's content.
    pub(crate) fn from_entry_read(err: io::Error) -> Self {
        if is_container_damage(&err) {
            ImportError::ArchiveFormat(ZipError::Io(err))
        } else {
            ImportError::Io(err)
        }
    }
}

fn is_container_damage(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData
    )
}

impl From<io::Error> for ImportError {
    fn from(err: io::Error) -> Self {
        ImportError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_format() {
        let err = ImportError::ArchiveFormat(ZipError::InvalidArchive("Invalid local file header"));
        assert!(err
            .to_string()
            .starts_with("Invalid project archive format: "));
        assert_eq!(err.status(), Some(UploadStatus::NotProjectArchive));
        assert_eq!(err.error_code(), "NOT_PROJECT_ARCHIVE");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_missing_manifest_shares_status() {
        let err = ImportError::MissingManifest;
        assert_eq!(err.kind(), ImportErrorKind::MissingManifest);
        assert_eq!(err.status(), Some(UploadStatus::NotProjectArchive));
    }

    #[test]
    fn test_storage_is_unclassified() {
        let err = ImportError::from(StorageError::rejected("quota exhausted"));
        assert_eq!(err.kind(), ImportErrorKind::Storage);
        assert_eq!(err.status(), None);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_container_eof_is_format_error() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        let err = ImportError::from_container(ZipError::Io(eof));
        assert_eq!(err.kind(), ImportErrorKind::ArchiveFormat);
    }

    #[test]
    fn test_container_transport_error_is_io() {
        let reset = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let err = ImportError::from_container(ZipError::Io(reset));
        assert_eq!(err.kind(), ImportErrorKind::Io);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_upload_status_display() {
        assert_eq!(UploadStatus::FileTooLarge.to_string(), "FILE_TOO_LARGE");
    }
}
