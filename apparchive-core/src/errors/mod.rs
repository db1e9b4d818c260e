//! Error types for apparchive
//!
//! # Error Categories
//!
//! - **ImportError**: everything an import call can fail with, tagged by
//!   [`ImportErrorKind`] and optionally classified into an [`UploadStatus`]
//! - **StorageError**: failures reported by the storage collaborator
//! - **ConfigError**: importer configuration loading and validation
//!
//! ## Using in Functions
//!
//! ```rust
//! use apparchive::errors::{ImportError, ImportResult};
//!
//! fn require_manifest(seen: bool) -> ImportResult<()> {
//!     if !seen {
//!         return Err(ImportError::MissingManifest);
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_manifest(false).is_err());
//! ```

pub mod config;
pub mod import;
pub mod storage;

pub use config::ConfigError;
pub use import::{ImportError, ImportErrorKind, UploadStatus};
pub use storage::{StorageError, StorageResult};

/// Result type alias for import operations
pub type ImportResult<T> = Result<T, ImportError>;

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
