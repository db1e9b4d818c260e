//! Storage contract consumed by the importer.
//!
//! The engine never persists anything itself; every write goes through a
//! [`ProjectStorage`] handed to it at construction time. Implementations are
//! responsible for their own locking and durability.

pub mod memory;

use serde::Serialize;

use crate::archive::ProjectDraft;
use crate::errors::StorageResult;

pub use memory::InMemoryStorage;

pub type ProjectId = i64;

pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Identity of a persisted project, as returned by a successful import.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProject {
    pub owner_id: String,
    pub project_id: ProjectId,
    pub project_name: String,
    pub project_type: String,
}

pub trait ProjectStorage: Send + Sync {
    fn owner_email(&self, owner_id: &str) -> StorageResult<String>;

    fn create_project(
        &self,
        owner_id: &str,
        draft: &ProjectDraft,
        settings: &str,
    ) -> StorageResult<ProjectId>;

    fn get_project(&self, owner_id: &str, project_id: ProjectId) -> StorageResult<UserProject>;

    /// Registering an already registered path is a no-op.
    fn register_source_file(
        &self,
        owner_id: &str,
        project_id: ProjectId,
        is_external: bool,
        path: &str,
    ) -> StorageResult<()>;

    fn list_source_files(&self, owner_id: &str, project_id: ProjectId)
        -> StorageResult<Vec<String>>;

    /// Overwrites whatever is stored at `path`.
    fn write_file(
        &self,
        project_id: ProjectId,
        path: &str,
        owner_id: &str,
        content: &str,
        charset: &str,
    ) -> StorageResult<()>;

    /// Overwrites whatever is stored at `path` and returns the new version.
    fn write_raw_file(
        &self,
        project_id: ProjectId,
        path: &str,
        owner_id: &str,
        content: &[u8],
    ) -> StorageResult<u64>;

    fn max_job_size_bytes(&self) -> u64;

    fn list_user_files(&self, owner_id: &str) -> StorageResult<Vec<String>>;

    fn register_user_file(&self, owner_id: &str, path: &str) -> StorageResult<()>;

    fn write_user_file(&self, owner_id: &str, path: &str, content: &[u8]) -> StorageResult<()>;

    /// Stores an anonymous blob and returns the name it was filed under.
    fn upload_temp_file(&self, content: &[u8]) -> StorageResult<String>;

    fn list_projects(&self, owner_id: &str) -> StorageResult<Vec<ProjectId>>;

    fn project_name(&self, owner_id: &str, project_id: ProjectId) -> StorageResult<String>;
}
