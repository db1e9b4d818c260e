//! Storage call sequencing for each import mode.
//!
//! New projects are created with a single `create_project` call. Everything
//! else is a register-then-overwrite pair per file with no surrounding
//! transaction: a failure part way through leaves earlier files in place.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::archive::ProjectDraft;
use crate::errors::ImportResult;
use crate::storage::{ProjectId, ProjectStorage, UserProject, DEFAULT_CHARSET};

pub struct CommitCoordinator<'a> {
    storage: &'a dyn ProjectStorage,
}

impl<'a> CommitCoordinator<'a> {
    pub fn new(storage: &'a dyn ProjectStorage) -> Self {
        Self { storage }
    }

    pub fn create_project(
        &self,
        owner_id: &str,
        draft: &ProjectDraft,
        settings: &str,
    ) -> ImportResult<UserProject> {
        let project_id = self.storage.create_project(owner_id, draft, settings)?;
        info!(
            owner_id,
            project_id,
            files = draft.text_files.len() + draft.raw_files.len(),
            "Created project from archive"
        );
        Ok(self.storage.get_project(owner_id, project_id)?)
    }

    /// Start committing individual files into an existing project.
    pub fn open_project(
        &self,
        owner_id: &str,
        project_id: ProjectId,
    ) -> ImportResult<ProjectCommit<'a>> {
        let registered = self
            .storage
            .list_source_files(owner_id, project_id)?
            .into_iter()
            .collect();
        Ok(ProjectCommit {
            storage: self.storage,
            owner_id: owner_id.to_string(),
            project_id,
            registered,
        })
    }

    /// Register (if needed) and overwrite one user-scoped file.
    pub fn commit_user_file(&self, owner_id: &str, path: &str, content: &[u8]) -> ImportResult<()> {
        let registered = self.storage.list_user_files(owner_id)?;
        if !registered.iter().any(|existing| existing == path) {
            self.storage.register_user_file(owner_id, path)?;
        }
        self.storage.write_user_file(owner_id, path, content)?;
        debug!(owner_id, path, bytes = content.len(), "Committed user file");
        Ok(())
    }

    pub fn project(&self, owner_id: &str, project_id: ProjectId) -> ImportResult<UserProject> {
        Ok(self.storage.get_project(owner_id, project_id)?)
    }
}

/// Per-file commits into one project.
pub struct ProjectCommit<'a> {
    storage: &'a dyn ProjectStorage,
    owner_id: String,
    project_id: ProjectId,
    registered: BTreeSet<String>,
}

impl ProjectCommit<'_> {
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn write_text(&mut self, path: &str, content: &str) -> ImportResult<()> {
        self.ensure_registered(path)?;
        self.storage
            .write_file(self.project_id, path, &self.owner_id, content, DEFAULT_CHARSET)?;
        debug!(project_id = self.project_id, path, "Committed source file");
        Ok(())
    }

    pub fn write_raw(&mut self, path: &str, content: &[u8]) -> ImportResult<u64> {
        self.ensure_registered(path)?;
        let version = self
            .storage
            .write_raw_file(self.project_id, path, &self.owner_id, content)?;
        debug!(project_id = self.project_id, path, version, "Committed raw file");
        Ok(version)
    }

    fn ensure_registered(&mut self, path: &str) -> ImportResult<()> {
        if !self.registered.contains(path) {
            self.storage
                .register_source_file(&self.owner_id, self.project_id, false, path)?;
            self.registered.insert(path.to_string());
        }
        Ok(())
    }
}
