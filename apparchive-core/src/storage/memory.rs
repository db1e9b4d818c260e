use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::archive::ProjectDraft;
use crate::errors::{StorageError, StorageResult};
use crate::storage::{ProjectId, ProjectStorage, UserProject};

const DEFAULT_MAX_JOB_SIZE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
struct StoredFile {
    content: Vec<u8>,
    version: u64,
}

#[derive(Debug)]
struct StoredProject {
    owner_id: String,
    name: String,
    project_type: String,
    settings: String,
    history: Option<String>,
    source_files: BTreeSet<String>,
    files: BTreeMap<String, StoredFile>,
}

#[derive(Debug, Default)]
struct UserFiles {
    registered: BTreeSet<String>,
    files: BTreeMap<String, Vec<u8>>,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<String, String>,
    projects: BTreeMap<ProjectId, StoredProject>,
    next_project_id: ProjectId,
    user_files: HashMap<String, UserFiles>,
    temp_files: BTreeMap<String, Vec<u8>>,
    create_project_calls: usize,
    successful_writes: usize,
    fail_writes_after: Option<usize>,
}

impl State {
    fn project(&self, owner_id: &str, project_id: ProjectId) -> StorageResult<&StoredProject> {
        self.projects
            .get(&project_id)
            .filter(|project| project.owner_id == owner_id)
            .ok_or_else(|| StorageError::not_found("project", project_id.to_string()))
    }

    fn project_mut(
        &mut self,
        owner_id: &str,
        project_id: ProjectId,
    ) -> StorageResult<&mut StoredProject> {
        self.projects
            .get_mut(&project_id)
            .filter(|project| project.owner_id == owner_id)
            .ok_or_else(|| StorageError::not_found("project", project_id.to_string()))
    }

    fn check_write_budget(&mut self) -> StorageResult<()> {
        if let Some(limit) = self.fail_writes_after {
            if self.successful_writes >= limit {
                return Err(StorageError::rejected("injected write failure"));
            }
        }
        self.successful_writes += 1;
        Ok(())
    }
}

/// Non-persistent [`ProjectStorage`] for dry runs and tests.
///
/// Besides the contract it records how often `create_project` was called and
/// can be told to start failing writes after a number of successful ones.
#[derive(Debug)]
pub struct InMemoryStorage {
    state: Mutex<State>,
    max_job_size_bytes: u64,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_project_id: 1,
                ..Default::default()
            }),
            max_job_size_bytes: DEFAULT_MAX_JOB_SIZE_BYTES,
        }
    }

    pub fn with_user(self, owner_id: impl Into<String>, email: impl Into<String>) -> Self {
        self.state().users.insert(owner_id.into(), email.into());
        self
    }

    pub fn with_max_job_size(mut self, bytes: u64) -> Self {
        self.max_job_size_bytes = bytes;
        self
    }

    /// Every write after the first `successful` ones is rejected.
    pub fn fail_writes_after(&self, successful: usize) {
        let mut state = self.state();
        state.fail_writes_after = Some(state.successful_writes + successful);
    }

    pub fn create_project_calls(&self) -> usize {
        self.state().create_project_calls
    }

    pub fn project_count(&self) -> usize {
        self.state().projects.len()
    }

    pub fn file_content(&self, project_id: ProjectId, path: &str) -> Option<Vec<u8>> {
        self.state()
            .projects
            .get(&project_id)
            .and_then(|project| project.files.get(path))
            .map(|file| file.content.clone())
    }

    pub fn file_paths(&self, project_id: ProjectId) -> Vec<String> {
        self.state()
            .projects
            .get(&project_id)
            .map(|project| project.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn project_settings(&self, project_id: ProjectId) -> Option<String> {
        self.state()
            .projects
            .get(&project_id)
            .map(|project| project.settings.clone())
    }

    pub fn project_history(&self, project_id: ProjectId) -> Option<String> {
        self.state()
            .projects
            .get(&project_id)
            .and_then(|project| project.history.clone())
    }

    pub fn user_file(&self, owner_id: &str, path: &str) -> Option<Vec<u8>> {
        self.state()
            .user_files
            .get(owner_id)
            .and_then(|files| files.files.get(path))
            .cloned()
    }

    pub fn temp_file(&self, name: &str) -> Option<Vec<u8>> {
        self.state().temp_files.get(name).cloned()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProjectStorage for InMemoryStorage {
    fn owner_email(&self, owner_id: &str) -> StorageResult<String> {
        self.state()
            .users
            .get(owner_id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("user", owner_id))
    }

    fn create_project(
        &self,
        owner_id: &str,
        draft: &ProjectDraft,
        settings: &str,
    ) -> StorageResult<ProjectId> {
        let mut state = self.state();
        state.create_project_calls += 1;

        let mut files = BTreeMap::new();
        for text in &draft.text_files {
            files.insert(
                text.path.clone(),
                StoredFile {
                    content: text.content.as_bytes().to_vec(),
                    version: 1,
                },
            );
        }
        for raw in &draft.raw_files {
            files.insert(
                raw.path.clone(),
                StoredFile {
                    content: raw.content.clone(),
                    version: 1,
                },
            );
        }

        let project_id = state.next_project_id;
        state.next_project_id += 1;
        state.projects.insert(
            project_id,
            StoredProject {
                owner_id: owner_id.to_string(),
                name: draft.project_name.clone(),
                project_type: draft.project_type.clone(),
                settings: settings.to_string(),
                history: draft.history.clone(),
                source_files: files.keys().cloned().collect(),
                files,
            },
        );
        Ok(project_id)
    }

    fn get_project(&self, owner_id: &str, project_id: ProjectId) -> StorageResult<UserProject> {
        let state = self.state();
        let project = state.project(owner_id, project_id)?;
        Ok(UserProject {
            owner_id: project.owner_id.clone(),
            project_id,
            project_name: project.name.clone(),
            project_type: project.project_type.clone(),
        })
    }

    fn register_source_file(
        &self,
        owner_id: &str,
        project_id: ProjectId,
        _is_external: bool,
        path: &str,
    ) -> StorageResult<()> {
        let mut state = self.state();
        state
            .project_mut(owner_id, project_id)?
            .source_files
            .insert(path.to_string());
        Ok(())
    }

    fn list_source_files(
        &self,
        owner_id: &str,
        project_id: ProjectId,
    ) -> StorageResult<Vec<String>> {
        let state = self.state();
        Ok(state
            .project(owner_id, project_id)?
            .source_files
            .iter()
            .cloned()
            .collect())
    }

    fn write_file(
        &self,
        project_id: ProjectId,
        path: &str,
        owner_id: &str,
        content: &str,
        _charset: &str,
    ) -> StorageResult<()> {
        self.write_raw_file(project_id, path, owner_id, content.as_bytes())
            .map(|_| ())
    }

    fn write_raw_file(
        &self,
        project_id: ProjectId,
        path: &str,
        owner_id: &str,
        content: &[u8],
    ) -> StorageResult<u64> {
        let mut state = self.state();
        state.project(owner_id, project_id)?;
        state.check_write_budget()?;

        let project = state.project_mut(owner_id, project_id)?;
        let version = project.files.get(path).map(|f| f.version + 1).unwrap_or(1);
        project.files.insert(
            path.to_string(),
            StoredFile {
                content: content.to_vec(),
                version,
            },
        );
        Ok(version)
    }

    fn max_job_size_bytes(&self) -> u64 {
        self.max_job_size_bytes
    }

    fn list_user_files(&self, owner_id: &str) -> StorageResult<Vec<String>> {
        Ok(self
            .state()
            .user_files
            .get(owner_id)
            .map(|files| files.registered.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn register_user_file(&self, owner_id: &str, path: &str) -> StorageResult<()> {
        self.state()
            .user_files
            .entry(owner_id.to_string())
            .or_default()
            .registered
            .insert(path.to_string());
        Ok(())
    }

    fn write_user_file(&self, owner_id: &str, path: &str, content: &[u8]) -> StorageResult<()> {
        let mut state = self.state();
        state.check_write_budget()?;
        state
            .user_files
            .entry(owner_id.to_string())
            .or_default()
            .files
            .insert(path.to_string(), content.to_vec());
        Ok(())
    }

    fn upload_temp_file(&self, content: &[u8]) -> StorageResult<String> {
        let mut state = self.state();
        let name = format!("__TEMP__/{}", state.temp_files.len() + 1);
        state.temp_files.insert(name.clone(), content.to_vec());
        Ok(name)
    }

    fn list_projects(&self, owner_id: &str) -> StorageResult<Vec<ProjectId>> {
        Ok(self
            .state()
            .projects
            .iter()
            .filter(|(_, project)| project.owner_id == owner_id)
            .map(|(id, _)| *id)
            .collect())
    }

    fn project_name(&self, owner_id: &str, project_id: ProjectId) -> StorageResult<String> {
        let state = self.state();
        Ok(state.project(owner_id, project_id)?.name.clone())
    }
}
