use std::collections::BTreeSet;
use std::io::Read;
use std::sync::Arc;

use tracing::info;

use crate::archive::{ArchiveReader, DraftBuilder};
use crate::bounded::read_bounded;
use crate::commit::CommitCoordinator;
use crate::config::ImporterConfig;
use crate::errors::ImportResult;
use crate::naming::{
    NameTokenGenerator, NameTokenSource, NamingContext, NamingConvention, YoungAndroidConventions,
};
use crate::screen::{IdentifierRewrite, ScreenDuplicator, ScreenImport, SubstringRewrite};
use crate::storage::{ProjectId, ProjectStorage, UserProject};

/// Entry point for every import mode.
///
/// Each call is synchronous and owns its upload stream until it returns.
/// Collaborators are injected; nothing is global.
#[derive(Clone)]
pub struct FileImporter {
    storage: Arc<dyn ProjectStorage>,
    conventions: Arc<dyn NamingConvention>,
    tokens: Arc<dyn NameTokenSource>,
    rewriter: Arc<dyn IdentifierRewrite>,
    config: ImporterConfig,
}

impl FileImporter {
    pub fn new(storage: Arc<dyn ProjectStorage>, config: ImporterConfig) -> Self {
        Self {
            storage,
            conventions: Arc::new(YoungAndroidConventions),
            tokens: Arc::new(NameTokenGenerator::new()),
            rewriter: Arc::new(SubstringRewrite),
            config,
        }
    }

    pub fn with_conventions(mut self, conventions: Arc<dyn NamingConvention>) -> Self {
        self.conventions = conventions;
        self
    }

    pub fn with_token_source(mut self, tokens: Arc<dyn NameTokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_rewriter(mut self, rewriter: Arc<dyn IdentifierRewrite>) -> Self {
        self.rewriter = rewriter;
        self
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    /// Effective ceiling for single-file uploads.
    pub fn max_upload_bytes(&self) -> u64 {
        self.config
            .max_asset_size_bytes()
            .min(self.storage.max_job_size_bytes())
    }

    pub fn naming_context(&self, owner_id: &str, project_name: &str) -> ImportResult<NamingContext> {
        let email = self.storage.owner_email(owner_id)?;
        Ok(NamingContext::derive(
            self.conventions.as_ref(),
            &email,
            project_name,
        ))
    }

    /// Import an archive as a brand-new project.
    ///
    /// `project_name` is expected to be validated (and checked for clashes)
    /// by the caller.
    pub fn import_project<R: Read>(
        &self,
        owner_id: &str,
        project_name: &str,
        upload: R,
    ) -> ImportResult<UserProject> {
        self.import_project_with_history(owner_id, project_name, upload, None)
    }

    pub fn import_project_with_history<R: Read>(
        &self,
        owner_id: &str,
        project_name: &str,
        upload: R,
        history: Option<String>,
    ) -> ImportResult<UserProject> {
        info!(owner_id, project_name, "Importing project archive");
        let naming = self.naming_context(owner_id, project_name)?;
        let draft = DraftBuilder::new(project_name, &naming, self.conventions.as_ref())
            .build(ArchiveReader::new(upload), history)?;

        let settings = self.conventions.project_settings();
        CommitCoordinator::new(self.storage.as_ref()).create_project(owner_id, &draft, &settings)
    }

    /// Add the screen contained in an archive to an existing project under a
    /// freshly generated name.
    pub fn import_project_screen<R: Read>(
        &self,
        owner_id: &str,
        project_id: ProjectId,
        project_name: &str,
        upload: R,
    ) -> ImportResult<ScreenImport> {
        info!(owner_id, project_id, project_name, "Importing screen archive");
        let naming = self.naming_context(owner_id, project_name)?;
        let coordinator = CommitCoordinator::new(self.storage.as_ref());
        let mut commit = coordinator.open_project(owner_id, project_id)?;

        let duplicator =
            ScreenDuplicator::new(&naming, self.tokens.as_ref(), self.rewriter.as_ref());
        let (screen_name, files) = duplicator.import(ArchiveReader::new(upload), &mut commit)?;

        Ok(ScreenImport {
            project: coordinator.project(owner_id, project_id)?,
            screen_name,
            files,
        })
    }

    /// Upload one asset into a project, replacing any file already at
    /// `file_name`. Returns the stored version.
    pub fn import_file<R: Read>(
        &self,
        owner_id: &str,
        project_id: ProjectId,
        file_name: &str,
        upload: R,
    ) -> ImportResult<u64> {
        let content = read_bounded(upload, self.max_upload_bytes())?;
        let mut commit =
            CommitCoordinator::new(self.storage.as_ref()).open_project(owner_id, project_id)?;
        let version = commit.write_raw(file_name, &content)?;
        info!(
            owner_id,
            project_id,
            file_name,
            bytes = content.len(),
            version,
            "Imported file"
        );
        Ok(version)
    }

    /// Upload one owner-scoped file, replacing any file already at `file_name`.
    pub fn import_user_file<R: Read>(
        &self,
        owner_id: &str,
        file_name: &str,
        upload: R,
    ) -> ImportResult<()> {
        let content = read_bounded(upload, self.max_upload_bytes())?;
        CommitCoordinator::new(self.storage.as_ref())
            .commit_user_file(owner_id, file_name, &content)?;
        info!(owner_id, file_name, bytes = content.len(), "Imported user file");
        Ok(())
    }

    /// Park an upload in temporary storage and return the name it got.
    pub fn import_temp_file<R: Read>(&self, upload: R) -> ImportResult<String> {
        let content = read_bounded(upload, self.max_upload_bytes())?;
        Ok(self.storage.upload_temp_file(&content)?)
    }

    pub fn project_names(&self, owner_id: &str) -> ImportResult<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for project_id in self.storage.list_projects(owner_id)? {
            names.insert(self.storage.project_name(owner_id, project_id)?);
        }
        Ok(names)
    }
}
