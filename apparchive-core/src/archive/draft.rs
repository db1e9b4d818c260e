use std::io::Read;

use serde::Serialize;
use tracing::{debug, warn};

use crate::archive::paths::{self, PROJECT_PROPERTIES_FILE_NAME};
use crate::archive::reader::{ArchiveReader, EntryKind};
use crate::errors::ImportResult;
use crate::naming::{NamingContext, NamingConvention};

pub const YOUNG_ANDROID_PROJECT_TYPE: &str = "YoungAndroid";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextFile {
    pub path: String,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RawFile {
    pub path: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// In-memory project assembled from an archive, committed in one call.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub project_name: String,
    pub project_type: String,
    pub text_files: Vec<TextFile>,
    pub raw_files: Vec<RawFile>,
    pub history: Option<String>,
}

impl ProjectDraft {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            project_type: YOUNG_ANDROID_PROJECT_TYPE.to_string(),
            text_files: Vec::new(),
            raw_files: Vec::new(),
            history: None,
        }
    }

    pub fn manifest(&self) -> Option<&TextFile> {
        self.text_files
            .iter()
            .find(|file| file.path == PROJECT_PROPERTIES_FILE_NAME)
    }

    /// Every destination path in the draft, text files first.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.text_files
            .iter()
            .map(|file| file.path.as_str())
            .chain(self.raw_files.iter().map(|file| file.path.as_str()))
    }
}

/// Turns a classified archive into a [`ProjectDraft`] for a brand-new project.
pub struct DraftBuilder<'a> {
    project_name: &'a str,
    naming: &'a NamingContext,
    conventions: &'a dyn NamingConvention,
}

impl<'a> DraftBuilder<'a> {
    pub fn new(
        project_name: &'a str,
        naming: &'a NamingContext,
        conventions: &'a dyn NamingConvention,
    ) -> Self {
        Self {
            project_name,
            naming,
            conventions,
        }
    }

    /// Consume the archive. Fails before anything is committed if the
    /// container is broken or holds no manifest.
    pub fn build<R: Read>(
        &self,
        mut reader: ArchiveReader<R>,
        history: Option<String>,
    ) -> ImportResult<ProjectDraft> {
        let mut draft = ProjectDraft::new(self.project_name);

        while let Some(classified) = reader.next_entry()? {
            let path = classified.entry.path;
            match classified.kind {
                EntryKind::Manifest => {
                    if draft.manifest().is_some() {
                        warn!(path = %path, "Skipping duplicate project properties entry");
                        continue;
                    }
                    // The archive's own properties name the old project; regenerate them.
                    let content = self
                        .conventions
                        .project_properties(self.project_name, &self.naming.qualified_form_name);
                    draft.text_files.push(TextFile { path, content });
                }
                EntryKind::Ignored => {
                    debug!(path = %path, "Ignoring archive entry");
                }
                EntryKind::Regular => {
                    let destination = paths::rewrite(&path, &self.naming.source_directory);
                    draft.raw_files.push(RawFile {
                        path: destination,
                        content: classified.entry.content,
                    });
                }
            }
        }

        reader.require_manifest()?;
        draft.history = history;
        Ok(draft)
    }
}
