//! Single-screen import into an existing project.
//!
//! Every `.scm`, `.bky` and `.yail` file under `src/` is renamed to one fresh
//! `Screen<token>` name and its text rewritten to match, then committed on
//! its own.

use std::io::Read;

use serde::Serialize;
use tracing::{debug, info};

use crate::archive::paths::{basename, dirname, is_source_path};
use crate::archive::{ArchiveReader, EntryKind};
use crate::commit::ProjectCommit;
use crate::errors::ImportResult;
use crate::naming::{NameTokenSource, NamingContext};
use crate::storage::UserProject;

pub const SCREEN_EXTENSIONS: [&str; 3] = [".scm", ".bky", ".yail"];

/// Renames one identifier inside a source file.
pub trait IdentifierRewrite: Send + Sync {
    fn rewrite(&self, text: &str, old_name: &str, new_name: &str) -> String;
}

/// Replaces every occurrence of `old_name`, case-sensitive, with no regard
/// for identifier boundaries. `Screen1` inside `Screen10` is rewritten too;
/// existing screen files depend on this exact behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubstringRewrite;

impl IdentifierRewrite for SubstringRewrite {
    fn rewrite(&self, text: &str, old_name: &str, new_name: &str) -> String {
        if old_name.is_empty() {
            return text.to_string();
        }
        text.replace(old_name, new_name)
    }
}

/// Replaces only occurrences not glued to another identifier character
/// (`[A-Za-z0-9_]`) on either side.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundaryAwareRewrite;

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl IdentifierRewrite for BoundaryAwareRewrite {
    fn rewrite(&self, text: &str, old_name: &str, new_name: &str) -> String {
        if old_name.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for (start, matched) in text.match_indices(old_name) {
            let end = start + matched.len();
            let glued_before = text[..start].chars().next_back().is_some_and(is_identifier_char);
            let glued_after = text[end..].chars().next().is_some_and(is_identifier_char);
            if glued_before || glued_after {
                continue;
            }
            out.push_str(&text[last..start]);
            out.push_str(new_name);
            last = end;
        }
        out.push_str(&text[last..]);
        out
    }
}

/// Outcome of a screen import.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenImport {
    pub project: UserProject,
    pub screen_name: String,
    /// Destination paths in the order they were committed.
    pub files: Vec<String>,
}

pub struct ScreenDuplicator<'a> {
    naming: &'a NamingContext,
    tokens: &'a dyn NameTokenSource,
    rewriter: &'a dyn IdentifierRewrite,
}

impl<'a> ScreenDuplicator<'a> {
    pub fn new(
        naming: &'a NamingContext,
        tokens: &'a dyn NameTokenSource,
        rewriter: &'a dyn IdentifierRewrite,
    ) -> Self {
        Self {
            naming,
            tokens,
            rewriter,
        }
    }

    /// Screens live one level above the per-project source leaf.
    pub fn parent_source_directory(&self) -> &str {
        dirname(&self.naming.source_directory)
    }

    /// Walk the archive and commit each screen file as soon as it is read.
    ///
    /// Returns the new screen name and the committed paths. Files committed
    /// before a failure stay committed.
    pub fn import<R: Read>(
        &self,
        mut reader: ArchiveReader<R>,
        commit: &mut ProjectCommit<'_>,
    ) -> ImportResult<(String, Vec<String>)> {
        let parent = self.parent_source_directory();
        let new_name = self.tokens.next_token().screen_name();
        let mut committed = Vec::new();

        while let Some(classified) = reader.next_entry()? {
            if classified.kind != EntryKind::Regular || !is_source_path(&classified.entry.path) {
                continue;
            }

            let file_name = basename(&classified.entry.path);
            let Some(extension) = screen_extension(file_name) else {
                debug!(path = %classified.entry.path, "Skipping non-screen source file");
                continue;
            };
            let old_name = file_name.split('.').next().unwrap_or_default();
            let destination = format!("{}/{}{}", parent, new_name, extension);

            let text = String::from_utf8_lossy(&classified.entry.content);
            let content = self.rewriter.rewrite(&text, old_name, &new_name);
            commit.write_text(&destination, &content)?;
            committed.push(destination);
        }

        info!(
            project_id = commit.project_id(),
            screen = %new_name,
            files = committed.len(),
            "Imported screen"
        );
        Ok((new_name, committed))
    }
}

fn screen_extension(file_name: &str) -> Option<&'static str> {
    SCREEN_EXTENSIONS
        .iter()
        .copied()
        .find(|ext| file_name.ends_with(ext))
}
