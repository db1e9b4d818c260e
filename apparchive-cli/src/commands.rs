use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use apparchive::archive::{ArchiveReader, EntryKind};
use apparchive::naming::{NameTokenGenerator, NameTokenSource};
use apparchive::{FileImporter, ImporterConfig, InMemoryStorage, UserProject};
use serde::Serialize;
use tracing::{error, info};

#[derive(Serialize)]
struct EntrySummary {
    path: String,
    kind: &'static str,
    bytes: usize,
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Manifest => "manifest",
        EntryKind::Ignored => "ignored",
        EntryKind::Regular => "regular",
    }
}

fn open_archive(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(file))
}

pub fn inspect(path: &Path, json: bool) -> Result<()> {
    let mut reader = ArchiveReader::new(open_archive(path)?);
    let mut entries = Vec::new();
    while let Some(classified) = reader.next_entry().map_err(|err| {
        error!("Cannot read archive ({}): {}", err.error_code(), err);
        err
    })? {
        entries.push(EntrySummary {
            path: classified.entry.path,
            kind: kind_label(classified.kind),
            bytes: classified.entry.content.len(),
        });
    }

    if json {
        let report = serde_json::json!({
            "manifest": reader.manifest_seen(),
            "entries": entries,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for entry in &entries {
            println!("{:<8} {:>10}  {}", entry.kind, entry.bytes, entry.path);
        }
    }

    reader.require_manifest().map_err(|err| {
        error!("Not importable as a project ({}): {}", err.error_code(), err);
        err
    })?;
    Ok(())
}

pub struct ImportArgs {
    pub archive: PathBuf,
    pub owner: String,
    pub email: String,
    pub name: String,
    pub history: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportReport {
    project: UserProject,
    files: Vec<String>,
}

pub fn import(args: ImportArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ImporterConfig::load(path)?,
        None => ImporterConfig::from_env()?,
    };
    let history = args
        .history
        .as_ref()
        .map(|path| {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        })
        .transpose()?;

    let storage = Arc::new(InMemoryStorage::new().with_user(&args.owner, &args.email));
    let importer = FileImporter::new(storage.clone(), config);

    info!("Importing {} as {}", args.archive.display(), args.name);
    let project = importer
        .import_project_with_history(&args.owner, &args.name, open_archive(&args.archive)?, history)
        .map_err(|err| {
            error!("Import failed with {}: {}", err.error_code(), err);
            err
        })?;

    let mut files = storage.file_paths(project.project_id);
    files.sort();
    let report = ImportReport { project, files };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn tokens(count: usize) {
    let generator = NameTokenGenerator::new();
    for _ in 0..count {
        println!("{}", generator.next_token());
    }
}
