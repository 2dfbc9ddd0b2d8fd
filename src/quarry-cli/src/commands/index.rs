//! Index command - submit files to the server

use super::{report, RequestOutcome};
use crate::output::{self, OutputFormat};
use clap::Args;
use quarry_rs::Client;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Files or directories to index
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// URI to store the document under (single file only)
    #[arg(long)]
    pub uri: Option<String>,

    /// Content type, instead of guessing from the extension
    #[arg(long)]
    pub content_type: Option<String>,

    /// Include hidden files and directories
    #[arg(long)]
    pub hidden: bool,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Expand directories into the files below them, sorted by name.
/// Plain paths are passed through even if they do not exist.
pub fn collect_files(paths: &[PathBuf], include_hidden: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry");
                    output::print_warning(&e.to_string());
                }
            }
        }
    }

    files
}

/// Execute the index command
pub async fn execute(args: IndexArgs, client: &Client, format: OutputFormat) -> anyhow::Result<()> {
    let files = collect_files(&args.paths, args.hidden);

    if args.uri.is_some() && files.len() != 1 {
        anyhow::bail!("--uri can only be used when indexing a single file");
    }
    if files.is_empty() {
        output::print_warning("no files to index");
        return Ok(());
    }

    tracing::info!(count = files.len(), "Indexing files");

    let mut outcomes = Vec::with_capacity(files.len());
    for file in &files {
        let result = client
            .index_file(file, args.uri.as_deref(), args.content_type.as_deref())
            .await;
        outcomes.push(RequestOutcome::from_result(target(file, args.uri.as_deref()), result));
    }

    report(&outcomes, format)
}

fn target(file: &Path, uri: Option<&str>) -> String {
    match uri {
        Some(uri) => uri.to_string(),
        None => file.display().to_string(),
    }
}
