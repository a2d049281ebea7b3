//! # Batch Files
//!
//! A batch directory holds one `<collection>.json` file per batch, each a
//! JSON array of flat objects. The file stem is the collection name, so
//! `node_Article.json` loads as the `node_Article` batch. Files with other
//! extensions are ignored.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::debug;

use lexgraph_build::RawRegulation;
use lexgraph_core::{Record, RecordBatches};

/// Load every `*.json` batch in `dir`.
pub fn load_batches(dir: &Path) -> Result<RecordBatches> {
    if !dir.is_dir() {
        bail!("batch directory not found: {}", dir.display());
    }
    let mut batches = RecordBatches::new();
    for path in batch_files(dir)? {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read batch: {}", path.display()))?;
        let rows: Vec<Record> = serde_json::from_str(&content)
            .with_context(|| format!("batch is not an array of objects: {}", path.display()))?;
        debug!(collection = name, rows = rows.len(), "loaded batch");
        batches.insert(name.to_string(), rows);
    }
    Ok(batches)
}

fn batch_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list batch directory: {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to list batch directory: {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Write each batch to `dir/<collection>.json`, creating `dir` if needed.
pub fn write_batches(dir: &Path, batches: &RecordBatches) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create batch directory: {}", dir.display()))?;
    batches
        .iter()
        .map(|(name, rows)| {
            let path = dir.join(format!("{name}.json"));
            write_json(&path, rows)?;
            Ok(path)
        })
        .collect()
}

/// Load a JSON array of raw regulation documents.
pub fn load_raw(path: &Path) -> Result<Vec<RawRegulation>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read raw regulations: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid raw regulations: {}", path.display()))
}

/// Write a value as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, bytes).with_context(|| format!("failed to write: {}", path.display()))
}
