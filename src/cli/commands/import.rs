//! Dataset import and lifecycle commands.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use serde_json::Value;

use crate::engine::Engine;
use crate::engine::filter::MonthRange;
use crate::error::{Error, Result};
use crate::ingest;
use crate::store::{self, BlobStore, DATASET_SLOT};

use super::collect_json_files;

/// Import export batches and replace the stored dataset wholesale.
pub fn cmd_import(store: &BlobStore, paths: &[PathBuf]) -> anyhow::Result<()> {
    let files = collect_json_files(paths);
    if files.is_empty() {
        anyhow::bail!("no .json files found under the given paths");
    }

    // A file that fails to parse is a load failure for that file only;
    // the merger never sees it.
    let mut batches: Vec<Vec<Value>> = Vec::new();
    for file in &files {
        match read_batch(file) {
            Ok(batch) => {
                info!(file = %file.display(), records = batch.len(), "Loaded batch");
                batches.push(batch);
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "Skipping file");
                eprintln!("Skipping {}: {}", file.display(), e);
            }
        }
    }
    if batches.is_empty() {
        anyhow::bail!("none of the given files could be loaded");
    }

    let file_count = batches.len();
    let dataset = ingest::merge_batches(&batches);
    let blob = store::serialize(&dataset)?;
    store.save(DATASET_SLOT, &blob)?;

    println!(
        "Imported {} listens from {} file{}.",
        dataset.len(),
        file_count,
        if file_count == 1 { "" } else { "s" }
    );
    if let Some(span) = MonthRange::full_span(&dataset) {
        println!(
            "Span: {:04}-{:02} .. {:04}-{:02}",
            span.begin_year, span.begin_month, span.end_year, span.end_month
        );
    }
    Ok(())
}

/// Show a summary of the stored dataset.
pub fn cmd_info(store: &BlobStore) -> anyhow::Result<()> {
    let Some(blob) = store.load(DATASET_SLOT)? else {
        println!("No dataset stored. Run `listen-lens import` first.");
        return Ok(());
    };
    let engine = Engine::with_dataset(store::deserialize(&blob)?);

    println!("Store:   {}", store.root().display());
    println!("Listens: {}", engine.dataset().len());
    if let (Some(first), Some(last)) = (engine.dataset().first(), engine.dataset().last()) {
        println!("From:    {}", first.end_time);
        println!("To:      {}", last.end_time);
    }
    println!("Artists: {}", engine.artists().len());
    println!("Songs:   {}", engine.songs().len());
    Ok(())
}

/// Remove the stored dataset.
pub fn cmd_delete(store: &BlobStore) -> anyhow::Result<()> {
    if store.delete(DATASET_SLOT)? {
        println!("Deleted stored dataset.");
    } else {
        println!("Nothing to delete.");
    }
    Ok(())
}

/// Read one batch file: a JSON array of raw listen records.
fn read_batch(path: &Path) -> Result<Vec<Value>> {
    let contents =
        fs::read_to_string(path).map_err(|e| Error::load(path, e.to_string()))?;
    let value: Value =
        serde_json::from_str(&contents).map_err(|e| Error::load(path, e.to_string()))?;
    match value {
        Value::Array(records) => Ok(records),
        _ => Err(Error::load(path, "not a JSON array of listen records")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_batch_accepts_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("batch.json");
        fs::write(&path, r#"[{"foo": 1}, {"bar": 2}]"#).unwrap();
        assert_eq!(read_batch(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_read_batch_rejects_non_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("batch.json");
        fs::write(&path, r#"{"not": "an array"}"#).unwrap();
        assert!(read_batch(&path).is_err());
    }

    #[test]
    fn test_read_batch_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("batch.json");
        fs::write(&path, "{{{{").unwrap();
        assert!(read_batch(&path).is_err());
    }

    #[test]
    fn test_import_merges_and_persists() {
        let dir = tempdir().unwrap();
        let exports = dir.path().join("exports");
        fs::create_dir_all(&exports).unwrap();
        fs::write(
            exports.join("b.json"),
            r#"[{"endTime": "2022-01-02 10:00", "artistName": "a", "trackName": "t", "msPlayed": 1000}]"#,
        )
        .unwrap();
        fs::write(
            exports.join("a.json"),
            r#"[{"ts": "2022-01-01T09:00:30Z", "ms_played": 2000,
                 "master_metadata_album_artist_name": "b",
                 "master_metadata_track_name": "u"}]"#,
        )
        .unwrap();
        // One broken file must not poison the import.
        fs::write(exports.join("c.json"), "not json").unwrap();

        let store = BlobStore::at(dir.path().join("data"));
        cmd_import(&store, &[exports]).unwrap();

        let blob = store.load(DATASET_SLOT).unwrap().unwrap();
        let dataset = store::deserialize(&blob).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset[0].end_time, "2022-01-01 09:00");
        assert_eq!(dataset[1].end_time, "2022-01-02 10:00");
    }

    #[test]
    fn test_import_replaces_previous_dataset() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("batch.json");
        fs::write(
            &file,
            r#"[{"endTime": "2023-05-01 10:00", "artistName": "x", "trackName": "y", "msPlayed": 1000}]"#,
        )
        .unwrap();

        let store = BlobStore::at(dir.path().join("data"));
        store.save(DATASET_SLOT, "[]").unwrap();
        cmd_import(&store, &[file]).unwrap();

        let blob = store.load(DATASET_SLOT).unwrap().unwrap();
        assert_eq!(store::deserialize(&blob).unwrap().len(), 1);
    }
}
