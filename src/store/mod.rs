//! Dataset persistence as a single JSON blob.
//!
//! The engine's side of the contract is [`serialize`] / [`deserialize`]:
//! the canonical record list, verbatim. [`BlobStore`] is the host-owned
//! collaborator that keeps such blobs under named slots in a
//! host-provided directory; an absent slot means no dataset loaded.

use crate::error::{Error, Result};
use crate::model::Listen;
use std::fs;
use std::path::{Path, PathBuf};

/// The slot holding the merged dataset.
pub const DATASET_SLOT: &str = "streaming-history";

/// Serialize a dataset to its persisted JSON form.
pub fn serialize(dataset: &[Listen]) -> Result<String> {
    Ok(serde_json::to_string(dataset)?)
}

/// Deserialize a persisted blob back into a dataset.
pub fn deserialize(blob: &str) -> Result<Vec<Listen>> {
    Ok(serde_json::from_str(blob)?)
}

/// File-backed key-value blob store, one file per slot.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Store rooted at the OS data directory.
    pub fn open_default() -> Result<Self> {
        let root = dirs::data_dir()
            .ok_or_else(|| Error::store("could not determine data directory"))?
            .join("listen-lens");
        Ok(Self { root })
    }

    /// Store rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.root.join(format!("{slot}.json"))
    }

    /// Load a slot's blob, or `None` when the slot is absent.
    pub fn load(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    /// Write a slot's blob, creating the store directory if needed.
    /// Writes to a temp file first, then renames into place.
    pub fn save(&self, slot: &str, blob: &str) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.slot_path(slot);
        let temp = path.with_extension("json.tmp");
        fs::write(&temp, blob)?;
        fs::rename(&temp, &path)?;
        Ok(())
    }

    /// Remove a slot. Returns whether it existed.
    pub fn delete(&self, slot: &str) -> Result<bool> {
        let path = self.slot_path(slot);
        if path.exists() {
            fs::remove_file(&path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
