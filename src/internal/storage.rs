//! Named-slot key/value storage for small JSON blobs.
//!
//! A slot holds one serialized document and is always overwritten whole.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use tracing::info;

pub trait SlotStorage: Send + Sync {
    /// Read the raw contents of `slot`. `Ok(None)` when the slot was never written.
    fn read(&self, slot: &str) -> Result<Option<String>>;

    /// Replace the contents of `slot`.
    fn write(&self, slot: &str, contents: &str) -> Result<()>;
}

/// One `<slot>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.directory.join(format!("{}.json", slot))
    }
}

impl SlotStorage for FileStorage {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot);
        match path.exists() {
            true => {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read slot file {}", path.display()))?;
                Ok(Some(content))
            }
            false => {
                info!(slot_file = %path.display(), "Slot file not found");
                Ok(None)
            }
        }
    }

    fn write(&self, slot: &str, contents: &str) -> Result<()> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory).with_context(|| {
                format!("Failed to create storage directory {}", self.directory.display())
            })?;
            info!(directory = %self.directory.display(), "Created storage directory");
        }

        // Write beside the slot and rename over it so a crash mid-write
        // leaves the previous blob intact.
        let path = self.slot_path(slot);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write slot file {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace slot file {}", path.display()))?;
        Ok(())
    }
}

/// In-process storage. Clones share the same slots, which lets tests
/// simulate a restart by building a second store over a clone.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStorage for MemoryStorage {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        Ok(slots.get(slot).cloned())
    }

    fn write(&self, slot: &str, contents: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        slots.insert(slot.to_string(), contents.to_string());
        Ok(())
    }
}
