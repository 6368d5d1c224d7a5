//! Named-slot persistence for favorites and the poster cache.
//!
//! Each slot holds one JSON document. `JsonFileStore` keeps one file per
//! slot under a data directory; `MemoryStore` backs tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{Context, Result};

pub trait KeyValueStore: Send + Sync {
    /// Read a slot. `Ok(None)` when it has never been written.
    fn get(&self, slot: &str) -> Result<Option<String>>;

    /// Overwrite a slot.
    fn put(&self, slot: &str, value: &str) -> Result<()>;
}

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading slot {slot} from {}", path.display()))?;
        Ok(Some(raw))
    }

    fn put(&self, slot: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating data dir {}", self.dir.display()))?;

        // Write-then-rename: readers never see a partial slot.
        let path = self.slot_path(slot);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot without counting it as a write.
    pub fn with_slot(self, slot: &str, value: &str) -> Self {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(slot.to_string(), value.to_string());
        self
    }

    /// Number of `put` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slots.get(slot).cloned())
    }

    fn put(&self, slot: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }
}
