use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{
    entities::entitlement_slots::EntitlementSlotsEntity,
    repositories::entitlement_slots::EntitlementSlotRepository,
    value_objects::enums::slot_names::SlotName,
};

/// Slots kept in one JSON object file, keyed by slot name.
///
/// Keys this store does not own are preserved on write. Each write replaces the file through
/// a sibling temp file and a rename. A file that cannot be read back is replaced by the next
/// write rather than blocking it.
pub struct FileSlotStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSlotStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read slot file {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&raw)
            .with_context(|| format!("slot file {} is not a JSON object", self.path.display()))
    }

    /// Current file contents for a read-modify-write; an unreadable file counts as empty.
    fn read_map_for_write(&self) -> Map<String, Value> {
        self.read_map().unwrap_or_else(|err| {
            warn!(
                path = %self.path.display(),
                error = ?err,
                "slot file unreadable; it will be overwritten"
            );
            Map::new()
        })
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(map)?;
        fs::write(&tmp_path, body)
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), "slot file written");
        Ok(())
    }
}

impl EntitlementSlotRepository for FileSlotStorage {
    fn load_slots(&self) -> Result<EntitlementSlotsEntity> {
        let map = self.read_map()?;

        let mut entity = EntitlementSlotsEntity::default();
        for slot in SlotName::ALL {
            entity.set(slot, slot_value(slot, map.get(slot.as_str())));
        }
        Ok(entity)
    }

    fn write_slot(&self, slot: SlotName, value: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("slot file lock poisoned"))?;

        let mut map = self.read_map_for_write();
        map.insert(slot.as_str().to_string(), Value::String(value.to_string()));
        self.write_map(&map)
    }

    fn clear_slots(&self) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("slot file lock poisoned"))?;

        let mut map = self.read_map_for_write();
        map.retain(|key, _| SlotName::from_str(key).is_none());

        if map.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)
                    .with_context(|| format!("failed to remove {}", self.path.display()))?;
            }
            return Ok(());
        }

        self.write_map(&map)
    }
}

fn slot_value(slot: SlotName, value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(raw) => Some(raw.clone()),
        Value::Null => None,
        other => {
            warn!(%slot, raw_value = %other, "slot file value is not a string; using default");
            None
        }
    }
}
