use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use crate::domain::{
    entities::entitlement_slots::EntitlementSlotsEntity,
    repositories::entitlement_slots::EntitlementSlotRepository,
    value_objects::enums::slot_names::SlotName,
};

/// Process-local slots. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySlotStorage {
    slots: Mutex<HashMap<SlotName, String>>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots<I>(slots: I) -> Self
    where
        I: IntoIterator<Item = (SlotName, String)>,
    {
        Self {
            slots: Mutex::new(slots.into_iter().collect()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().map(|slots| slots.is_empty()).unwrap_or(true)
    }
}

impl EntitlementSlotRepository for MemorySlotStorage {
    fn load_slots(&self) -> Result<EntitlementSlotsEntity> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| anyhow!("memory slot storage lock poisoned"))?;

        let mut entity = EntitlementSlotsEntity::default();
        for slot in SlotName::ALL {
            entity.set(slot, slots.get(&slot).cloned());
        }
        Ok(entity)
    }

    fn write_slot(&self, slot: SlotName, value: &str) -> Result<()> {
        self.slots
            .lock()
            .map_err(|_| anyhow!("memory slot storage lock poisoned"))?
            .insert(slot, value.to_string());
        Ok(())
    }

    fn clear_slots(&self) -> Result<()> {
        self.slots
            .lock()
            .map_err(|_| anyhow!("memory slot storage lock poisoned"))?
            .clear();
        Ok(())
    }
}
