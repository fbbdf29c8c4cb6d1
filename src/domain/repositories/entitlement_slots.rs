use anyhow::Result;
use mockall::automock;

use crate::domain::entities::entitlement_slots::EntitlementSlotsEntity;
use crate::domain::value_objects::enums::slot_names::SlotName;

/// Durable storage for the named entitlement slots. Writes overwrite; last writer wins.
#[automock]
pub trait EntitlementSlotRepository {
    fn load_slots(&self) -> Result<EntitlementSlotsEntity>;
    fn write_slot(&self, slot: SlotName, value: &str) -> Result<()>;
    fn clear_slots(&self) -> Result<()>;
}
