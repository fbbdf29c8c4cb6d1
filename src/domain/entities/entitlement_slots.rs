use tracing::warn;

use crate::domain::value_objects::{
    entitlements::EntitlementState, enums::slot_names::SlotName,
};

/// Raw slot contents as read from storage. A `None` slot was never written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitlementSlotsEntity {
    pub usage: Option<String>,
    pub extra: Option<String>,
    pub vip: Option<String>,
}

impl EntitlementSlotsEntity {
    pub fn get(&self, slot: SlotName) -> Option<&str> {
        match slot {
            SlotName::Usage => self.usage.as_deref(),
            SlotName::Extra => self.extra.as_deref(),
            SlotName::Vip => self.vip.as_deref(),
        }
    }

    pub fn set(&mut self, slot: SlotName, value: Option<String>) {
        match slot {
            SlotName::Usage => self.usage = value,
            SlotName::Extra => self.extra = value,
            SlotName::Vip => self.vip = value,
        }
    }

    /// Slot writes for `state`. The VIP slot is only written once a window has been bought.
    pub fn encode(state: &EntitlementState) -> Vec<(SlotName, String)> {
        let mut writes = vec![
            (SlotName::Usage, state.usage_count.to_string()),
            (SlotName::Extra, state.extra_quota.to_string()),
        ];
        if let Some(expiry) = state.vip_expiry {
            writes.push((SlotName::Vip, expiry.to_string()));
        }
        writes
    }
}

impl From<EntitlementSlotsEntity> for EntitlementState {
    fn from(value: EntitlementSlotsEntity) -> Self {
        Self {
            usage_count: decode_slot(SlotName::Usage, value.usage.as_deref()).unwrap_or_default(),
            extra_quota: decode_slot(SlotName::Extra, value.extra.as_deref()).unwrap_or_default(),
            vip_expiry: decode_slot(SlotName::Vip, value.vip.as_deref()),
        }
    }
}

fn decode_slot<N: std::str::FromStr>(slot: SlotName, raw: Option<&str>) -> Option<N> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    match raw.parse::<N>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                slot = %slot,
                raw_value = raw,
                "entitlements: unreadable slot value; using default"
            );
            None
        }
    }
}
