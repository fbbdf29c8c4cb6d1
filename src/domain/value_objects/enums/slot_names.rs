use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Named storage slots holding the persisted entitlement counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SlotName {
    Usage,
    Extra,
    Vip,
}

impl SlotName {
    pub const ALL: [SlotName; 3] = [SlotName::Usage, SlotName::Extra, SlotName::Vip];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotName::Usage => "lingji_usage",
            SlotName::Extra => "lingji_extra",
            SlotName::Vip => "lingji_vip",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "lingji_usage" => Some(SlotName::Usage),
            "lingji_extra" => Some(SlotName::Extra),
            "lingji_vip" => Some(SlotName::Vip),
            _ => None,
        }
    }
}

impl Display for SlotName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
