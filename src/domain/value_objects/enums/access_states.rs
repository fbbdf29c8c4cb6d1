use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    #[default]
    FreeWithQuota,
    FreeExhausted,
    VipActive,
}

impl AccessState {
    pub fn allows_access(&self) -> bool {
        !matches!(self, AccessState::FreeExhausted)
    }
}

impl Display for AccessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self {
            AccessState::FreeWithQuota => "free_with_quota",
            AccessState::FreeExhausted => "free_exhausted",
            AccessState::VipActive => "vip_active",
        };
        write!(f, "{}", state)
    }
}
