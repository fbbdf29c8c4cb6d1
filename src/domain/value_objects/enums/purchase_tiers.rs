use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseTier {
    Single,
    Weekly,
    Monthly,
}

impl PurchaseTier {
    pub const ALL: [PurchaseTier; 3] = [
        PurchaseTier::Single,
        PurchaseTier::Weekly,
        PurchaseTier::Monthly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseTier::Single => "single",
            PurchaseTier::Weekly => "weekly",
            PurchaseTier::Monthly => "monthly",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Some(PurchaseTier::Single),
            "weekly" => Some(PurchaseTier::Weekly),
            "monthly" => Some(PurchaseTier::Monthly),
            _ => None,
        }
    }

    /// Length of the VIP window this tier opens. `None` for one-off unlocks.
    pub fn vip_window_days(&self) -> Option<i64> {
        match self {
            PurchaseTier::Single => None,
            PurchaseTier::Weekly => Some(7),
            PurchaseTier::Monthly => Some(30),
        }
    }
}

impl Display for PurchaseTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tier_names_case_insensitively() {
        assert_eq!(PurchaseTier::from_str("Weekly"), Some(PurchaseTier::Weekly));
        assert_eq!(PurchaseTier::from_str(" monthly "), Some(PurchaseTier::Monthly));
        assert_eq!(PurchaseTier::from_str("yearly"), None);
    }

    #[test]
    fn only_time_boxed_tiers_open_a_vip_window() {
        assert_eq!(PurchaseTier::Single.vip_window_days(), None);
        assert_eq!(PurchaseTier::Weekly.vip_window_days(), Some(7));
        assert_eq!(PurchaseTier::Monthly.vip_window_days(), Some(30));
    }
}
