use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::purchase_tiers::PurchaseTier;

/// A purchasable offer as shown on the paywall. Prices are in fen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanDto {
    pub tier: PurchaseTier,
    pub name: String,
    pub description: String,
    pub price_minor: i32,
    pub list_price_minor: Option<i32>,
    pub duration_days: Option<i64>,
    pub most_popular: bool,
}

impl From<PurchaseTier> for PlanDto {
    fn from(tier: PurchaseTier) -> Self {
        let (name, description, price_minor, list_price_minor) = match tier {
            PurchaseTier::Single => ("单次解锁", "本次咨询深度解读", 990, None),
            PurchaseTier::Weekly => ("七日周卡", "无限次畅享所有功能", 1990, Some(2990)),
            PurchaseTier::Monthly => ("尊贵月卡", "30天全解锁 · 超值之选", 4990, None),
        };

        Self {
            tier,
            name: name.to_string(),
            description: description.to_string(),
            price_minor,
            list_price_minor,
            duration_days: tier.vip_window_days(),
            most_popular: tier == PurchaseTier::Weekly,
        }
    }
}

pub fn plan_catalogue() -> Vec<PlanDto> {
    PurchaseTier::ALL.into_iter().map(PlanDto::from).collect()
}
