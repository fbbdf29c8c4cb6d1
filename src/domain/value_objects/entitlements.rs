use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::{
    access_states::AccessState, purchase_tiers::PurchaseTier,
};

/// Uses every profile gets before any purchase.
pub const MAX_FREE_USES: u64 = 3;

/// Reported as the remaining quota while a VIP window is open.
pub const UNLIMITED_QUOTA: i64 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitlementAction {
    Consume,
    Purchase(PurchaseTier),
}

/// Persisted entitlement counters. Everything else is derived from these and the current time.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntitlementState {
    pub usage_count: u64,
    pub extra_quota: u64,
    /// End of the VIP window in epoch milliseconds.
    pub vip_expiry: Option<i64>,
}

impl EntitlementState {
    pub fn is_vip(&self, now_ms: i64) -> bool {
        self.vip_expiry.is_some_and(|expiry| expiry > now_ms)
    }

    /// Pooled allowance left, unclamped. Free uses and purchased unlocks share one ceiling
    /// that `usage_count` is measured against; purchased unlocks are never spent individually.
    pub fn remaining_quota(&self, now_ms: i64) -> i64 {
        if self.is_vip(now_ms) {
            return UNLIMITED_QUOTA;
        }

        let ceiling = to_i64(MAX_FREE_USES.saturating_add(self.extra_quota));
        ceiling.saturating_sub(to_i64(self.usage_count))
    }

    pub fn display_remaining_quota(&self, now_ms: i64) -> i64 {
        self.remaining_quota(now_ms).max(0)
    }

    pub fn free_remaining(&self) -> u64 {
        MAX_FREE_USES.saturating_sub(self.usage_count)
    }

    pub fn access_state(&self, now_ms: i64) -> AccessState {
        if self.is_vip(now_ms) {
            AccessState::VipActive
        } else if self.remaining_quota(now_ms) > 0 {
            AccessState::FreeWithQuota
        } else {
            AccessState::FreeExhausted
        }
    }

    pub fn vip_expires_at(&self) -> Option<DateTime<Utc>> {
        self.vip_expiry
            .and_then(|expiry| Utc.timestamp_millis_opt(expiry).single())
    }

    /// Next state after `action` at `now_ms`.
    ///
    /// Consumption is not metered inside a VIP window. A time-boxed purchase replaces any
    /// existing window instead of extending it.
    pub fn apply(self, action: EntitlementAction, now_ms: i64) -> Self {
        match action {
            EntitlementAction::Consume if self.is_vip(now_ms) => self,
            EntitlementAction::Consume => Self {
                usage_count: self.usage_count.saturating_add(1),
                ..self
            },
            EntitlementAction::Purchase(tier) => match tier.vip_window_days() {
                None => Self {
                    extra_quota: self.extra_quota.saturating_add(1),
                    ..self
                },
                Some(days) => Self {
                    vip_expiry: Some(now_ms.saturating_add(Duration::days(days).num_milliseconds())),
                    ..self
                },
            },
        }
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// What the presentation layer renders: derived access rights plus the paywall flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntitlementSnapshotDto {
    pub usage_count: u64,
    pub max_free: u64,
    pub extra_quota: u64,
    pub vip_expiry: Option<i64>,
    pub vip_expires_at: Option<DateTime<Utc>>,
    pub is_vip: bool,
    pub remaining_quota: i64,
    pub free_remaining: u64,
    pub access_state: AccessState,
    pub show_paywall: bool,
}

impl EntitlementSnapshotDto {
    pub fn capture(state: &EntitlementState, show_paywall: bool, now_ms: i64) -> Self {
        Self {
            usage_count: state.usage_count,
            max_free: MAX_FREE_USES,
            extra_quota: state.extra_quota,
            vip_expiry: state.vip_expiry,
            vip_expires_at: state.vip_expires_at(),
            is_vip: state.is_vip(now_ms),
            remaining_quota: state.display_remaining_quota(now_ms),
            free_remaining: state.free_remaining(),
            access_state: state.access_state(now_ms),
            show_paywall,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessCheckDto {
    pub allowed: bool,
    pub snapshot: EntitlementSnapshotDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseModel {
    pub tier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaywallModel {
    pub visible: bool,
}
