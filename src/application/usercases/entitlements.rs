use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{
    clock::Clock,
    entities::entitlement_slots::EntitlementSlotsEntity,
    repositories::entitlement_slots::EntitlementSlotRepository,
    value_objects::{
        entitlements::{EntitlementAction, EntitlementSnapshotDto, EntitlementState},
        enums::purchase_tiers::PurchaseTier,
    },
};

/// Handle the HTTP layer and gated features share. One per running client session.
pub type SharedEntitlements<T, C> = Arc<Mutex<EntitlementUseCase<T, C>>>;

/// The entitlement store: owns the counters, derives access, and persists after each change.
///
/// Persistence is best effort. A failed write is logged and the in-memory state stays
/// authoritative for the rest of the session.
pub struct EntitlementUseCase<T, C>
where
    T: EntitlementSlotRepository + Send + Sync,
    C: Clock,
{
    slot_repository: Arc<T>,
    clock: Arc<C>,
    state: EntitlementState,
    show_paywall: bool,
}

impl<T, C> EntitlementUseCase<T, C>
where
    T: EntitlementSlotRepository + Send + Sync,
    C: Clock,
{
    /// Rehydrates from storage. Unreadable storage starts the session from defaults.
    pub fn new(slot_repository: Arc<T>, clock: Arc<C>) -> Self {
        let state = match slot_repository.load_slots() {
            Ok(slots) => EntitlementState::from(slots),
            Err(err) => {
                warn!(
                    storage_error = ?err,
                    "entitlements: failed to load persisted slots; starting from defaults"
                );
                EntitlementState::default()
            }
        };

        info!(
            usage_count = state.usage_count,
            extra_quota = state.extra_quota,
            vip_expiry = ?state.vip_expiry,
            "entitlements: state loaded"
        );

        Self {
            slot_repository,
            clock,
            state,
            show_paywall: false,
        }
    }

    pub fn into_shared(self) -> SharedEntitlements<T, C> {
        Arc::new(Mutex::new(self))
    }

    pub fn state(&self) -> EntitlementState {
        self.state
    }

    pub fn is_vip(&self) -> bool {
        self.state.is_vip(self.clock.now_millis())
    }

    /// Remaining quota clamped at zero for display.
    pub fn remaining_quota(&self) -> i64 {
        self.state.display_remaining_quota(self.clock.now_millis())
    }

    pub fn vip_expiry(&self) -> Option<i64> {
        self.state.vip_expiry
    }

    pub fn show_paywall(&self) -> bool {
        self.show_paywall
    }

    pub fn set_show_paywall(&mut self, visible: bool) {
        self.show_paywall = visible;
    }

    pub fn snapshot(&self) -> EntitlementSnapshotDto {
        EntitlementSnapshotDto::capture(&self.state, self.show_paywall, self.clock.now_millis())
    }

    /// Whether a privileged action may start. Never touches the counters; a refusal raises
    /// the paywall.
    pub fn check_access(&mut self) -> bool {
        let now = self.clock.now_millis();
        let access_state = self.state.access_state(now);
        if access_state.allows_access() {
            debug!(
                access_state = %access_state,
                remaining_quota = self.state.remaining_quota(now),
                "entitlements: access granted"
            );
            return true;
        }

        info!(
            usage_count = self.state.usage_count,
            extra_quota = self.state.extra_quota,
            "entitlements: quota exhausted; showing paywall"
        );
        self.show_paywall = true;
        false
    }

    /// Records one successful privileged action. Call only after the action completed.
    pub fn consume_quota(&mut self) {
        if self.transition(EntitlementAction::Consume) {
            info!(
                usage_count = self.state.usage_count,
                "entitlements: quota consumed"
            );
        } else {
            debug!("entitlements: vip window active; consumption not metered");
        }
    }

    pub fn purchase(&mut self, tier: PurchaseTier) {
        self.transition(EntitlementAction::Purchase(tier));
        self.show_paywall = false;

        info!(
            tier = %tier,
            extra_quota = self.state.extra_quota,
            vip_expiry = ?self.state.vip_expiry,
            "entitlements: purchase applied"
        );
    }

    pub fn purchase_single(&mut self) {
        self.purchase(PurchaseTier::Single);
    }

    pub fn purchase_weekly(&mut self) {
        self.purchase(PurchaseTier::Weekly);
    }

    pub fn purchase_monthly(&mut self) {
        self.purchase(PurchaseTier::Monthly);
    }

    /// Clears persisted slots and returns to a fresh state.
    pub fn reset(&mut self) {
        if let Err(err) = self.slot_repository.clear_slots() {
            warn!(
                storage_error = ?err,
                "entitlements: failed to clear persisted slots"
            );
        }

        self.state = EntitlementState::default();
        self.show_paywall = false;
        info!("entitlements: local data reset");
    }

    fn transition(&mut self, action: EntitlementAction) -> bool {
        let next = self.state.apply(action, self.clock.now_millis());
        if next == self.state {
            return false;
        }

        self.state = next;
        self.persist();
        true
    }

    fn persist(&self) {
        for (slot, value) in EntitlementSlotsEntity::encode(&self.state) {
            if let Err(err) = self.slot_repository.write_slot(slot, &value) {
                warn!(
                    slot = %slot,
                    storage_error = ?err,
                    "entitlements: failed to persist slot; keeping in-memory state"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        clock::testing::ManualClock,
        repositories::entitlement_slots::MockEntitlementSlotRepository,
        value_objects::enums::{access_states::AccessState, slot_names::SlotName},
    };
    use crate::infrastructure::local_storage::memory_slots::MemorySlotStorage;
    use anyhow::anyhow;
    use chrono::Duration;

    const NOW: i64 = 1_700_000_000_000;
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn fresh_store() -> (
        Arc<MemorySlotStorage>,
        Arc<ManualClock>,
        EntitlementUseCase<MemorySlotStorage, ManualClock>,
    ) {
        let storage = Arc::new(MemorySlotStorage::new());
        let clock = Arc::new(ManualClock::at(NOW));
        let store = EntitlementUseCase::new(Arc::clone(&storage), Arc::clone(&clock));
        (storage, clock, store)
    }

    #[test]
    fn free_allowance_runs_out_after_three_consumptions() {
        let (_, _, mut store) = fresh_store();

        for n in 0..3i64 {
            assert!(store.check_access());
            assert_eq!(store.state().remaining_quota(NOW), 3 - n);
            store.consume_quota();
        }

        assert_eq!(store.state().remaining_quota(NOW), 0);
        assert!(!store.check_access());
        assert!(store.show_paywall());
    }

    #[test]
    fn purchase_single_inside_a_vip_window_keeps_the_expiry() {
        let (storage, clock, mut store) = fresh_store();
        store.purchase_weekly();
        let expiry = store.vip_expiry();

        store.purchase_single();

        assert_eq!(store.state().extra_quota, 1);
        assert_eq!(store.vip_expiry(), expiry);
        assert_eq!(storage.load_slots().unwrap().extra.as_deref(), Some("1"));

        clock.advance(chrono::Duration::days(8));
        assert_eq!(store.remaining_quota(), 4);
    }

    #[test]
    fn documented_purchase_single_scenario() {
        let (_, _, mut store) = fresh_store();

        assert!(store.check_access());
        assert_eq!(store.remaining_quota(), 3);
        store.consume_quota();
        store.consume_quota();
        store.consume_quota();

        assert!(!store.check_access());
        assert!(store.show_paywall());

        store.purchase_single();
        assert!(!store.show_paywall());
        assert!(store.check_access());

        store.consume_quota();
        assert!(!store.check_access());
        assert_eq!(store.remaining_quota(), 0);
    }

    #[test]
    fn check_access_is_idempotent() {
        let (_, _, mut store) = fresh_store();
        store.consume_quota();
        let before = store.state();

        for _ in 0..5 {
            assert!(store.check_access());
        }

        assert_eq!(store.state(), before);
    }

    #[test]
    fn repeated_denials_leave_counters_untouched() {
        let (_, _, mut store) = fresh_store();
        for _ in 0..3 {
            store.consume_quota();
        }
        let before = store.state();

        for _ in 0..5 {
            assert!(!store.check_access());
        }

        assert_eq!(store.state(), before);
    }

    #[test]
    fn weekly_purchase_grants_access_until_the_window_closes() {
        let (_, clock, mut store) = fresh_store();
        for _ in 0..5 {
            store.consume_quota();
        }
        assert!(!store.check_access());

        store.purchase_weekly();

        assert!(store.is_vip());
        assert!(store.check_access());
        assert_eq!(store.vip_expiry(), Some(NOW + 7 * DAY_MS));
        assert_eq!(store.snapshot().access_state, AccessState::VipActive);

        clock.advance(Duration::days(7) + Duration::milliseconds(1));

        assert!(!store.is_vip());
        assert!(!store.check_access());
        assert_eq!(store.snapshot().access_state, AccessState::FreeExhausted);
    }

    #[test]
    fn expired_window_with_unused_allowance_returns_to_free_quota() {
        let (_, clock, mut store) = fresh_store();
        store.consume_quota();
        store.purchase_weekly();

        clock.advance(Duration::days(8));

        assert!(!store.is_vip());
        assert!(store.check_access());
        assert_eq!(store.remaining_quota(), 2);
    }

    #[test]
    fn monthly_after_weekly_overwrites_the_expiry() {
        let (_, _, mut store) = fresh_store();

        store.purchase_weekly();
        store.purchase_monthly();

        assert_eq!(store.vip_expiry(), Some(NOW + 30 * DAY_MS));
    }

    #[test]
    fn consumption_while_vip_does_not_count() {
        let (_, _, mut store) = fresh_store();
        store.consume_quota();
        store.purchase_monthly();

        store.consume_quota();
        store.consume_quota();

        assert_eq!(store.state().usage_count, 1);
        assert_eq!(store.remaining_quota(), 9999);
    }

    #[test]
    fn paywall_flag_can_be_dismissed_without_purchase() {
        let (_, _, mut store) = fresh_store();
        for _ in 0..3 {
            store.consume_quota();
        }
        assert!(!store.check_access());

        store.set_show_paywall(false);

        assert!(!store.show_paywall());
        assert_eq!(store.state().usage_count, 3);
    }

    #[test]
    fn reloaded_store_reproduces_persisted_state() {
        let (storage, clock, mut store) = fresh_store();
        store.consume_quota();
        store.consume_quota();
        store.purchase_single();
        store.purchase_weekly();
        let persisted = store.state();

        let reloaded = EntitlementUseCase::new(storage, clock);

        assert_eq!(reloaded.state(), persisted);
        assert!(!reloaded.show_paywall());
    }

    #[test]
    fn reset_clears_storage_and_state() {
        let (storage, clock, mut store) = fresh_store();
        store.consume_quota();
        store.purchase_monthly();

        store.reset();

        assert_eq!(store.state(), EntitlementState::default());
        assert!(storage.is_empty());
        let reloaded = EntitlementUseCase::new(storage, clock);
        assert_eq!(reloaded.state(), EntitlementState::default());
    }

    #[test]
    fn writes_usage_and_extra_but_not_an_absent_vip_slot() {
        let mut slot_repo = MockEntitlementSlotRepository::new();
        slot_repo
            .expect_load_slots()
            .returning(|| Ok(EntitlementSlotsEntity::default()));
        slot_repo
            .expect_write_slot()
            .withf(|slot, value| *slot == SlotName::Usage && value == "1")
            .times(1)
            .returning(|_, _| Ok(()));
        slot_repo
            .expect_write_slot()
            .withf(|slot, value| *slot == SlotName::Extra && value == "0")
            .times(1)
            .returning(|_, _| Ok(()));
        slot_repo
            .expect_write_slot()
            .withf(|slot, _| *slot == SlotName::Vip)
            .never();

        let mut store =
            EntitlementUseCase::new(Arc::new(slot_repo), Arc::new(ManualClock::at(NOW)));

        store.consume_quota();
    }

    #[test]
    fn vip_consumption_writes_nothing() {
        let mut slot_repo = MockEntitlementSlotRepository::new();
        slot_repo.expect_load_slots().returning(|| {
            Ok(EntitlementSlotsEntity {
                vip: Some((NOW + DAY_MS).to_string()),
                ..Default::default()
            })
        });
        slot_repo.expect_write_slot().never();

        let mut store =
            EntitlementUseCase::new(Arc::new(slot_repo), Arc::new(ManualClock::at(NOW)));

        store.consume_quota();
        assert_eq!(store.state().usage_count, 0);
    }

    #[test]
    fn failed_writes_keep_in_memory_state() {
        let mut slot_repo = MockEntitlementSlotRepository::new();
        slot_repo
            .expect_load_slots()
            .returning(|| Ok(EntitlementSlotsEntity::default()));
        slot_repo
            .expect_write_slot()
            .returning(|_, _| Err(anyhow!("storage quota exceeded")));

        let mut store =
            EntitlementUseCase::new(Arc::new(slot_repo), Arc::new(ManualClock::at(NOW)));

        store.consume_quota();
        store.purchase_single();

        assert_eq!(store.state().usage_count, 1);
        assert_eq!(store.state().extra_quota, 1);
        assert!(store.check_access());
    }

    #[test]
    fn unreadable_storage_starts_from_defaults() {
        let mut slot_repo = MockEntitlementSlotRepository::new();
        slot_repo
            .expect_load_slots()
            .returning(|| Err(anyhow!("storage unavailable")));

        let store = EntitlementUseCase::new(Arc::new(slot_repo), Arc::new(ManualClock::at(NOW)));

        assert_eq!(store.state(), EntitlementState::default());
        assert_eq!(store.remaining_quota(), 3);
    }
}
