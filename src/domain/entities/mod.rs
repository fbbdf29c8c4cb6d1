pub mod entitlement_slots;
