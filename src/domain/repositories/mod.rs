pub mod entitlement_slots;
pub mod readings;
