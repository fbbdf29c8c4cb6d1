pub mod access_states;
pub mod purchase_tiers;
pub mod reading_kinds;
pub mod slot_names;
