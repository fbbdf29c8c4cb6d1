pub mod entitlements;
pub mod plans;
