pub mod entitlements;
pub mod readings;
