pub mod entitlements;
pub mod enums;
pub mod plans;
pub mod readings;
