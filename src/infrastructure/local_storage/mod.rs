pub mod file_slots;
pub mod memory_slots;
