use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::reading_kinds::ReadingKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadingRequest {
    pub kind: ReadingKind,
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadingResult {
    pub kind: ReadingKind,
    pub markdown: String,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

impl ReadingResult {
    /// Blank output is treated like a failed generation and never spends quota.
    pub fn is_usable(&self) -> bool {
        !self.markdown.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReadingOutcome {
    Completed(ReadingResult),
    /// Access was refused and the paywall raised; the gateway was never called.
    Denied,
}
