use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Privileged features that spend entitlement on success.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadingKind {
    Bazi,
    Tarot,
    Palm,
    Face,
    FengShui,
}

impl ReadingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingKind::Bazi => "bazi",
            ReadingKind::Tarot => "tarot",
            ReadingKind::Palm => "palm",
            ReadingKind::Face => "face",
            ReadingKind::FengShui => "feng_shui",
        }
    }

    pub fn is_vision(&self) -> bool {
        matches!(
            self,
            ReadingKind::Palm | ReadingKind::Face | ReadingKind::FengShui
        )
    }
}

impl Display for ReadingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
