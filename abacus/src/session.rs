//! Per-session calculator state

use crate::history::Ledger;
use abacus_core::AngleMode;

/// Everything one calculator session remembers. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub mode: AngleMode,
    /// Result currently on display
    pub result: Option<String>,
    /// User-facing error currently on display
    pub error: Option<String>,
    /// Most recent successful result, inserted by the `ans` key
    pub last_result: Option<String>,
    pub history: Ledger,
}

impl Session {
    pub fn new(mode: AngleMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}
