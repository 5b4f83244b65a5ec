//! Scan lifecycle states.

use std::fmt;

/// Where a scan is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    PolicyCheck,
    Denied,
    Fetching,
    Retrying,
    Fetched,
    Failed,
    Extracting,
    Extracted,
}

impl ScanState {
    /// Terminal states end the scan.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ScanState::Denied | ScanState::Failed | ScanState::Extracted
        )
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: ScanState) -> bool {
        use ScanState::*;
        matches!(
            (self, next),
            (Idle, PolicyCheck)
                | (Idle, Failed)
                | (PolicyCheck, Denied)
                | (PolicyCheck, Fetching)
                | (PolicyCheck, Failed)
                | (Fetching, Retrying)
                | (Fetching, Fetched)
                | (Fetching, Failed)
                | (Retrying, Fetching)
                | (Fetched, Extracting)
                | (Extracting, Extracted)
                | (Extracting, Failed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScanState::Idle => "idle",
            ScanState::PolicyCheck => "policy-check",
            ScanState::Denied => "denied",
            ScanState::Fetching => "fetching",
            ScanState::Retrying => "retrying",
            ScanState::Fetched => "fetched",
            ScanState::Failed => "failed",
            ScanState::Extracting => "extracting",
            ScanState::Extracted => "extracted",
        }
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
