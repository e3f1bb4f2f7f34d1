use serde::{Deserialize, Serialize};

/// Which controller operation a status report refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Refresh,
    Create,
    Update,
    Delete,
}

/// Lifecycle of a single controller operation.
///
/// Each operation runs `Idle -> Pending -> {Succeeded, Failed}` and is
/// terminal on either outcome; there are no automatic retries. The controller
/// publishes the latest status through a `watch` channel for UI display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    Idle,
    Pending { kind: OperationKind },
    Succeeded { kind: OperationKind },
    Failed { kind: OperationKind, error: String },
}

impl OperationStatus {
    /// Whether an operation is currently in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Whether the last operation reached a terminal outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }
}

impl Default for OperationStatus {
    fn default() -> Self {
        Self::Idle
    }
}
