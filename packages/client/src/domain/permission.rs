//! Desktop notification permission state.

use serde::{Deserialize, Serialize};

/// Permission to raise desktop notifications.
///
/// `Default` moves to `Granted` or `Denied` only through the user's answer to
/// a permission prompt. `Unsupported` means the capability is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Default,
    Granted,
    Denied,
    Unsupported,
}

impl PermissionState {
    /// Whether a prompt may be shown
    pub fn can_prompt(&self) -> bool {
        *self == Self::Default
    }

    pub fn is_granted(&self) -> bool {
        *self == Self::Granted
    }
}
