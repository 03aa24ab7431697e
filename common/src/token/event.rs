use serde::{Deserialize, Serialize};

use crate::access::RoleId;
use crate::crypto::Address;
use crate::transfer::TransferMode;
use crate::Amount;

/// Notifications emitted by successful calls
///
/// Events of a call are only published when the whole call commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TokenEvent {
    Initialized {
        version: u64,
    },
    Transfer {
        from: Address,
        to: Address,
        value: Amount,
    },
    Approval {
        owner: Address,
        spender: Address,
        value: Amount,
    },
    Paused {
        account: Address,
    },
    Unpaused {
        account: Address,
    },
    RoleGranted {
        role: RoleId,
        account: Address,
        sender: Address,
    },
    RoleRevoked {
        role: RoleId,
        account: Address,
        sender: Address,
    },
    TransferModeChanged {
        old_mode: TransferMode,
        new_mode: TransferMode,
    },
    TransferControllerChanged {
        old_controller: Address,
        new_controller: Address,
    },
    Upgraded {
        implementation: Address,
    },
}

impl TokenEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Initialized { .. } => "initialized",
            Self::Transfer { .. } => "transfer",
            Self::Approval { .. } => "approval",
            Self::Paused { .. } => "paused",
            Self::Unpaused { .. } => "unpaused",
            Self::RoleGranted { .. } => "role_granted",
            Self::RoleRevoked { .. } => "role_revoked",
            Self::TransferModeChanged { .. } => "transfer_mode_changed",
            Self::TransferControllerChanged { .. } => "transfer_controller_changed",
            Self::Upgraded { .. } => "upgraded",
        }
    }
}
