use serde::{Deserialize, Serialize};

use crate::access::RoleId;
use crate::crypto::Address;
use crate::Amount;

/// A single token operation, as submitted by a caller
///
/// Calls are plain data so they can be scripted, replayed from JSON and
/// returned by transfer hooks as nested calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    Initialize {
        name: String,
        symbol: String,
    },
    Mint {
        to: Address,
        amount: Amount,
    },
    Burn {
        amount: Amount,
    },
    Transfer {
        to: Address,
        amount: Amount,
    },
    Approve {
        spender: Address,
        amount: Amount,
    },
    TransferFrom {
        from: Address,
        to: Address,
        amount: Amount,
    },
    Pause,
    Unpause,
    SetTransferController {
        controller: Address,
    },
    /// Raw mode byte, decoded by the transfer gate
    SetTransferMode {
        mode: u8,
    },
    GrantRole {
        #[serde(with = "role")]
        role: RoleId,
        account: Address,
    },
    RevokeRole {
        #[serde(with = "role")]
        role: RoleId,
        account: Address,
    },
    RenounceRole {
        #[serde(with = "role")]
        role: RoleId,
        confirmation: Address,
    },
}

impl Call {
    /// Calls that run under the reentrancy guard
    pub fn is_guarded(&self) -> bool {
        matches!(self, Call::Mint { .. } | Call::Burn { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Call::Initialize { .. } => "initialize",
            Call::Mint { .. } => "mint",
            Call::Burn { .. } => "burn",
            Call::Transfer { .. } => "transfer",
            Call::Approve { .. } => "approve",
            Call::TransferFrom { .. } => "transfer_from",
            Call::Pause => "pause",
            Call::Unpause => "unpause",
            Call::SetTransferController { .. } => "set_transfer_controller",
            Call::SetTransferMode { .. } => "set_transfer_mode",
            Call::GrantRole { .. } => "grant_role",
            Call::RevokeRole { .. } => "revoke_role",
            Call::RenounceRole { .. } => "renounce_role",
        }
    }
}

// Roles are written as hex ids and read back from either a hex id or a
// predefined role name ("minter", "ADMIN_ROLE", ...)
mod role {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::access::{parse_role, RoleId};

    pub fn serialize<S: Serializer>(role: &RoleId, serializer: S) -> Result<S::Ok, S::Error> {
        role.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RoleId, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse_role(&value).ok_or_else(|| D::Error::custom(format!("unknown role: {}", value)))
    }
}
