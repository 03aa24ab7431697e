use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

use crate::error::TokenError;

/// Gating policy applied to every balance movement
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TransferMode {
    /// Every movement is permitted
    Normal = 0,
    /// Every movement is rejected
    Restricted = 1,
    /// Only movements with the transfer controller as a party
    Controlled = 2,
}

impl TransferMode {
    /// Highest defined mode, also the most restrictive deployment posture
    pub const MAX: TransferMode = TransferMode::Controlled;

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TransferMode {
    type Error = TokenError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TransferMode::Normal),
            1 => Ok(TransferMode::Restricted),
            2 => Ok(TransferMode::Controlled),
            other => Err(TokenError::InvalidMode(other)),
        }
    }
}

impl From<TransferMode> for u8 {
    fn from(mode: TransferMode) -> Self {
        mode.as_u8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_decode_defined_values() {
        for mode in TransferMode::iter() {
            assert_eq!(TransferMode::try_from(mode.as_u8()), Ok(mode));
        }
        assert_eq!(TransferMode::MAX.as_u8(), 2);
    }

    #[test]
    fn test_decode_out_of_range() {
        for raw in 3..=u8::MAX {
            assert_eq!(TransferMode::try_from(raw), Err(TokenError::InvalidMode(raw)));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(TransferMode::Controlled.to_string(), "controlled");
        assert_eq!(TransferMode::Normal.as_ref(), "normal");
    }
}
