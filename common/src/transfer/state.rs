use serde::{Deserialize, Serialize};

use super::TransferMode;
use crate::config::TRANSFER_CONTROL_NAMESPACE;
use crate::crypto::{Address, ADDRESS_SIZE, HASH_SIZE};
use crate::error::TokenError;
use crate::storage::{word_to_address, NamespacedRecord, StorageProvider, StorageWriter, Word};

// Packed like the on-chain struct: the controller takes the low 20 bytes,
// the mode sits in the byte right above it.
const MODE_BYTE: usize = HASH_SIZE - ADDRESS_SIZE - 1;

/// Persistent state of the transfer gate
///
/// One word at the base slot of `tollgate.storage.TransferControl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleState {
    pub transfer_controller: Address,
    pub transfer_mode: TransferMode,
}

impl Default for ModuleState {
    fn default() -> Self {
        Self {
            transfer_controller: Address::ZERO,
            transfer_mode: TransferMode::Normal,
        }
    }
}

impl NamespacedRecord for ModuleState {
    const NAMESPACE: &'static str = TRANSFER_CONTROL_NAMESPACE;
}

impl ModuleState {
    pub fn to_word(&self) -> Word {
        let mut word = self.transfer_controller.to_word();
        word[MODE_BYTE] = self.transfer_mode.as_u8();
        word
    }

    pub fn from_word(word: &Word) -> Result<Self, TokenError> {
        Ok(Self {
            transfer_controller: word_to_address(word),
            transfer_mode: TransferMode::try_from(word[MODE_BYTE])?,
        })
    }

    pub fn load<S: StorageProvider + ?Sized>(storage: &S) -> Result<Self, TokenError> {
        Self::from_word(&storage.load_word(&Self::location()))
    }

    pub fn store<S: StorageWriter + ?Sized>(&self, storage: &mut S) {
        storage.store_word(Self::location(), self.to_word());
    }
}
