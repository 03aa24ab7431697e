//! Slot-addressed persistent storage
//!
//! Storage is a flat map from 32-byte slots to byte values, the same shape as
//! contract storage on chain. Records never pick their own slots: each one
//! lives in a slot family derived by the [`locator`] from a namespace string,
//! so replacing the code that reads them does not move them.
//!
//! Scalars are kept as 32-byte big-endian words. Writing a zero word removes
//! the slot, which keeps "never written" and "reset" indistinguishable.

mod locator;
mod overlay;

pub use locator::*;
pub use overlay::*;

use indexmap::IndexMap;
use primitive_types::U256;

use crate::Amount;
use crate::crypto::{keccak256_concat, Address, Hash, ADDRESS_SIZE, HASH_SIZE};

/// A 32-byte storage word
pub type Word = [u8; HASH_SIZE];

/// Read access to slot storage
pub trait StorageProvider {
    /// Raw bytes at a slot, `None` when never written or deleted
    fn load(&self, slot: &Hash) -> Option<&[u8]>;

    fn load_word(&self, slot: &Hash) -> Word {
        let mut word = [0u8; HASH_SIZE];
        if let Some(value) = self.load(slot) {
            if value.len() == HASH_SIZE {
                word.copy_from_slice(value);
            }
        }
        word
    }

    fn load_amount(&self, slot: &Hash) -> Amount {
        U256::from_big_endian(&self.load_word(slot)).low_u64()
    }

    fn load_bool(&self, slot: &Hash) -> bool {
        self.load_word(slot)[HASH_SIZE - 1] != 0
    }

    fn load_address(&self, slot: &Hash) -> Address {
        word_to_address(&self.load_word(slot))
    }

    fn load_bytes(&self, slot: &Hash) -> Vec<u8> {
        self.load(slot).map(|v| v.to_vec()).unwrap_or_default()
    }
}

/// Write access to slot storage
pub trait StorageWriter: StorageProvider {
    fn store(&mut self, slot: Hash, value: Vec<u8>);

    fn delete(&mut self, slot: &Hash);

    fn store_word(&mut self, slot: Hash, word: Word) {
        if word.iter().all(|b| *b == 0) {
            self.delete(&slot);
        } else {
            self.store(slot, word.to_vec());
        }
    }

    fn store_amount(&mut self, slot: Hash, value: Amount) {
        self.store_word(slot, U256::from(value).to_big_endian());
    }

    fn store_bool(&mut self, slot: Hash, value: bool) {
        let mut word = [0u8; HASH_SIZE];
        word[HASH_SIZE - 1] = value as u8;
        self.store_word(slot, word);
    }

    fn store_address(&mut self, slot: Hash, address: &Address) {
        self.store_word(slot, address.to_word());
    }

    fn store_bytes(&mut self, slot: Hash, bytes: &[u8]) {
        if bytes.is_empty() {
            self.delete(&slot);
        } else {
            self.store(slot, bytes.to_vec());
        }
    }
}

/// Read the address packed in the low 20 bytes of a word
pub fn word_to_address(word: &Word) -> Address {
    let mut bytes = [0u8; ADDRESS_SIZE];
    bytes.copy_from_slice(&word[HASH_SIZE - ADDRESS_SIZE..]);
    Address::new(bytes)
}

/// `base + offset`, the slot of the n-th field in a slot family
pub fn slot_offset(base: &Hash, offset: u64) -> Hash {
    let (slot, _) = U256::from_big_endian(base.as_bytes()).overflowing_add(U256::from(offset));
    Hash::new(slot.to_big_endian())
}

/// Slot of `mapping[key]` for a mapping declared at `slot`
pub fn mapping_slot(slot: &Hash, key: &Word) -> Hash {
    keccak256_concat(&[key, slot.as_bytes()])
}

/// Committed storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Storage {
    entries: IndexMap<Hash, Vec<u8>>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Hash, &Vec<u8>)> {
        self.entries.iter()
    }

    /// Merge a set of pending changes, `None` removes the slot
    pub fn apply(&mut self, changes: IndexMap<Hash, Option<Vec<u8>>>) {
        for (slot, value) in changes {
            match value {
                Some(value) => {
                    self.entries.insert(slot, value);
                }
                None => {
                    self.entries.shift_remove(&slot);
                }
            }
        }
    }
}

impl StorageProvider for Storage {
    fn load(&self, slot: &Hash) -> Option<&[u8]> {
        self.entries.get(slot).map(|v| v.as_slice())
    }
}

impl StorageWriter for Storage {
    fn store(&mut self, slot: Hash, value: Vec<u8>) {
        self.entries.insert(slot, value);
    }

    fn delete(&mut self, slot: &Hash) {
        self.entries.shift_remove(slot);
    }
}
