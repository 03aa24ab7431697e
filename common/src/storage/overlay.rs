use indexmap::IndexMap;

use super::{Storage, StorageProvider, StorageWriter};
use crate::crypto::Hash;

/// Pending writes on top of committed storage
///
/// Reads see pending writes first, then fall through to the base. A
/// `None` entry is a tombstone hiding the committed value. The overlay is
/// merged into storage only when a call succeeds; on failure it is dropped.
#[derive(Debug)]
pub struct StorageOverlay<'a> {
    base: &'a Storage,
    changes: IndexMap<Hash, Option<Vec<u8>>>,
}

impl<'a> StorageOverlay<'a> {
    pub fn new(base: &'a Storage) -> Self {
        Self {
            base,
            changes: IndexMap::new(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Number of touched slots
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn into_changes(self) -> IndexMap<Hash, Option<Vec<u8>>> {
        self.changes
    }
}

impl StorageProvider for StorageOverlay<'_> {
    fn load(&self, slot: &Hash) -> Option<&[u8]> {
        match self.changes.get(slot) {
            Some(Some(value)) => Some(value.as_slice()),
            Some(None) => None,
            None => self.base.load(slot),
        }
    }
}

impl StorageWriter for StorageOverlay<'_> {
    fn store(&mut self, slot: Hash, value: Vec<u8>) {
        self.changes.insert(slot, Some(value));
    }

    fn delete(&mut self, slot: &Hash) {
        self.changes.insert(*slot, None);
    }
}
