//! Role-based access control
//!
//! Membership lives in its own namespace with the standard layout:
//!
//! ```text
//! base = locate("openzeppelin.storage.AccessControl")
//! role data   = keccak256(role ‖ base)
//! has_role    = keccak256(account ‖ role data)   (bool word)
//! admin role  = role data + 1                    (role id word)
//! ```
//!
//! Consumers only see the [`AccessControl`] capability; writes go through
//! [`AccessControlRecord`] from the call dispatch layer.

mod roles;

pub use roles::*;

use log::debug;

use crate::config::ACCESS_CONTROL_NAMESPACE;
use crate::crypto::{Address, Hash};
use crate::storage::{mapping_slot, slot_offset, NamespacedRecord, StorageProvider, StorageWriter};

/// Read-only role capability injected into components that gate on roles
pub trait AccessControl {
    fn has_role(&self, role: &RoleId, account: &Address) -> bool;

    /// Role whose holders may grant and revoke `role`
    fn role_admin(&self, role: &RoleId) -> RoleId;
}

/// Storage record of role membership
pub struct AccessControlRecord;

impl NamespacedRecord for AccessControlRecord {
    const NAMESPACE: &'static str = ACCESS_CONTROL_NAMESPACE;
}

impl AccessControlRecord {
    fn role_slot(role: &RoleId) -> Hash {
        mapping_slot(&Self::location(), role.as_bytes())
    }

    fn member_slot(role: &RoleId, account: &Address) -> Hash {
        mapping_slot(&Self::role_slot(role), &account.to_word())
    }

    fn admin_slot(role: &RoleId) -> Hash {
        slot_offset(&Self::role_slot(role), 1)
    }

    pub fn has_role<S: StorageProvider + ?Sized>(
        storage: &S,
        role: &RoleId,
        account: &Address,
    ) -> bool {
        storage.load_bool(&Self::member_slot(role, account))
    }

    pub fn role_admin<S: StorageProvider + ?Sized>(storage: &S, role: &RoleId) -> RoleId {
        Hash::new(storage.load_word(&Self::admin_slot(role)))
    }

    pub fn set_role_admin<S: StorageWriter + ?Sized>(
        storage: &mut S,
        role: &RoleId,
        admin: &RoleId,
    ) {
        storage.store_word(Self::admin_slot(role), admin.to_bytes());
    }

    /// Returns false when the account already held the role
    pub fn grant_role<S: StorageWriter + ?Sized>(
        storage: &mut S,
        role: &RoleId,
        account: &Address,
    ) -> bool {
        if Self::has_role(storage, role, account) {
            return false;
        }
        debug!("grant {} to {}", role, account);
        storage.store_bool(Self::member_slot(role, account), true);
        true
    }

    /// Returns false when the account did not hold the role
    pub fn revoke_role<S: StorageWriter + ?Sized>(
        storage: &mut S,
        role: &RoleId,
        account: &Address,
    ) -> bool {
        if !Self::has_role(storage, role, account) {
            return false;
        }
        debug!("revoke {} from {}", role, account);
        storage.store_bool(Self::member_slot(role, account), false);
        true
    }
}

/// [`AccessControl`] view over any storage
pub struct RoleStore<'a, S: ?Sized> {
    storage: &'a S,
}

impl<'a, S: StorageProvider + ?Sized> RoleStore<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }
}

impl<S: StorageProvider + ?Sized> AccessControl for RoleStore<'_, S> {
    fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        AccessControlRecord::has_role(self.storage, role, account)
    }

    fn role_admin(&self, role: &RoleId) -> RoleId {
        AccessControlRecord::role_admin(self.storage, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ACCESS_CONTROL_LOCATION;
    use crate::storage::Storage;

    #[test]
    fn test_grant_and_revoke() {
        let mut storage = Storage::new();
        let alice = Address::repeat_byte(0xa1);

        assert!(AccessControlRecord::grant_role(&mut storage, &MINTER_ROLE, &alice));
        assert!(!AccessControlRecord::grant_role(&mut storage, &MINTER_ROLE, &alice));
        assert!(RoleStore::new(&storage).has_role(&MINTER_ROLE, &alice));
        assert!(!RoleStore::new(&storage).has_role(&ADMIN_ROLE, &alice));

        assert!(AccessControlRecord::revoke_role(&mut storage, &MINTER_ROLE, &alice));
        assert!(!AccessControlRecord::revoke_role(&mut storage, &MINTER_ROLE, &alice));
        assert!(!RoleStore::new(&storage).has_role(&MINTER_ROLE, &alice));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_role_admin_defaults_to_root() {
        let storage = Storage::new();
        let view = RoleStore::new(&storage);
        assert_eq!(view.role_admin(&MINTER_ROLE), ROOT_ROLE);
        assert_eq!(view.role_admin(&ROOT_ROLE), ROOT_ROLE);
    }

    #[test]
    fn test_set_role_admin() {
        let mut storage = Storage::new();
        AccessControlRecord::set_role_admin(&mut storage, &MINTER_ROLE, &ADMIN_ROLE);
        assert_eq!(RoleStore::new(&storage).role_admin(&MINTER_ROLE), ADMIN_ROLE);
    }

    #[test]
    fn test_membership_slot_layout() {
        let account = Address::repeat_byte(0x42);
        let base: Hash = ACCESS_CONTROL_LOCATION.parse().unwrap();
        let role_data = mapping_slot(&base, MINTER_ROLE.as_bytes());
        let expected = mapping_slot(&role_data, &account.to_word());

        let mut storage = Storage::new();
        AccessControlRecord::grant_role(&mut storage, &MINTER_ROLE, &account);
        assert!(storage.load_bool(&expected));
    }
}
