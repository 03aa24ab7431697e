//! Token ledger records
//!
//! Balances, allowances, supply and metadata use the standard fungible
//! token layout under `openzeppelin.storage.ERC20`:
//!
//! | offset | field                                  |
//! |--------|----------------------------------------|
//! | 0      | `balances[account]`                    |
//! | 1      | `allowances[owner][spender]`           |
//! | 2      | `total_supply`                         |
//! | 3      | `name` (raw bytes)                     |
//! | 4      | `symbol` (raw bytes)                   |
//!
//! The pause flag and the initialized version each live in their own
//! namespace. Nothing here checks roles or the transfer gate; callers do.

use log::debug;

use crate::config::{
    INFINITE_ALLOWANCE, INITIALIZABLE_NAMESPACE, LEDGER_NAMESPACE, MAX_NAME_LENGTH,
    MAX_SYMBOL_LENGTH, PAUSABLE_NAMESPACE,
};
use crate::crypto::{Address, Hash};
use crate::error::{InputError, TokenError};
use crate::storage::{mapping_slot, slot_offset, NamespacedRecord, StorageProvider, StorageWriter};
use crate::Amount;

const BALANCES_OFFSET: u64 = 0;
const ALLOWANCES_OFFSET: u64 = 1;
const TOTAL_SUPPLY_OFFSET: u64 = 2;
const NAME_OFFSET: u64 = 3;
const SYMBOL_OFFSET: u64 = 4;

/// Validate token metadata given to `initialize`
pub fn validate_metadata(name: &str, symbol: &str) -> Result<(), InputError> {
    if name.is_empty() {
        return Err(InputError::EmptyName);
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(InputError::NameTooLong);
    }
    if symbol.is_empty() {
        return Err(InputError::EmptySymbol);
    }
    if symbol.len() > MAX_SYMBOL_LENGTH {
        return Err(InputError::SymbolTooLong);
    }
    Ok(())
}

/// Balances, allowances, supply and metadata
pub struct Ledger;

impl NamespacedRecord for Ledger {
    const NAMESPACE: &'static str = LEDGER_NAMESPACE;
}

impl Ledger {
    fn field(offset: u64) -> Hash {
        slot_offset(&Self::location(), offset)
    }

    fn balance_slot(account: &Address) -> Hash {
        mapping_slot(&Self::field(BALANCES_OFFSET), &account.to_word())
    }

    fn allowance_slot(owner: &Address, spender: &Address) -> Hash {
        let inner = mapping_slot(&Self::field(ALLOWANCES_OFFSET), &owner.to_word());
        mapping_slot(&inner, &spender.to_word())
    }

    pub fn balance_of<S: StorageProvider + ?Sized>(storage: &S, account: &Address) -> Amount {
        storage.load_amount(&Self::balance_slot(account))
    }

    pub fn total_supply<S: StorageProvider + ?Sized>(storage: &S) -> Amount {
        storage.load_amount(&Self::field(TOTAL_SUPPLY_OFFSET))
    }

    pub fn allowance<S: StorageProvider + ?Sized>(
        storage: &S,
        owner: &Address,
        spender: &Address,
    ) -> Amount {
        storage.load_amount(&Self::allowance_slot(owner, spender))
    }

    pub fn name<S: StorageProvider + ?Sized>(storage: &S) -> String {
        String::from_utf8_lossy(&storage.load_bytes(&Self::field(NAME_OFFSET))).into_owned()
    }

    pub fn symbol<S: StorageProvider + ?Sized>(storage: &S) -> String {
        String::from_utf8_lossy(&storage.load_bytes(&Self::field(SYMBOL_OFFSET))).into_owned()
    }

    pub fn set_metadata<S: StorageWriter + ?Sized>(storage: &mut S, name: &str, symbol: &str) {
        storage.store_bytes(Self::field(NAME_OFFSET), name.as_bytes());
        storage.store_bytes(Self::field(SYMBOL_OFFSET), symbol.as_bytes());
    }

    /// Move `amount` from `from` to `to`
    ///
    /// The zero address on either side mints or burns. All arithmetic is
    /// checked.
    pub fn update<S: StorageWriter + ?Sized>(
        storage: &mut S,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        // Phase 1: debit side
        let supply = Self::total_supply(storage);
        let mut new_supply = supply;

        let new_from = if from.is_zero() {
            new_supply = new_supply.checked_add(amount).ok_or(TokenError::Overflow)?;
            None
        } else {
            let have = Self::balance_of(storage, from);
            let left = have
                .checked_sub(amount)
                .ok_or(TokenError::InsufficientBalance { need: amount, have })?;
            Some(left)
        };

        // Phase 2: credit side, read after the debit so a self-transfer nets out
        if let Some(left) = new_from {
            storage.store_amount(Self::balance_slot(from), left);
        }

        if to.is_zero() {
            new_supply = new_supply.checked_sub(amount).ok_or(TokenError::Overflow)?;
        } else {
            let balance = Self::balance_of(storage, to)
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
            storage.store_amount(Self::balance_slot(to), balance);
        }

        if new_supply != supply {
            storage.store_amount(Self::field(TOTAL_SUPPLY_OFFSET), new_supply);
        }

        debug!("update {} -> {}: {}", from, to, amount);
        Ok(())
    }

    pub fn approve<S: StorageWriter + ?Sized>(
        storage: &mut S,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if owner.is_zero() {
            return Err(TokenError::InvalidApprover);
        }
        if spender.is_zero() {
            return Err(TokenError::InvalidSpender);
        }
        storage.store_amount(Self::allowance_slot(owner, spender), amount);
        Ok(())
    }

    /// Consume allowance, the infinite allowance is never decreased
    pub fn spend_allowance<S: StorageWriter + ?Sized>(
        storage: &mut S,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let have = Self::allowance(storage, owner, spender);
        if have == INFINITE_ALLOWANCE {
            return Ok(());
        }
        let left = have
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance { need: amount, have })?;
        storage.store_amount(Self::allowance_slot(owner, spender), left);
        Ok(())
    }
}

/// Global pause flag
pub struct Pausable;

impl NamespacedRecord for Pausable {
    const NAMESPACE: &'static str = PAUSABLE_NAMESPACE;
}

impl Pausable {
    pub fn is_paused<S: StorageProvider + ?Sized>(storage: &S) -> bool {
        storage.load_bool(&Self::location())
    }

    pub fn require_not_paused<S: StorageProvider + ?Sized>(storage: &S) -> Result<(), TokenError> {
        if Self::is_paused(storage) {
            return Err(TokenError::Paused);
        }
        Ok(())
    }

    pub fn pause<S: StorageWriter + ?Sized>(storage: &mut S) -> Result<(), TokenError> {
        Self::require_not_paused(storage)?;
        storage.store_bool(Self::location(), true);
        Ok(())
    }

    pub fn unpause<S: StorageWriter + ?Sized>(storage: &mut S) -> Result<(), TokenError> {
        if !Self::is_paused(storage) {
            return Err(TokenError::NotPaused);
        }
        storage.store_bool(Self::location(), false);
        Ok(())
    }
}

/// Initialized version word
pub struct Initializable;

impl NamespacedRecord for Initializable {
    const NAMESPACE: &'static str = INITIALIZABLE_NAMESPACE;
}

impl Initializable {
    pub fn version<S: StorageProvider + ?Sized>(storage: &S) -> u64 {
        storage.load_amount(&Self::location())
    }

    pub fn require_initialized<S: StorageProvider + ?Sized>(storage: &S) -> Result<(), TokenError> {
        if Self::version(storage) == 0 {
            return Err(TokenError::NotInitialized);
        }
        Ok(())
    }

    /// Record `version`, which must be above the current one
    pub fn initialize<S: StorageWriter + ?Sized>(
        storage: &mut S,
        version: u64,
    ) -> Result<(), TokenError> {
        if Self::version(storage) >= version {
            return Err(TokenError::AlreadyInitialized);
        }
        storage.store_amount(Self::location(), version);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    const ALICE: Address = Address::repeat_byte(0xa1);
    const BOB: Address = Address::repeat_byte(0xb0);

    #[test]
    fn test_validate_metadata() {
        assert_eq!(validate_metadata("Token", "TKN"), Ok(()));
        assert_eq!(validate_metadata("", "TKN"), Err(InputError::EmptyName));
        assert_eq!(validate_metadata("Token", ""), Err(InputError::EmptySymbol));
        assert_eq!(
            validate_metadata(&"n".repeat(MAX_NAME_LENGTH + 1), "TKN"),
            Err(InputError::NameTooLong)
        );
        assert_eq!(
            validate_metadata("Token", &"S".repeat(MAX_SYMBOL_LENGTH + 1)),
            Err(InputError::SymbolTooLong)
        );
    }

    #[test]
    fn test_mint_transfer_burn() {
        let mut storage = Storage::new();
        Ledger::update(&mut storage, &Address::ZERO, &ALICE, 100).unwrap();
        assert_eq!(Ledger::total_supply(&storage), 100);

        Ledger::update(&mut storage, &ALICE, &BOB, 30).unwrap();
        assert_eq!(Ledger::balance_of(&storage, &ALICE), 70);
        assert_eq!(Ledger::balance_of(&storage, &BOB), 30);
        assert_eq!(Ledger::total_supply(&storage), 100);

        Ledger::update(&mut storage, &BOB, &Address::ZERO, 30).unwrap();
        assert_eq!(Ledger::balance_of(&storage, &BOB), 0);
        assert_eq!(Ledger::total_supply(&storage), 70);
    }

    #[test]
    fn test_insufficient_balance() {
        let mut storage = Storage::new();
        Ledger::update(&mut storage, &Address::ZERO, &ALICE, 5).unwrap();
        assert_eq!(
            Ledger::update(&mut storage, &ALICE, &BOB, 6),
            Err(TokenError::InsufficientBalance { need: 6, have: 5 })
        );
        assert_eq!(Ledger::balance_of(&storage, &ALICE), 5);
    }

    #[test]
    fn test_supply_overflow() {
        let mut storage = Storage::new();
        Ledger::update(&mut storage, &Address::ZERO, &ALICE, u64::MAX).unwrap();
        assert_eq!(
            Ledger::update(&mut storage, &Address::ZERO, &BOB, 1),
            Err(TokenError::Overflow)
        );
        assert_eq!(Ledger::balance_of(&storage, &BOB), 0);
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let mut storage = Storage::new();
        Ledger::update(&mut storage, &Address::ZERO, &ALICE, 10).unwrap();
        Ledger::update(&mut storage, &ALICE, &ALICE, 4).unwrap();
        assert_eq!(Ledger::balance_of(&storage, &ALICE), 10);
    }

    #[test]
    fn test_allowance() {
        let mut storage = Storage::new();
        Ledger::approve(&mut storage, &ALICE, &BOB, 10).unwrap();
        Ledger::spend_allowance(&mut storage, &ALICE, &BOB, 4).unwrap();
        assert_eq!(Ledger::allowance(&storage, &ALICE, &BOB), 6);
        assert_eq!(
            Ledger::spend_allowance(&mut storage, &ALICE, &BOB, 7),
            Err(TokenError::InsufficientAllowance { need: 7, have: 6 })
        );

        Ledger::approve(&mut storage, &ALICE, &BOB, INFINITE_ALLOWANCE).unwrap();
        Ledger::spend_allowance(&mut storage, &ALICE, &BOB, 1_000).unwrap();
        assert_eq!(Ledger::allowance(&storage, &ALICE, &BOB), INFINITE_ALLOWANCE);

        assert_eq!(
            Ledger::approve(&mut storage, &ALICE, &Address::ZERO, 1),
            Err(TokenError::InvalidSpender)
        );
    }

    #[test]
    fn test_pause_toggle() {
        let mut storage = Storage::new();
        assert_eq!(Pausable::unpause(&mut storage), Err(TokenError::NotPaused));
        Pausable::pause(&mut storage).unwrap();
        assert_eq!(Pausable::pause(&mut storage), Err(TokenError::Paused));
        assert_eq!(Pausable::require_not_paused(&storage), Err(TokenError::Paused));
        Pausable::unpause(&mut storage).unwrap();
        assert!(!Pausable::is_paused(&storage));
    }

    #[test]
    fn test_initialize_once() {
        let mut storage = Storage::new();
        assert_eq!(Initializable::require_initialized(&storage), Err(TokenError::NotInitialized));
        Initializable::initialize(&mut storage, 1).unwrap();
        assert_eq!(Initializable::version(&storage), 1);
        assert_eq!(Initializable::initialize(&mut storage, 1), Err(TokenError::AlreadyInitialized));
    }

    #[test]
    fn test_metadata_roundtrip() {
        let mut storage = Storage::new();
        Ledger::set_metadata(&mut storage, "Tollgate", "TOLL");
        assert_eq!(Ledger::name(&storage), "Tollgate");
        assert_eq!(Ledger::symbol(&storage), "TOLL");
    }
}
