//! Replaceable token logic
//!
//! The token's behaviour sits behind [`TokenLogic`]. Its default method
//! bodies are the shipped logic; a new implementation overrides what it needs
//! and is swapped in with `Token::upgrade_to`. Implementations hold no state
//! of their own: everything they read or write goes through the
//! [`CallContext`] and therefore through namespaced storage, which survives
//! the swap untouched.

use indexmap::IndexMap;
use log::debug;

use super::TokenEvent;
use crate::access::{AccessControl, AccessControlRecord, RoleId, RoleStore, ADMIN_ROLE, MINTER_ROLE, ROOT_ROLE};
use crate::config::{IMPLEMENTATION_SLOT_IDENTIFIER, INITIAL_VERSION};
use crate::crypto::{keccak256, Address, Hash};
use crate::error::{InputError, TokenError};
use crate::ledger::{validate_metadata, Initializable, Ledger, Pausable};
use crate::storage::{eip1967_slot, Storage, StorageOverlay};
use crate::transfer::{ModuleState, TransferEngine};
use crate::Amount;

/// A balance movement performed during a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
}

/// Everything a call may touch
///
/// Writes land in the overlay and events in a local buffer; both are
/// published together when the call commits.
pub struct CallContext<'a> {
    pub storage: StorageOverlay<'a>,
    events: Vec<TokenEvent>,
    movements: Vec<Movement>,
}

impl<'a> CallContext<'a> {
    pub fn new(base: &'a Storage) -> Self {
        Self {
            storage: StorageOverlay::new(base),
            events: Vec::new(),
            movements: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: TokenEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Movements recorded since the last call to this method
    pub fn take_movements(&mut self) -> Vec<Movement> {
        std::mem::take(&mut self.movements)
    }

    pub fn into_parts(self) -> (IndexMap<Hash, Option<Vec<u8>>>, Vec<TokenEvent>) {
        (self.storage.into_changes(), self.events)
    }

    pub fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        RoleStore::new(&self.storage).has_role(role, account)
    }

    pub fn require_role(&self, role: &RoleId, account: &Address) -> Result<(), TokenError> {
        if !self.has_role(role, account) {
            debug!("{} lacks role {}", account, role);
            return Err(TokenError::NotAuthorized);
        }
        Ok(())
    }

    pub fn require_initialized(&self) -> Result<(), TokenError> {
        Initializable::require_initialized(&self.storage)
    }

    /// Run `f` against the transfer gate, storing the state back if it changed
    pub fn with_engine<T>(
        &mut self,
        f: impl FnOnce(&mut TransferEngine<'_>) -> Result<T, TokenError>,
    ) -> Result<T, TokenError> {
        let before = ModuleState::load(&self.storage)?;
        let (value, after) = {
            let roles = RoleStore::new(&self.storage);
            let mut engine = TransferEngine::new(before, &roles);
            let value = f(&mut engine)?;
            (value, engine.into_state())
        };
        if after != before {
            after.store(&mut self.storage);
        }
        Ok(value)
    }

    pub fn authorize(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        self.with_engine(|engine| engine.authorize(from, to, amount))
    }

    /// Gate and perform one movement: pause first, then the transfer mode,
    /// then the ledger
    pub fn move_tokens(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        Pausable::require_not_paused(&self.storage)?;
        self.authorize(from, to, amount)?;
        Ledger::update(&mut self.storage, from, to, amount)?;
        self.emit(TokenEvent::Transfer {
            from: *from,
            to: *to,
            value: amount,
        });
        self.movements.push(Movement {
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }

    fn grant(&mut self, role: &RoleId, account: &Address, sender: &Address) {
        if AccessControlRecord::grant_role(&mut self.storage, role, account) {
            self.emit(TokenEvent::RoleGranted {
                role: *role,
                account: *account,
                sender: *sender,
            });
        }
    }

    fn revoke(&mut self, role: &RoleId, account: &Address, sender: &Address) {
        if AccessControlRecord::revoke_role(&mut self.storage, role, account) {
            self.emit(TokenEvent::RoleRevoked {
                role: *role,
                account: *account,
                sender: *sender,
            });
        }
    }
}

/// Token behaviour behind the proxy
pub trait TokenLogic: Send + Sync {
    /// Revision of this implementation
    fn version(&self) -> u64;

    /// Code identity written to the implementation slot
    fn address(&self) -> Address;

    /// Slot this implementation expects to be registered at
    fn proxiable_uuid(&self) -> Hash {
        eip1967_slot(IMPLEMENTATION_SLOT_IDENTIFIER)
    }

    /// Checked on the active implementation before it is replaced
    fn authorize_upgrade(&self, ctx: &CallContext<'_>, caller: &Address) -> Result<(), TokenError> {
        ctx.require_role(&ROOT_ROLE, caller)
    }

    fn initialize(
        &self,
        ctx: &mut CallContext<'_>,
        caller: &Address,
        name: &str,
        symbol: &str,
    ) -> Result<(), TokenError> {
        Initializable::initialize(&mut ctx.storage, INITIAL_VERSION)?;
        validate_metadata(name, symbol)?;

        Ledger::set_metadata(&mut ctx.storage, name, symbol);
        ctx.grant(&ROOT_ROLE, caller, caller);
        ctx.grant(&ADMIN_ROLE, caller, caller);
        ctx.with_engine(|engine| {
            engine.initialize(*caller);
            Ok(())
        })?;

        ctx.emit(TokenEvent::Initialized {
            version: INITIAL_VERSION,
        });
        Ok(())
    }

    fn mint(
        &self,
        ctx: &mut CallContext<'_>,
        caller: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(InputError::ZeroAmount.into());
        }
        ctx.require_initialized()?;
        ctx.require_role(&MINTER_ROLE, caller)?;
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver);
        }
        ctx.move_tokens(&Address::ZERO, to, amount)
    }

    /// Burn from the caller's own balance
    fn burn(&self, ctx: &mut CallContext<'_>, caller: &Address, amount: Amount) -> Result<(), TokenError> {
        ctx.require_initialized()?;
        ctx.require_role(&MINTER_ROLE, caller)?;
        if caller.is_zero() {
            return Err(TokenError::InvalidSender);
        }
        ctx.move_tokens(caller, &Address::ZERO, amount)
    }

    fn transfer(
        &self,
        ctx: &mut CallContext<'_>,
        caller: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        ctx.require_initialized()?;
        if caller.is_zero() {
            return Err(TokenError::InvalidSender);
        }
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver);
        }
        ctx.move_tokens(caller, to, amount)
    }

    fn approve(
        &self,
        ctx: &mut CallContext<'_>,
        caller: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        ctx.require_initialized()?;
        Ledger::approve(&mut ctx.storage, caller, spender, amount)?;
        ctx.emit(TokenEvent::Approval {
            owner: *caller,
            spender: *spender,
            value: amount,
        });
        Ok(())
    }

    fn transfer_from(
        &self,
        ctx: &mut CallContext<'_>,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        ctx.require_initialized()?;
        Ledger::spend_allowance(&mut ctx.storage, from, caller, amount)?;
        if from.is_zero() {
            return Err(TokenError::InvalidSender);
        }
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver);
        }
        ctx.move_tokens(from, to, amount)
    }

    fn pause(&self, ctx: &mut CallContext<'_>, caller: &Address) -> Result<(), TokenError> {
        ctx.require_initialized()?;
        ctx.require_role(&ADMIN_ROLE, caller)?;
        Pausable::pause(&mut ctx.storage)?;
        ctx.emit(TokenEvent::Paused { account: *caller });
        Ok(())
    }

    fn unpause(&self, ctx: &mut CallContext<'_>, caller: &Address) -> Result<(), TokenError> {
        ctx.require_initialized()?;
        ctx.require_role(&ADMIN_ROLE, caller)?;
        Pausable::unpause(&mut ctx.storage)?;
        ctx.emit(TokenEvent::Unpaused { account: *caller });
        Ok(())
    }

    fn set_transfer_controller(
        &self,
        ctx: &mut CallContext<'_>,
        caller: &Address,
        controller: &Address,
    ) -> Result<(), TokenError> {
        ctx.require_initialized()?;
        let (old_controller, new_controller) =
            ctx.with_engine(|engine| engine.set_transfer_controller(caller, *controller))?;
        ctx.emit(TokenEvent::TransferControllerChanged {
            old_controller,
            new_controller,
        });
        Ok(())
    }

    fn set_transfer_mode(&self, ctx: &mut CallContext<'_>, caller: &Address, mode: u8) -> Result<(), TokenError> {
        ctx.require_initialized()?;
        if let Some((old_mode, new_mode)) = ctx.with_engine(|engine| engine.set_transfer_mode(caller, mode))? {
            ctx.emit(TokenEvent::TransferModeChanged { old_mode, new_mode });
        }
        Ok(())
    }

    fn grant_role(
        &self,
        ctx: &mut CallContext<'_>,
        caller: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<(), TokenError> {
        ctx.require_initialized()?;
        let admin = AccessControlRecord::role_admin(&ctx.storage, role);
        ctx.require_role(&admin, caller)?;
        ctx.grant(role, account, caller);
        Ok(())
    }

    fn revoke_role(
        &self,
        ctx: &mut CallContext<'_>,
        caller: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<(), TokenError> {
        ctx.require_initialized()?;
        let admin = AccessControlRecord::role_admin(&ctx.storage, role);
        ctx.require_role(&admin, caller)?;
        ctx.revoke(role, account, caller);
        Ok(())
    }

    /// Drop a role held by the caller, `confirmation` must repeat the caller
    fn renounce_role(
        &self,
        ctx: &mut CallContext<'_>,
        caller: &Address,
        role: &RoleId,
        confirmation: &Address,
    ) -> Result<(), TokenError> {
        ctx.require_initialized()?;
        if confirmation != caller {
            return Err(TokenError::NotAuthorized);
        }
        ctx.revoke(role, caller, caller);
        Ok(())
    }
}

/// First shipped implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenV1;

impl TokenLogic for TokenV1 {
    fn version(&self) -> u64 {
        1
    }

    fn address(&self) -> Address {
        Address::from_hash(&keccak256(b"tollgate.implementation.v1"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IMPLEMENTATION_SLOT;
    use crate::transfer::TransferMode;

    const DEPLOYER: Address = Address::repeat_byte(0xd0);

    #[test]
    fn test_proxiable_uuid_is_implementation_slot() {
        assert_eq!(TokenV1.proxiable_uuid().to_hex(), IMPLEMENTATION_SLOT);
    }

    #[test]
    fn test_initialize_writes_only_to_overlay() {
        let base = Storage::new();
        let mut ctx = CallContext::new(&base);
        TokenV1.initialize(&mut ctx, &DEPLOYER, "Token", "TKN").unwrap();

        assert!(ctx.has_role(&ROOT_ROLE, &DEPLOYER));
        assert!(ctx.has_role(&ADMIN_ROLE, &DEPLOYER));
        assert!(!ctx.has_role(&MINTER_ROLE, &DEPLOYER));
        let state = ModuleState::load(&ctx.storage).unwrap();
        assert_eq!(state.transfer_mode, TransferMode::Controlled);
        assert_eq!(state.transfer_controller, DEPLOYER);
        assert_eq!(
            ctx.events().last(),
            Some(&TokenEvent::Initialized { version: 1 })
        );
        assert!(base.is_empty());
    }

    #[test]
    fn test_movements_are_recorded() {
        let base = Storage::new();
        let mut ctx = CallContext::new(&base);
        TokenV1.initialize(&mut ctx, &DEPLOYER, "Token", "TKN").unwrap();
        ctx.grant(&MINTER_ROLE, &DEPLOYER, &DEPLOYER);

        TokenV1.mint(&mut ctx, &DEPLOYER, &DEPLOYER, 5).unwrap();
        assert_eq!(
            ctx.take_movements(),
            vec![Movement {
                from: Address::ZERO,
                to: DEPLOYER,
                amount: 5
            }]
        );
        assert!(ctx.take_movements().is_empty());
    }
}
