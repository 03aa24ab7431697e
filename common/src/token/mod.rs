//! Upgradeable token
//!
//! [`Token`] plays the proxy: it owns committed storage, the active
//! [`TokenLogic`], the reentrancy guard and an optional transfer hook.
//! Every call runs in a frame over a fresh storage overlay and is committed
//! only if it, and every nested call its hook produced, succeeded.

mod call;
mod event;
mod guard;
mod hook;
mod logic;
mod scenario;

pub use call::*;
pub use event::*;
pub use guard::*;
pub use hook::*;
pub use logic::*;
pub use scenario::*;

use log::{debug, info, log_enabled, Level};

use crate::access::{AccessControl, RoleId, RoleStore};
use crate::config::{IMPLEMENTATION_SLOT_IDENTIFIER, MAX_CALL_DEPTH, TOKEN_DECIMALS};
use crate::crypto::Address;
use crate::error::TokenError;
use crate::ledger::{Initializable, Ledger, Pausable};
use crate::storage::{eip1967_slot, verify_layout, Storage, StorageProvider, StorageWriter};
use crate::transfer::{ModuleState, TransferMode};
use crate::Amount;

/// One top-level call in flight
struct Frame<'a> {
    ctx: CallContext<'a>,
    logic: &'a dyn TokenLogic,
    guard: &'a ReentrancyGuard,
    hook: Option<&'a mut dyn TransferHook>,
}

impl Frame<'_> {
    fn dispatch(&mut self, caller: &Address, call: &Call, depth: usize) -> Result<(), TokenError> {
        if depth > MAX_CALL_DEPTH {
            return Err(TokenError::CallDepthExceeded);
        }
        debug!("dispatch {} from {} at depth {}", call.name(), caller, depth);

        let guard = self.guard;
        let _entered = if call.is_guarded() {
            Some(guard.enter()?)
        } else {
            None
        };

        self.execute(caller, call)?;

        // Nested calls run while a guarded parent still holds the guard
        for (nested_caller, nested) in self.collect_hook_calls() {
            self.dispatch(&nested_caller, &nested, depth + 1)?;
        }
        Ok(())
    }

    fn collect_hook_calls(&mut self) -> Vec<(Address, Call)> {
        let movements = self.ctx.take_movements();
        match self.hook.as_deref_mut() {
            Some(hook) => movements
                .iter()
                .flat_map(|m| hook.on_transfer(&m.from, &m.to, m.amount))
                .collect(),
            None => Vec::new(),
        }
    }

    fn execute(&mut self, caller: &Address, call: &Call) -> Result<(), TokenError> {
        let logic = self.logic;
        let ctx = &mut self.ctx;
        match call {
            Call::Initialize { name, symbol } => logic.initialize(ctx, caller, name, symbol),
            Call::Mint { to, amount } => logic.mint(ctx, caller, to, *amount),
            Call::Burn { amount } => logic.burn(ctx, caller, *amount),
            Call::Transfer { to, amount } => logic.transfer(ctx, caller, to, *amount),
            Call::Approve { spender, amount } => logic.approve(ctx, caller, spender, *amount),
            Call::TransferFrom { from, to, amount } => {
                logic.transfer_from(ctx, caller, from, to, *amount)
            }
            Call::Pause => logic.pause(ctx, caller),
            Call::Unpause => logic.unpause(ctx, caller),
            Call::SetTransferController { controller } => {
                logic.set_transfer_controller(ctx, caller, controller)
            }
            Call::SetTransferMode { mode } => logic.set_transfer_mode(ctx, caller, *mode),
            Call::GrantRole { role, account } => logic.grant_role(ctx, caller, role, account),
            Call::RevokeRole { role, account } => logic.revoke_role(ctx, caller, role, account),
            Call::RenounceRole { role, confirmation } => {
                logic.renounce_role(ctx, caller, role, confirmation)
            }
        }
    }
}

/// Token instance: committed state plus the active logic
pub struct Token {
    storage: Storage,
    implementation: Box<dyn TokenLogic>,
    guard: ReentrancyGuard,
    hook: Option<Box<dyn TransferHook>>,
    events: Vec<TokenEvent>,
}

impl Token {
    /// Deploy with the shipped logic
    pub fn new() -> Result<Self, TokenError> {
        Self::deploy(Box::new(TokenV1))
    }

    /// Deploy over empty storage
    ///
    /// The pinned storage layout is verified before anything is written.
    pub fn deploy(implementation: Box<dyn TokenLogic>) -> Result<Self, TokenError> {
        Self::with_storage(Storage::new(), implementation)
    }

    /// Attach logic to existing storage
    pub fn with_storage(
        mut storage: Storage,
        implementation: Box<dyn TokenLogic>,
    ) -> Result<Self, TokenError> {
        verify_layout()?;
        if implementation.proxiable_uuid() != eip1967_slot(IMPLEMENTATION_SLOT_IDENTIFIER) {
            return Err(TokenError::UnsupportedImplementation);
        }
        storage.store_address(
            eip1967_slot(IMPLEMENTATION_SLOT_IDENTIFIER),
            &implementation.address(),
        );
        info!(
            "Token deployed with implementation {} (v{})",
            implementation.address(),
            implementation.version()
        );
        Ok(Self {
            storage,
            implementation,
            guard: ReentrancyGuard::new(),
            hook: None,
            events: Vec::new(),
        })
    }

    pub fn set_hook(&mut self, hook: Box<dyn TransferHook>) {
        self.hook = Some(hook);
    }

    pub fn clear_hook(&mut self) -> Option<Box<dyn TransferHook>> {
        self.hook.take()
    }

    /// Run one call atomically
    ///
    /// On success the storage changes are committed and the events of the
    /// call are returned. On failure nothing is kept.
    pub fn call(&mut self, caller: &Address, call: Call) -> Result<Vec<TokenEvent>, TokenError> {
        let Token {
            storage,
            implementation,
            guard,
            hook,
            events,
        } = self;

        let mut frame = Frame {
            ctx: CallContext::new(storage),
            logic: &**implementation,
            guard,
            hook: hook.as_deref_mut().map(|h| h as &mut dyn TransferHook),
        };

        if let Err(e) = frame.dispatch(caller, &call, 0) {
            debug!("{} from {} rejected: {}", call.name(), caller, e);
            return Err(e);
        }

        let (changes, emitted) = frame.ctx.into_parts();
        if log_enabled!(Level::Debug) {
            debug!(
                "{} from {} committed {} slot(s), {} event(s)",
                call.name(),
                caller,
                changes.len(),
                emitted.len()
            );
        }
        storage.apply(changes);
        events.extend(emitted.iter().cloned());
        Ok(emitted)
    }

    /// Replace the active logic
    ///
    /// The current logic authorizes the caller (root role), the new one must
    /// target the implementation slot. Only that slot is written.
    pub fn upgrade_to(
        &mut self,
        caller: &Address,
        implementation: Box<dyn TokenLogic>,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        let slot = eip1967_slot(IMPLEMENTATION_SLOT_IDENTIFIER);
        let mut ctx = CallContext::new(&self.storage);
        self.implementation.authorize_upgrade(&ctx, caller)?;
        if implementation.proxiable_uuid() != slot {
            return Err(TokenError::UnsupportedImplementation);
        }

        let address = implementation.address();
        ctx.storage.store_address(slot, &address);
        ctx.emit(TokenEvent::Upgraded {
            implementation: address,
        });

        let (changes, emitted) = ctx.into_parts();
        self.storage.apply(changes);
        info!(
            "Upgraded from v{} to v{} at {}",
            self.implementation.version(),
            implementation.version(),
            address
        );
        self.implementation = implementation;
        self.events.extend(emitted.iter().cloned());
        Ok(emitted)
    }

    // ===== Convenience wrappers =====

    pub fn initialize(&mut self, caller: &Address, name: &str, symbol: &str) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(
            caller,
            Call::Initialize {
                name: name.to_string(),
                symbol: symbol.to_string(),
            },
        )
    }

    pub fn mint(&mut self, caller: &Address, to: &Address, amount: Amount) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(caller, Call::Mint { to: *to, amount })
    }

    pub fn burn(&mut self, caller: &Address, amount: Amount) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(caller, Call::Burn { amount })
    }

    pub fn transfer(&mut self, caller: &Address, to: &Address, amount: Amount) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(caller, Call::Transfer { to: *to, amount })
    }

    pub fn approve(&mut self, caller: &Address, spender: &Address, amount: Amount) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(
            caller,
            Call::Approve {
                spender: *spender,
                amount,
            },
        )
    }

    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(
            caller,
            Call::TransferFrom {
                from: *from,
                to: *to,
                amount,
            },
        )
    }

    pub fn pause(&mut self, caller: &Address) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(caller, Call::Pause)
    }

    pub fn unpause(&mut self, caller: &Address) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(caller, Call::Unpause)
    }

    pub fn set_transfer_controller(
        &mut self,
        caller: &Address,
        controller: &Address,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(
            caller,
            Call::SetTransferController {
                controller: *controller,
            },
        )
    }

    pub fn set_transfer_mode(&mut self, caller: &Address, mode: u8) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(caller, Call::SetTransferMode { mode })
    }

    pub fn grant_role(&mut self, caller: &Address, role: &RoleId, account: &Address) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(
            caller,
            Call::GrantRole {
                role: *role,
                account: *account,
            },
        )
    }

    pub fn revoke_role(&mut self, caller: &Address, role: &RoleId, account: &Address) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(
            caller,
            Call::RevokeRole {
                role: *role,
                account: *account,
            },
        )
    }

    pub fn renounce_role(
        &mut self,
        caller: &Address,
        role: &RoleId,
        confirmation: &Address,
    ) -> Result<Vec<TokenEvent>, TokenError> {
        self.call(
            caller,
            Call::RenounceRole {
                role: *role,
                confirmation: *confirmation,
            },
        )
    }

    // ===== Queries =====

    fn module_state(&self) -> ModuleState {
        // Only valid modes are ever written
        ModuleState::load(&self.storage).unwrap_or_default()
    }

    pub fn get_transfer_mode(&self) -> TransferMode {
        self.module_state().transfer_mode
    }

    pub fn get_transfer_controller(&self) -> Address {
        self.module_state().transfer_controller
    }

    pub fn is_transfer_controller(&self, account: &Address) -> bool {
        self.get_transfer_controller() == *account
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        Ledger::balance_of(&self.storage, account)
    }

    pub fn total_supply(&self) -> Amount {
        Ledger::total_supply(&self.storage)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        Ledger::allowance(&self.storage, owner, spender)
    }

    pub fn name(&self) -> String {
        Ledger::name(&self.storage)
    }

    pub fn symbol(&self) -> String {
        Ledger::symbol(&self.storage)
    }

    pub fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    pub fn paused(&self) -> bool {
        Pausable::is_paused(&self.storage)
    }

    pub fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        RoleStore::new(&self.storage).has_role(role, account)
    }

    pub fn role_admin(&self, role: &RoleId) -> RoleId {
        RoleStore::new(&self.storage).role_admin(role)
    }

    /// Address recorded in the implementation slot
    pub fn implementation(&self) -> Address {
        self.storage
            .load_address(&eip1967_slot(IMPLEMENTATION_SLOT_IDENTIFIER))
    }

    /// Revision of the active logic
    pub fn version(&self) -> u64 {
        self.implementation.version()
    }

    pub fn initialized_version(&self) -> u64 {
        Initializable::version(&self.storage)
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn into_storage(self) -> Storage {
        self.storage
    }

    /// Every event committed so far
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }
}
