use log::{debug, info};

use super::{ModuleState, TransferMode};
use crate::access::{AccessControl, ADMIN_ROLE};
use crate::crypto::Address;
use crate::error::TokenError;
use crate::Amount;

/// Transfer authorization engine
///
/// Holds the gate state for the duration of one call and reads role
/// membership through the injected [`AccessControl`] capability. It never
/// touches storage: the caller loads [`ModuleState`] before and stores it back
/// after a successful operation.
pub struct TransferEngine<'a> {
    state: ModuleState,
    access: &'a dyn AccessControl,
}

impl<'a> TransferEngine<'a> {
    pub fn new(state: ModuleState, access: &'a dyn AccessControl) -> Self {
        Self { state, access }
    }

    pub fn state(&self) -> &ModuleState {
        &self.state
    }

    pub fn into_state(self) -> ModuleState {
        self.state
    }

    pub fn transfer_mode(&self) -> TransferMode {
        self.state.transfer_mode
    }

    pub fn transfer_controller(&self) -> Address {
        self.state.transfer_controller
    }

    pub fn is_transfer_controller(&self, account: &Address) -> bool {
        self.state.transfer_controller == *account
    }

    /// Lock the gate down at deployment: most restrictive mode, the
    /// initializer as controller
    pub fn initialize(&mut self, controller: Address) {
        self.state = ModuleState {
            transfer_controller: controller,
            transfer_mode: TransferMode::MAX,
        };
        info!(
            "Transfer gate initialized in {} mode, controller {}",
            self.state.transfer_mode, controller
        );
    }

    /// Decide whether a movement may happen
    ///
    /// Mint movements come from the zero address, burn movements go to it.
    pub fn authorize(&self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        match self.state.transfer_mode {
            TransferMode::Normal => Ok(()),
            TransferMode::Restricted => {
                debug!("Movement of {} from {} to {} rejected: restricted", amount, from, to);
                Err(TokenError::TransferRestricted)
            }
            TransferMode::Controlled => {
                if self.is_transfer_controller(from) || self.is_transfer_controller(to) {
                    Ok(())
                } else {
                    debug!(
                        "Movement of {} from {} to {} rejected: controller {} not involved",
                        amount, from, to, self.state.transfer_controller
                    );
                    Err(TokenError::TransferInvalid)
                }
            }
        }
    }

    /// Move the gate to `raw`
    ///
    /// Only the current controller may call this. Once the mode is `Normal`
    /// the call succeeds without changing anything, so an opened token can
    /// never be locked again. Returns the `(old, new)` pair when the mode was
    /// written.
    pub fn set_transfer_mode(
        &mut self,
        caller: &Address,
        raw: u8,
    ) -> Result<Option<(TransferMode, TransferMode)>, TokenError> {
        if !self.is_transfer_controller(caller) {
            return Err(TokenError::NotAuthorized);
        }
        let new_mode = TransferMode::try_from(raw)?;

        let old_mode = self.state.transfer_mode;
        if old_mode == TransferMode::Normal {
            debug!("Transfer mode already normal, ignoring change to {}", new_mode);
            return Ok(None);
        }

        self.state.transfer_mode = new_mode;
        info!("Transfer mode changed from {} to {}", old_mode, new_mode);
        Ok(Some((old_mode, new_mode)))
    }

    /// Reassign the controller, the zero address clears it
    ///
    /// Requires the admin role. Always reports the `(old, new)` pair, even
    /// when both are equal.
    pub fn set_transfer_controller(
        &mut self,
        caller: &Address,
        new_controller: Address,
    ) -> Result<(Address, Address), TokenError> {
        if !self.access.has_role(&ADMIN_ROLE, caller) {
            return Err(TokenError::NotAuthorized);
        }

        let old_controller = self.state.transfer_controller;
        self.state.transfer_controller = new_controller;
        info!(
            "Transfer controller changed from {} to {}",
            old_controller, new_controller
        );
        Ok((old_controller, new_controller))
    }
}
