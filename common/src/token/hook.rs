use super::Call;
use crate::crypto::Address;
use crate::Amount;

/// Observer invoked after every balance movement
///
/// Whatever calls it returns are dispatched as nested calls inside the same
/// atomic frame, each on behalf of the paired caller. A nested call that
/// fails aborts the outer call as a whole.
pub trait TransferHook: Send {
    fn on_transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Vec<(Address, Call)>;
}

