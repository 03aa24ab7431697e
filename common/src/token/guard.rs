use std::cell::Cell;

use crate::error::TokenError;

const NOT_ENTERED: u8 = 1;
const ENTERED: u8 = 2;

/// Mutual-exclusion flag for mint and burn
///
/// `enter` hands out an [`Entered`] token; the flag is released when the
/// token is dropped, whichever way the guarded call exits.
#[derive(Debug)]
pub struct ReentrancyGuard {
    status: Cell<u8>,
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self {
            status: Cell::new(NOT_ENTERED),
        }
    }
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_entered(&self) -> bool {
        self.status.get() == ENTERED
    }

    pub fn enter(&self) -> Result<Entered<'_>, TokenError> {
        if self.is_entered() {
            return Err(TokenError::ReentrantCall);
        }
        self.status.set(ENTERED);
        Ok(Entered { guard: self })
    }
}

/// Proof that the guard is held
#[must_use]
#[derive(Debug)]
pub struct Entered<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        self.guard.status.set(NOT_ENTERED);
    }
}
