//! Token Error Codes
//!
//! Range: 0x0300 - 0x03FF
//! Format: TOKEN_ERROR_<CATEGORY>_<SPECIFIC>

use thiserror::Error;

use crate::crypto::Hash;

// ===== Input Errors (0x0300 - 0x030F) =====

pub const TOKEN_ERROR_INVALID_INPUT: u64 = 0x0300;
pub const TOKEN_ERROR_INVALID_MODE: u64 = 0x0301;
pub const TOKEN_ERROR_INVALID_RECEIVER: u64 = 0x0302;
pub const TOKEN_ERROR_INVALID_SENDER: u64 = 0x0303;
pub const TOKEN_ERROR_INVALID_APPROVER: u64 = 0x0304;
pub const TOKEN_ERROR_INVALID_SPENDER: u64 = 0x0305;

// ===== Authorization Errors (0x0310 - 0x031F) =====

pub const TOKEN_ERROR_NOT_AUTHORIZED: u64 = 0x0310;

// ===== Transfer Gate Errors (0x0320 - 0x032F) =====

pub const TOKEN_ERROR_TRANSFER_RESTRICTED: u64 = 0x0320;
pub const TOKEN_ERROR_TRANSFER_INVALID: u64 = 0x0321;
pub const TOKEN_ERROR_PAUSED: u64 = 0x0322;
pub const TOKEN_ERROR_NOT_PAUSED: u64 = 0x0323;

// ===== Balance Errors (0x0330 - 0x033F) =====

pub const TOKEN_ERROR_INSUFFICIENT_BALANCE: u64 = 0x0330;
pub const TOKEN_ERROR_INSUFFICIENT_ALLOWANCE: u64 = 0x0331;
pub const TOKEN_ERROR_OVERFLOW: u64 = 0x0332;

// ===== Lifecycle Errors (0x0340 - 0x034F) =====

pub const TOKEN_ERROR_ALREADY_INITIALIZED: u64 = 0x0340;
pub const TOKEN_ERROR_NOT_INITIALIZED: u64 = 0x0341;
pub const TOKEN_ERROR_UNSUPPORTED_IMPLEMENTATION: u64 = 0x0342;
pub const TOKEN_ERROR_LAYOUT_DRIFT: u64 = 0x0343;

// ===== Execution Errors (0x0350 - 0x035F) =====

pub const TOKEN_ERROR_REENTRANT_CALL: u64 = 0x0350;
pub const TOKEN_ERROR_CALL_DEPTH_EXCEEDED: u64 = 0x0351;

/// Reason attached to an `InvalidInput` rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("name too long")]
    NameTooLong,
    #[error("symbol too long")]
    SymbolTooLong,
    #[error("amount cannot be zero")]
    ZeroAmount,
}

/// Every way a token call can be rejected
///
/// A rejected call never leaves partial state behind; the variant is the only
/// thing surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Invalid input: {0}")]
    InvalidInput(InputError),

    #[error("Not authorized")]
    NotAuthorized,

    #[error("Invalid transfer mode: {0}")]
    InvalidMode(u8),

    #[error("Transfers are restricted")]
    TransferRestricted,

    #[error("Transfer must involve the transfer controller")]
    TransferInvalid,

    #[error("Insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: u64, have: u64 },

    #[error("Insufficient allowance: need {need}, have {have}")]
    InsufficientAllowance { need: u64, have: u64 },

    #[error("Already initialized")]
    AlreadyInitialized,

    #[error("Not initialized")]
    NotInitialized,

    #[error("Token is paused")]
    Paused,

    #[error("Token is not paused")]
    NotPaused,

    #[error("Invalid receiver")]
    InvalidReceiver,

    #[error("Invalid sender")]
    InvalidSender,

    #[error("Invalid approver")]
    InvalidApprover,

    #[error("Invalid spender")]
    InvalidSpender,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Reentrant call")]
    ReentrantCall,

    #[error("Call depth exceeded")]
    CallDepthExceeded,

    #[error("Implementation does not support the proxy slot")]
    UnsupportedImplementation,

    #[error("Storage layout drift for {identifier}: expected {expected}, got {actual}")]
    LayoutDrift {
        identifier: String,
        expected: Hash,
        actual: Hash,
    },
}

impl From<InputError> for TokenError {
    fn from(e: InputError) -> Self {
        TokenError::InvalidInput(e)
    }
}

impl TokenError {
    /// Convert error to u64 error code
    pub fn to_code(&self) -> u64 {
        match self {
            Self::InvalidInput(_) => TOKEN_ERROR_INVALID_INPUT,
            Self::NotAuthorized => TOKEN_ERROR_NOT_AUTHORIZED,
            Self::InvalidMode(_) => TOKEN_ERROR_INVALID_MODE,
            Self::TransferRestricted => TOKEN_ERROR_TRANSFER_RESTRICTED,
            Self::TransferInvalid => TOKEN_ERROR_TRANSFER_INVALID,
            Self::InsufficientBalance { .. } => TOKEN_ERROR_INSUFFICIENT_BALANCE,
            Self::InsufficientAllowance { .. } => TOKEN_ERROR_INSUFFICIENT_ALLOWANCE,
            Self::AlreadyInitialized => TOKEN_ERROR_ALREADY_INITIALIZED,
            Self::NotInitialized => TOKEN_ERROR_NOT_INITIALIZED,
            Self::Paused => TOKEN_ERROR_PAUSED,
            Self::NotPaused => TOKEN_ERROR_NOT_PAUSED,
            Self::InvalidReceiver => TOKEN_ERROR_INVALID_RECEIVER,
            Self::InvalidSender => TOKEN_ERROR_INVALID_SENDER,
            Self::InvalidApprover => TOKEN_ERROR_INVALID_APPROVER,
            Self::InvalidSpender => TOKEN_ERROR_INVALID_SPENDER,
            Self::Overflow => TOKEN_ERROR_OVERFLOW,
            Self::ReentrantCall => TOKEN_ERROR_REENTRANT_CALL,
            Self::CallDepthExceeded => TOKEN_ERROR_CALL_DEPTH_EXCEEDED,
            Self::UnsupportedImplementation => TOKEN_ERROR_UNSUPPORTED_IMPLEMENTATION,
            Self::LayoutDrift { .. } => TOKEN_ERROR_LAYOUT_DRIFT,
        }
    }

    /// Create error from u64 error code
    ///
    /// Only payload-free variants can be rebuilt from a bare code.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            TOKEN_ERROR_NOT_AUTHORIZED => Some(Self::NotAuthorized),
            TOKEN_ERROR_TRANSFER_RESTRICTED => Some(Self::TransferRestricted),
            TOKEN_ERROR_TRANSFER_INVALID => Some(Self::TransferInvalid),
            TOKEN_ERROR_ALREADY_INITIALIZED => Some(Self::AlreadyInitialized),
            TOKEN_ERROR_NOT_INITIALIZED => Some(Self::NotInitialized),
            TOKEN_ERROR_PAUSED => Some(Self::Paused),
            TOKEN_ERROR_NOT_PAUSED => Some(Self::NotPaused),
            TOKEN_ERROR_INVALID_RECEIVER => Some(Self::InvalidReceiver),
            TOKEN_ERROR_INVALID_SENDER => Some(Self::InvalidSender),
            TOKEN_ERROR_INVALID_APPROVER => Some(Self::InvalidApprover),
            TOKEN_ERROR_INVALID_SPENDER => Some(Self::InvalidSpender),
            TOKEN_ERROR_OVERFLOW => Some(Self::Overflow),
            TOKEN_ERROR_REENTRANT_CALL => Some(Self::ReentrantCall),
            TOKEN_ERROR_CALL_DEPTH_EXCEEDED => Some(Self::CallDepthExceeded),
            TOKEN_ERROR_UNSUPPORTED_IMPLEMENTATION => Some(Self::UnsupportedImplementation),
            _ => None,
        }
    }
}
