pub const VERSION: &str = env!("BUILD_VERSION");

// ===== Token Limits =====

// Same scale as the usual fungible tokens: 1 unit = 10^18 atoms
pub const TOKEN_DECIMALS: u8 = 18;

/// Maximum length of the token name (bytes)
pub const MAX_NAME_LENGTH: usize = 64;

/// Maximum length of the token symbol (bytes)
pub const MAX_SYMBOL_LENGTH: usize = 12;

/// Maximum nesting of calls triggered from a transfer hook
pub const MAX_CALL_DEPTH: usize = 8;

/// Allowance value that is never decreased by spending
pub const INFINITE_ALLOWANCE: u64 = u64::MAX;

/// Version written by `initialize`
pub const INITIAL_VERSION: u64 = 1;

// ===== Storage Namespaces =====
// Each namespace is turned into a slot family base with the ERC-7201 formula.
// Changing any identifier string moves the record and orphans deployed state.

/// Transfer mode and transfer controller
pub const TRANSFER_CONTROL_NAMESPACE: &str = "tollgate.storage.TransferControl";

/// Role membership and role admins
pub const ACCESS_CONTROL_NAMESPACE: &str = "openzeppelin.storage.AccessControl";

/// Balances, allowances, supply and metadata
pub const LEDGER_NAMESPACE: &str = "openzeppelin.storage.ERC20";

/// Global pause flag
pub const PAUSABLE_NAMESPACE: &str = "openzeppelin.storage.Pausable";

/// Initialized version
pub const INITIALIZABLE_NAMESPACE: &str = "openzeppelin.storage.Initializable";

/// EIP-1967 identifier of the active implementation slot (single hash, no mask)
pub const IMPLEMENTATION_SLOT_IDENTIFIER: &str = "eip1967.proxy.implementation";

// ===== Expected Locations =====
// Pinned outputs of the locator. `verify_layout` compares against these
// before any storage is touched.

pub const TRANSFER_CONTROL_LOCATION: &str =
    "ab7fc00fdfa4d1c6f84aa1142419e497f61103e4ea64fbb28a116d45305de600";

pub const ACCESS_CONTROL_LOCATION: &str =
    "02dd7bc7dec4dceedda775e58dd541e08a116c6c53815c0bd028192f7b626800";

pub const LEDGER_LOCATION: &str =
    "52c63247e1f47db19d5ce0460030c497f067ca4cebf71ba98eeadabe20bace00";

pub const PAUSABLE_LOCATION: &str =
    "cd5ed15c6e187e77e9aee88184c21f4f2182ab5827cb3b7e07fbedcd63f03300";

pub const INITIALIZABLE_LOCATION: &str =
    "f0c57e16840df040f15088dc2f81fe391c3923bec73e23a9662efc9c229c6a00";

pub const IMPLEMENTATION_SLOT: &str =
    "360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc";

/// How a layout entry turns its identifier into a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotScheme {
    /// keccak256(keccak256(id) - 1) with the low byte cleared
    Erc7201,
    /// keccak256(id) - 1
    Eip1967,
}

/// One row of the persisted storage layout
#[derive(Debug, Clone, Copy)]
pub struct LayoutEntry {
    pub identifier: &'static str,
    pub expected: &'static str,
    pub scheme: SlotScheme,
}

/// Every slot family this crate reads or writes
pub const STORAGE_LAYOUT: &[LayoutEntry] = &[
    LayoutEntry {
        identifier: TRANSFER_CONTROL_NAMESPACE,
        expected: TRANSFER_CONTROL_LOCATION,
        scheme: SlotScheme::Erc7201,
    },
    LayoutEntry {
        identifier: ACCESS_CONTROL_NAMESPACE,
        expected: ACCESS_CONTROL_LOCATION,
        scheme: SlotScheme::Erc7201,
    },
    LayoutEntry {
        identifier: LEDGER_NAMESPACE,
        expected: LEDGER_LOCATION,
        scheme: SlotScheme::Erc7201,
    },
    LayoutEntry {
        identifier: PAUSABLE_NAMESPACE,
        expected: PAUSABLE_LOCATION,
        scheme: SlotScheme::Erc7201,
    },
    LayoutEntry {
        identifier: INITIALIZABLE_NAMESPACE,
        expected: INITIALIZABLE_LOCATION,
        scheme: SlotScheme::Erc7201,
    },
    LayoutEntry {
        identifier: IMPLEMENTATION_SLOT_IDENTIFIER,
        expected: IMPLEMENTATION_SLOT,
        scheme: SlotScheme::Eip1967,
    },
];
