//! Token Role System
//!
//! Role ids follow the usual access-control convention: the root role is the
//! all-zero id, every other role is the keccak256 hash of its name.

use crate::crypto::{keccak256, Hash};

/// Role identifier (32 bytes)
pub type RoleId = Hash;

/// Create a RoleId from a role name
pub fn role_id_from_name(name: &str) -> RoleId {
    keccak256(name.as_bytes())
}

/// Root role - authorizes upgrades and administers every other role
pub const ROOT_ROLE: RoleId = Hash::zero();

/// Admin role - can pause and reassign the transfer controller
///
/// keccak256("ADMIN_ROLE")
pub const ADMIN_ROLE: RoleId = Hash::new([
    0xa4, 0x98, 0x07, 0x20, 0x5c, 0xe4, 0xd3, 0x55, 0x09, 0x2e, 0xf5, 0xa8, 0xa1, 0x8f, 0x56, 0xe8,
    0x91, 0x3c, 0xf4, 0xa2, 0x01, 0xfb, 0xe2, 0x87, 0x82, 0x5b, 0x09, 0x56, 0x93, 0xc2, 0x17, 0x75,
]);

/// Minter role - can mint and burn
///
/// keccak256("MINTER_ROLE")
pub const MINTER_ROLE: RoleId = Hash::new([
    0x9f, 0x2d, 0xf0, 0xfe, 0xd2, 0xc7, 0x76, 0x48, 0xde, 0x58, 0x60, 0xa4, 0xcc, 0x50, 0x8c, 0xd0,
    0x81, 0x8c, 0x85, 0xb8, 0xb8, 0xa1, 0xab, 0x4c, 0xee, 0xef, 0x8d, 0x98, 0x1c, 0x89, 0x56, 0xa6,
]);

/// Check if a role is a predefined role
pub fn is_predefined_role(role: &RoleId) -> bool {
    predefined_role_name(role).is_some()
}

/// Get the name of a predefined role
pub fn predefined_role_name(role: &RoleId) -> Option<&'static str> {
    if *role == ROOT_ROLE {
        Some("ROOT")
    } else if *role == ADMIN_ROLE {
        Some("ADMIN")
    } else if *role == MINTER_ROLE {
        Some("MINTER")
    } else {
        None
    }
}

/// Parse a role from its short name, its full `*_ROLE` name or a hex id
pub fn parse_role(value: &str) -> Option<RoleId> {
    match value.to_ascii_uppercase().as_str() {
        "ROOT" | "DEFAULT_ADMIN_ROLE" => Some(ROOT_ROLE),
        "ADMIN" | "ADMIN_ROLE" => Some(ADMIN_ROLE),
        "MINTER" | "MINTER_ROLE" => Some(MINTER_ROLE),
        _ => value.parse().ok(),
    }
}
