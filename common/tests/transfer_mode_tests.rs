use proptest::prelude::*;
use tollgate_common::{
    access::{AccessControl, RoleId, ADMIN_ROLE, MINTER_ROLE},
    crypto::Address,
    error::{InputError, TokenError},
    token::{Token, TokenEvent},
    transfer::{ModuleState, TransferEngine, TransferMode},
};

const DEPLOYER: Address = Address::repeat_byte(0xd0);
const ALICE: Address = Address::repeat_byte(0xa1);
const BOB: Address = Address::repeat_byte(0xb0);
const CAROL: Address = Address::repeat_byte(0xc0);

struct NoRoles;

impl AccessControl for NoRoles {
    fn has_role(&self, _: &RoleId, _: &Address) -> bool {
        false
    }

    fn role_admin(&self, _: &RoleId) -> RoleId {
        RoleId::zero()
    }
}

fn deployed() -> Token {
    let mut token = Token::new().unwrap();
    token.initialize(&DEPLOYER, "T", "T").unwrap();
    token
}

fn mode_changes(events: &[TokenEvent]) -> Vec<(TransferMode, TransferMode)> {
    events
        .iter()
        .filter_map(|e| match e {
            TokenEvent::TransferModeChanged { old_mode, new_mode } => Some((*old_mode, *new_mode)),
            _ => None,
        })
        .collect()
}

#[test]
fn initialize_then_open_then_valve() {
    let mut token = deployed();
    assert_eq!(token.get_transfer_mode(), TransferMode::Controlled);
    assert_eq!(token.get_transfer_mode() as u8, 2);
    assert_eq!(token.get_transfer_controller(), DEPLOYER);
    assert!(token.is_transfer_controller(&DEPLOYER));

    let events = token.set_transfer_mode(&DEPLOYER, 0).unwrap();
    assert_eq!(
        mode_changes(&events),
        vec![(TransferMode::Controlled, TransferMode::Normal)]
    );
    assert_eq!(token.get_transfer_mode(), TransferMode::Normal);

    let storage_before = token.storage().clone();
    let events = token.set_transfer_mode(&DEPLOYER, 1).unwrap();
    assert!(events.is_empty());
    assert_eq!(token.get_transfer_mode(), TransferMode::Normal);
    assert_eq!(token.storage(), &storage_before);
}

#[test]
fn valve_holds_after_controller_change() {
    let mut token = deployed();
    token.set_transfer_mode(&DEPLOYER, 0).unwrap();
    token.set_transfer_controller(&DEPLOYER, &ALICE).unwrap();

    for raw in 0..=2 {
        assert_eq!(token.set_transfer_mode(&ALICE, raw), Ok(vec![]));
    }
    assert_eq!(token.get_transfer_mode(), TransferMode::Normal);
}

#[test]
fn only_controller_changes_mode() {
    let mut token = deployed();
    token.set_transfer_controller(&DEPLOYER, &CAROL).unwrap();

    // Admin but no longer controller
    assert_eq!(
        token.set_transfer_mode(&DEPLOYER, 0),
        Err(TokenError::NotAuthorized)
    );
    let events = token.set_transfer_mode(&CAROL, 1).unwrap();
    assert_eq!(
        mode_changes(&events),
        vec![(TransferMode::Controlled, TransferMode::Restricted)]
    );
}

#[test]
fn out_of_range_mode_is_rejected() {
    let mut token = deployed();
    assert_eq!(
        token.set_transfer_mode(&DEPLOYER, 3),
        Err(TokenError::InvalidMode(3))
    );
    assert_eq!(
        token.set_transfer_mode(&DEPLOYER, 255),
        Err(TokenError::InvalidMode(255))
    );
    assert_eq!(token.get_transfer_mode(), TransferMode::Controlled);
}

#[test]
fn controller_change_always_emits() {
    let mut token = deployed();
    let events = token.set_transfer_controller(&DEPLOYER, &DEPLOYER).unwrap();
    assert_eq!(
        events,
        vec![TokenEvent::TransferControllerChanged {
            old_controller: DEPLOYER,
            new_controller: DEPLOYER
        }]
    );

    let events = token.set_transfer_controller(&DEPLOYER, &Address::ZERO).unwrap();
    assert_eq!(
        events,
        vec![TokenEvent::TransferControllerChanged {
            old_controller: DEPLOYER,
            new_controller: Address::ZERO
        }]
    );
    assert_eq!(token.get_transfer_controller(), Address::ZERO);
}

#[test]
fn non_admin_cannot_change_controller() {
    let mut token = deployed();
    assert_eq!(
        token.set_transfer_controller(&ALICE, &ALICE),
        Err(TokenError::NotAuthorized)
    );
    assert_eq!(token.get_transfer_controller(), DEPLOYER);

    token.grant_role(&DEPLOYER, &ADMIN_ROLE, &ALICE).unwrap();
    token.set_transfer_controller(&ALICE, &ALICE).unwrap();
    assert_eq!(token.get_transfer_controller(), ALICE);
}

#[test]
fn controlled_mode_requires_controller_as_party() {
    let mut token = deployed();
    token.grant_role(&DEPLOYER, &MINTER_ROLE, &DEPLOYER).unwrap();

    // mint to a third party: from is zero, to is not the controller
    assert_eq!(
        token.mint(&DEPLOYER, &ALICE, 10),
        Err(TokenError::TransferInvalid)
    );
    token.mint(&DEPLOYER, &DEPLOYER, 10).unwrap();
    token.transfer(&DEPLOYER, &ALICE, 10).unwrap();

    assert_eq!(
        token.transfer(&ALICE, &BOB, 10),
        Err(TokenError::TransferInvalid)
    );
    token.transfer(&ALICE, &DEPLOYER, 4).unwrap();
    assert_eq!(token.balance_of(&ALICE), 6);
    assert_eq!(token.balance_of(&DEPLOYER), 4);
}

#[test]
fn restricted_mode_blocks_everything() {
    let mut token = deployed();
    token.grant_role(&DEPLOYER, &MINTER_ROLE, &DEPLOYER).unwrap();
    token.mint(&DEPLOYER, &DEPLOYER, 10).unwrap();
    token.set_transfer_mode(&DEPLOYER, 1).unwrap();

    assert_eq!(
        token.transfer(&DEPLOYER, &ALICE, 1),
        Err(TokenError::TransferRestricted)
    );
    assert_eq!(
        token.mint(&DEPLOYER, &DEPLOYER, 1),
        Err(TokenError::TransferRestricted)
    );
    assert_eq!(token.burn(&DEPLOYER, 1), Err(TokenError::TransferRestricted));
    assert_eq!(token.total_supply(), 10);
}

#[test]
fn zero_mint_is_invalid_input_everywhere() {
    let zero = TokenError::InvalidInput(InputError::ZeroAmount);

    // Uninitialized, no roles at all
    let mut token = Token::new().unwrap();
    assert_eq!(token.mint(&ALICE, &ALICE, 0), Err(zero.clone()));

    // Non-minter, controlled mode
    let mut token = deployed();
    assert_eq!(token.mint(&ALICE, &BOB, 0), Err(zero.clone()));

    // Minter, restricted mode
    token.grant_role(&DEPLOYER, &MINTER_ROLE, &DEPLOYER).unwrap();
    token.set_transfer_mode(&DEPLOYER, 1).unwrap();
    assert_eq!(token.mint(&DEPLOYER, &DEPLOYER, 0), Err(zero.clone()));

    // Minter, normal mode, paused
    token.set_transfer_mode(&DEPLOYER, 0).unwrap();
    token.pause(&DEPLOYER).unwrap();
    assert_eq!(token.mint(&DEPLOYER, &DEPLOYER, 0), Err(zero));
}

#[test]
fn non_minter_cannot_mint() {
    let mut token = deployed();
    token.set_transfer_mode(&DEPLOYER, 0).unwrap();

    assert_eq!(
        token.mint(&ALICE, &ALICE, 10),
        Err(TokenError::NotAuthorized)
    );
    // Root and admin are not enough either
    assert_eq!(
        token.mint(&DEPLOYER, &ALICE, 10),
        Err(TokenError::NotAuthorized)
    );
    assert_eq!(token.balance_of(&ALICE), 0);
    assert_eq!(token.total_supply(), 0);
}

#[test]
fn pause_and_mode_are_orthogonal() {
    let mut token = deployed();
    token.grant_role(&DEPLOYER, &MINTER_ROLE, &DEPLOYER).unwrap();
    token.mint(&DEPLOYER, &DEPLOYER, 10).unwrap();

    // Normal mode + paused
    token.set_transfer_mode(&DEPLOYER, 0).unwrap();
    token.pause(&DEPLOYER).unwrap();
    assert!(token.paused());
    assert_eq!(token.transfer(&DEPLOYER, &ALICE, 1), Err(TokenError::Paused));
    assert_eq!(token.mint(&DEPLOYER, &ALICE, 1), Err(TokenError::Paused));

    // Unpaused + restricted, on a fresh deployment since normal is final
    let mut token = deployed();
    token.grant_role(&DEPLOYER, &MINTER_ROLE, &DEPLOYER).unwrap();
    token.mint(&DEPLOYER, &DEPLOYER, 10).unwrap();
    token.set_transfer_mode(&DEPLOYER, 1).unwrap();
    assert!(!token.paused());
    assert_eq!(
        token.transfer(&DEPLOYER, &ALICE, 1),
        Err(TokenError::TransferRestricted)
    );
}

#[test]
fn engine_scenario_controlled() {
    let access = NoRoles;
    let state = ModuleState {
        transfer_controller: CAROL,
        transfer_mode: TransferMode::Controlled,
    };
    let engine = TransferEngine::new(state, &access);
    assert_eq!(engine.authorize(&ALICE, &BOB, 10), Err(TokenError::TransferInvalid));
    assert_eq!(engine.authorize(&ALICE, &CAROL, 10), Ok(()));
}

fn any_address() -> impl Strategy<Value = Address> {
    prop_oneof![
        Just(Address::ZERO),
        Just(ALICE),
        Just(BOB),
        Just(CAROL),
        any::<[u8; 20]>().prop_map(Address::new),
    ]
}

proptest! {
    #[test]
    fn restricted_rejects_every_movement(from in any_address(), to in any_address(), amount in any::<u64>(), controller in any_address()) {
        let access = NoRoles;
        let engine = TransferEngine::new(
            ModuleState { transfer_controller: controller, transfer_mode: TransferMode::Restricted },
            &access,
        );
        prop_assert_eq!(engine.authorize(&from, &to, amount), Err(TokenError::TransferRestricted));
    }

    #[test]
    fn controlled_accepts_iff_controller_is_party(from in any_address(), to in any_address(), amount in any::<u64>(), controller in any_address()) {
        let access = NoRoles;
        let engine = TransferEngine::new(
            ModuleState { transfer_controller: controller, transfer_mode: TransferMode::Controlled },
            &access,
        );
        let expected = if from == controller || to == controller {
            Ok(())
        } else {
            Err(TokenError::TransferInvalid)
        };
        prop_assert_eq!(engine.authorize(&from, &to, amount), expected);
    }

    #[test]
    fn normal_accepts_every_movement(from in any_address(), to in any_address(), amount in any::<u64>()) {
        let access = NoRoles;
        let engine = TransferEngine::new(
            ModuleState { transfer_controller: CAROL, transfer_mode: TransferMode::Normal },
            &access,
        );
        prop_assert_eq!(engine.authorize(&from, &to, amount), Ok(()));
    }

    #[test]
    fn normal_is_final(raw in any::<u8>()) {
        let access = NoRoles;
        let mut engine = TransferEngine::new(
            ModuleState { transfer_controller: CAROL, transfer_mode: TransferMode::Normal },
            &access,
        );
        let result = engine.set_transfer_mode(&CAROL, raw);
        if raw <= 2 {
            prop_assert_eq!(result, Ok(None));
        } else {
            prop_assert_eq!(result, Err(TokenError::InvalidMode(raw)));
        }
        prop_assert_eq!(engine.transfer_mode(), TransferMode::Normal);
    }

    #[test]
    fn authorized_change_sets_exact_mode(start in 1u8..=2, target in 0u8..=2) {
        let access = NoRoles;
        let start = TransferMode::try_from(start).unwrap();
        let mut engine = TransferEngine::new(
            ModuleState { transfer_controller: CAROL, transfer_mode: start },
            &access,
        );
        let target_mode = TransferMode::try_from(target).unwrap();
        prop_assert_eq!(engine.set_transfer_mode(&CAROL, target), Ok(Some((start, target_mode))));
        prop_assert_eq!(engine.transfer_mode(), target_mode);
    }
}
