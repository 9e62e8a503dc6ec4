//! Execution of every family of governance action, outbound calls included.

mod common;

use common::*;
use templ_curve::{CurveSegment, FeeCurve};
use templ_engine::{TemplError, TemplEvent};
use templ_governance::{ExternalCall, GovernanceError, ProposalAction, SplitUpdate};
use templ_host::TemplCall;
use templ_nullables::{NullReentrant, NullReverter, NullStaking, StakingCall, TokenCall};
use templ_treasury::TreasuryError;
use templ_types::{Address, Asset};

/// Priest plus bob. With two members the proposer's own vote is quorum.
/// Custody 600: 300 owed to the priest, 300 in the treasury.
fn pair() -> (Fixture, Address) {
    let (fx, m) = with_members(1);
    (fx, m[0])
}

fn vault() -> Address {
    addr(0x5a)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn update_config_sets_entry_fee() {
    let (mut fx, bob) = pair();
    fx.pass(
        bob,
        &[],
        ProposalAction::UpdateConfig {
            entry_fee: Some(2_000),
            split: None,
        },
    )
    .unwrap();
    assert_eq!(fx.templ.current_entry_fee(), 2_000);
    assert_eq!(fx.join(addr(11)).fee.fee, 2_000);
}

#[test]
fn update_config_replaces_split_keeping_protocol_share() {
    let (mut fx, bob) = pair();
    fx.pass(
        bob,
        &[],
        ProposalAction::UpdateConfig {
            entry_fee: None,
            split: Some(SplitUpdate {
                burn_bps: 0,
                treasury_bps: 5_000,
                member_pool_bps: 4_000,
            }),
        },
    )
    .unwrap();
    let split = fx.templ.settings().split;
    assert_eq!(split.protocol_bps, 1_000);

    let receipt = fx.join(addr(11));
    assert_eq!(receipt.fee.burn, 0);
    assert_eq!(receipt.fee.treasury, 500);
    assert_eq!(receipt.fee.member_pool, 400);
}

#[test]
fn split_not_totalling_ten_thousand_fails_on_execution() {
    let (mut fx, bob) = pair();
    let result = fx.pass(
        bob,
        &[],
        ProposalAction::UpdateConfig {
            entry_fee: None,
            split: Some(SplitUpdate {
                burn_bps: 5_000,
                treasury_bps: 5_000,
                member_pool_bps: 5_000,
            }),
        },
    );
    assert_eq!(
        result,
        Err(TemplError::Treasury(TreasuryError::InvalidPercentageSplit {
            total: 16_000
        }))
    );
}

#[test]
fn empty_config_update_is_rejected_up_front() {
    let (mut fx, bob) = pair();
    assert_eq!(
        fx.propose(
            bob,
            ProposalAction::UpdateConfig {
                entry_fee: None,
                split: None,
            }
        ),
        Err(TemplError::Governance(GovernanceError::EmptyUpdate))
    );
}

#[test]
fn max_members_cannot_drop_below_current_count() {
    let (mut fx, bob) = pair();
    assert_eq!(
        fx.pass(bob, &[], ProposalAction::SetMaxMembers { max_members: 1 }),
        Err(TemplError::MemberLimitTooLow { max: 1, current: 2 })
    );

    fx.host.advance(PAST_VOTING);
    fx.pass(bob, &[], ProposalAction::SetMaxMembers { max_members: 2 })
        .unwrap();
    assert!(fx.templ.settings().join_paused);
}

#[test]
fn new_curve_with_explicit_base() {
    let (mut fx, bob) = pair();
    let curve = FeeCurve::new(vec![CurveSegment::linear(1_000, 0)]).unwrap();
    fx.pass(
        bob,
        &[],
        ProposalAction::SetEntryFeeCurve {
            curve: curve.clone(),
            base_entry_fee: Some(1_000),
        },
    )
    .unwrap();
    assert_eq!(fx.templ.settings().curve, curve);
    // one paid join already on the curve
    assert_eq!(fx.templ.current_entry_fee(), 1_100);
}

#[test]
fn new_fee_on_a_growing_curve_is_the_next_price() {
    let mut fx = Fixture::with_config(templ_engine::TemplConfig {
        curve: FeeCurve::new(vec![CurveSegment::linear(100, 0)]).unwrap(),
        ..config()
    });
    let bob = addr(10);
    fx.join(bob);
    assert_eq!(fx.templ.current_entry_fee(), 1_010);

    fx.pass(
        bob,
        &[],
        ProposalAction::UpdateConfig {
            entry_fee: Some(2_000),
            split: None,
        },
    )
    .unwrap();
    // 2_000 / 1.01 is fractional; the anchor is chosen so the price lands exactly
    assert_eq!(fx.templ.settings().base_entry_fee, 1_990);
    assert_eq!(fx.templ.current_entry_fee(), 2_000);
    assert_eq!(fx.join(addr(11)).fee.fee, 2_000);
}

#[test]
fn new_curve_without_base_keeps_the_current_price() {
    let (mut fx, bob) = pair();
    assert_eq!(fx.templ.current_entry_fee(), 1_000);
    let curve = FeeCurve::new(vec![CurveSegment::exponential(11_000, 0)]).unwrap();
    fx.pass(
        bob,
        &[],
        ProposalAction::SetEntryFeeCurve {
            curve,
            base_entry_fee: None,
        },
    )
    .unwrap();

    assert_eq!(fx.templ.settings().base_entry_fee, 910);
    assert_eq!(fx.templ.current_entry_fee(), 1_000);
    assert_eq!(fx.join(addr(11)).fee.fee, 1_000);
    // the curve takes over from there: 910 * 1.1^2
    assert_eq!(fx.templ.current_entry_fee(), 1_100);
}

#[test]
fn governance_parameters_update() {
    let (mut fx, bob) = pair();
    fx.pass(bob, &[], ProposalAction::SetQuorumBps { bps: 5_000 })
        .unwrap();
    assert_eq!(fx.templ.governance().params().quorum_bps, 5_000);

    assert!(matches!(
        fx.propose(bob, ProposalAction::SetQuorumBps { bps: 0 }),
        Err(TemplError::Governance(GovernanceError::InvalidPercentage { .. }))
    ));
}

#[test]
fn change_priest_emits_event() {
    let (mut fx, bob) = pair();
    fx.pass(bob, &[], ProposalAction::ChangePriest { new_priest: bob })
        .unwrap();
    assert_eq!(fx.templ.settings().priest, bob);
    assert!(fx.templ.events().iter().any(|e| *e
        == TemplEvent::PriestChanged {
            old: priest(),
            new: bob,
        }));
}

#[test]
fn zero_burn_address_is_rejected() {
    let (mut fx, bob) = pair();
    assert_eq!(
        fx.propose(
            bob,
            ProposalAction::SetBurnAddress {
                burn_address: Address::ZERO
            }
        ),
        Err(TemplError::Governance(GovernanceError::InvalidRecipient))
    );
}

// ---------------------------------------------------------------------------
// External calls
// ---------------------------------------------------------------------------

fn approve_and_stake(amount: u128) -> ProposalAction {
    ProposalAction::BatchCallExternal {
        targets: vec![token(), vault()],
        values: vec![0, 0],
        calldatas: vec![
            TokenCall::Approve {
                spender: vault(),
                amount,
            }
            .encode(),
            StakingCall::Stake {
                token: token(),
                amount,
            }
            .encode(),
        ],
    }
}

#[test]
fn batch_approves_then_stakes_treasury_funds() {
    let (mut fx, bob) = pair();
    fx.host.deploy(vault(), NullStaking);

    fx.pass(bob, &[], approve_and_stake(200)).unwrap();

    assert_eq!(fx.balance(access(), vault()), 200);
    assert_eq!(
        fx.host
            .storage(&vault(), &NullStaking::stake_key(&templ_address(), &token())),
        200
    );
    assert_eq!(fx.custody(), 400);
    let info = fx.templ.treasury_info(&fx.host);
    assert_eq!(info.member_pool_balance, 300);
    assert_eq!(info.treasury_balance, 100);

    let executed: Vec<usize> = fx
        .templ
        .events()
        .iter()
        .filter_map(|e| match e {
            TemplEvent::ExternalCallExecuted { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(executed, vec![0, 1]);
}

#[test]
fn failing_call_aborts_whole_batch() {
    let (mut fx, bob) = pair();
    let reverter = addr(0x66);
    fx.host.deploy(reverter, NullReverter::new("nope"));

    let action = ProposalAction::BatchCallExternal {
        targets: vec![token(), reverter],
        values: vec![0, 0],
        calldatas: vec![
            TokenCall::Approve {
                spender: vault(),
                amount: 200,
            }
            .encode(),
            Vec::new(),
        ],
    };
    let err = fx.pass(bob, &[], action).unwrap_err();
    assert!(matches!(
        err,
        TemplError::ExternalCallFailed { index: 1, target, .. } if target == reverter
    ));
    // the approval from call 0 is gone too
    assert_eq!(fx.host.allowance(&token(), &templ_address(), &vault()), 0);
}

#[test]
fn calls_may_not_touch_member_rewards() {
    let (mut fx, bob) = pair();
    let action = ProposalAction::CallExternal {
        call: ExternalCall {
            target: token(),
            value: 0,
            calldata: TokenCall::Transfer {
                to: addr(500),
                amount: 500,
            }
            .encode(),
        },
    };
    assert_eq!(
        fx.pass(bob, &[], action),
        Err(TemplError::InsufficientTreasuryBalance {
            asset: access(),
            available: 100,
            requested: 300,
        })
    );
    assert_eq!(fx.custody(), 600);
    assert_eq!(fx.balance(access(), addr(500)), 0);
}

#[test]
fn native_value_reaches_plain_accounts() {
    let (mut fx, bob) = pair();
    fx.host.fund(Asset::Native, templ_address(), 50);
    let action = ProposalAction::CallExternal {
        call: ExternalCall {
            target: addr(600),
            value: 50,
            calldata: Vec::new(),
        },
    };
    fx.pass(bob, &[], action).unwrap();
    assert_eq!(fx.balance(Asset::Native, addr(600)), 50);
}

#[test]
fn reentrant_target_aborts_execution() {
    let (mut fx, bob) = pair();
    let hook = addr(0x77);
    fx.host.deploy(
        hook,
        NullReentrant {
            call: TemplCall::Execute { proposal_id: 0 },
        },
    );
    let action = ProposalAction::CallExternal {
        call: ExternalCall {
            target: hook,
            value: 0,
            calldata: Vec::new(),
        },
    };
    let err = fx.pass(bob, &[], action).unwrap_err();
    assert!(matches!(err, TemplError::ReentrancyGuardReentrantCall { .. }));
    assert_eq!(fx.templ.proposal(0).map(|p| p.executed), Some(false));
}

#[test]
fn malformed_calls_are_rejected_at_proposal_time() {
    let (mut fx, bob) = pair();

    let self_call = ProposalAction::CallExternal {
        call: ExternalCall {
            target: templ_address(),
            value: 0,
            calldata: Vec::new(),
        },
    };
    assert!(matches!(
        fx.propose(bob, self_call),
        Err(TemplError::Governance(GovernanceError::InvalidCallData(_)))
    ));

    let mismatched = ProposalAction::BatchCallExternal {
        targets: vec![token(), vault()],
        values: vec![0],
        calldatas: vec![Vec::new(), Vec::new()],
    };
    assert!(matches!(
        fx.propose(bob, mismatched),
        Err(TemplError::Governance(GovernanceError::InvalidCallData(_)))
    ));

    let oversized = ProposalAction::CallExternal {
        call: ExternalCall {
            target: token(),
            value: 0,
            calldata: vec![0u8; 4_097],
        },
    };
    assert!(matches!(
        fx.propose(bob, oversized),
        Err(TemplError::Governance(GovernanceError::InvalidCallData(_)))
    ));
    assert_eq!(fx.templ.proposal_count(), 0);
}
