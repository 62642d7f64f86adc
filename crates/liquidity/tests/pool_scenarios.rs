use ledger_core::{Address, AssetVault, Caller, InMemoryVault, ManualClock};
use liquidity::{Deployment, LiquidityError};
use rewards::RewardTokenLedger;

type TestDeployment = Deployment<InMemoryVault, RewardTokenLedger, ManualClock>;

fn admin() -> Caller {
    Caller::new(Address::repeat_byte(0xad))
}

fn alice() -> Caller {
    Caller::new(Address::repeat_byte(0xa1))
}

fn bob() -> Caller {
    Caller::new(Address::repeat_byte(0xb0))
}

fn mallory() -> Caller {
    Caller::new(Address::repeat_byte(0x66))
}

fn setup() -> (TestDeployment, ManualClock) {
    let clock = ManualClock::new(100);
    let vault = InMemoryVault::with_balances([
        (alice().address(), 1_000),
        (bob().address(), 1_000),
    ])
    .unwrap();
    let mut deployment = Deployment::new(
        admin().address(),
        vault,
        RewardTokenLedger::default(),
        clock.clone(),
    );
    deployment.initialize(&admin()).unwrap();
    (deployment, clock)
}

/// Encoded pool state plus the collaborator balances it touches
fn state_bytes(deployment: &TestDeployment) -> Vec<u8> {
    let snapshot = deployment.snapshot().unwrap();
    let balances: Vec<u64> = [alice(), bob()]
        .iter()
        .flat_map(|c| {
            [
                deployment.vault().balance_of(&c.address()),
                deployment.rewards().balance_of(&c.address()),
            ]
        })
        .collect();
    bincode::serialize(&(snapshot, balances)).unwrap()
}

#[test]
fn two_investors_accumulate_liquidity() {
    let (mut deployment, _) = setup();

    deployment.invest(&alice(), 500).unwrap();
    deployment.invest(&bob(), 300).unwrap();

    assert_eq!(deployment.total_liquidity().unwrap(), 800);
    assert_eq!(deployment.investor_stake(&alice().address()).unwrap(), 500);
    assert_eq!(deployment.investor_stake(&bob().address()).unwrap(), 300);
    assert_eq!(deployment.reserve_value().unwrap(), 800);
    deployment.check_invariants().unwrap();
}

#[test]
fn invest_then_withdraw_round_trips() {
    let (mut deployment, _) = setup();
    let stake_before = deployment.investor_stake(&alice().address()).unwrap();
    let funds_before = deployment.vault().balance_of(&alice().address());

    deployment.invest(&alice(), 100).unwrap();
    assert_eq!(deployment.rewards().balance_of(&alice().address()), 100);
    deployment.withdraw(&alice(), 100).unwrap();

    assert_eq!(deployment.investor_stake(&alice().address()).unwrap(), stake_before);
    assert_eq!(deployment.vault().balance_of(&alice().address()), funds_before);
    assert_eq!(deployment.rewards().balance_of(&alice().address()), 0);
    assert_eq!(deployment.rewards().total_minted(), 100);
    assert_eq!(deployment.rewards().total_burned(), 100);
}

#[test]
fn withdraw_exact_stake_and_reserve_empties_both() {
    let (mut deployment, _) = setup();
    deployment.invest(&alice(), 250).unwrap();

    deployment.withdraw(&alice(), 250).unwrap();

    assert_eq!(deployment.investor_stake(&alice().address()).unwrap(), 0);
    assert_eq!(deployment.reserve_value().unwrap(), 0);
    assert_eq!(deployment.total_liquidity().unwrap(), 0);
}

#[test]
fn withdraw_without_stake_fails() {
    let (mut deployment, _) = setup();
    let before = state_bytes(&deployment);

    assert_eq!(
        deployment.withdraw(&bob(), 1),
        Err(LiquidityError::NoStake(bob().address()))
    );
    assert_eq!(deployment.investor_stake(&bob().address()).unwrap(), 0);
    assert_eq!(state_bytes(&deployment), before);
}

#[test]
fn withdraw_beyond_stake_leaves_state_unchanged() {
    let (mut deployment, _) = setup();
    deployment.invest(&alice(), 500).unwrap();
    let before = state_bytes(&deployment);

    assert_eq!(
        deployment.withdraw(&alice(), 600),
        Err(LiquidityError::InsufficientStake { required: 600, available: 500 })
    );
    assert_eq!(state_bytes(&deployment), before);
}

#[test]
fn drained_reserve_blocks_withdrawal() {
    let (mut deployment, _) = setup();
    deployment.invest(&alice(), 500).unwrap();

    // Funds deployed elsewhere leave 100 in custody
    let deployed = deployment
        .pool_mut()
        .unwrap()
        .reserve_mut()
        .extract(400)
        .unwrap();
    deployment
        .vault_mut()
        .deposit(&admin().address(), deployed)
        .unwrap();
    assert_eq!(deployment.reserve_value().unwrap(), 100);
    let before = state_bytes(&deployment);

    assert_eq!(
        deployment.withdraw(&alice(), 200),
        Err(LiquidityError::InsufficientPoolLiquidity { required: 200, available: 100 })
    );
    assert_eq!(deployment.investor_stake(&alice().address()).unwrap(), 500);
    assert_eq!(state_bytes(&deployment), before);

    // Whatever is still in custody can be paid out
    deployment.withdraw(&alice(), 100).unwrap();
    assert_eq!(deployment.investor_stake(&alice().address()).unwrap(), 400);
    assert_eq!(deployment.reserve_value().unwrap(), 0);
    deployment.check_invariants().unwrap();
}

#[test]
fn invest_beyond_balance_leaves_state_unchanged() {
    let (mut deployment, _) = setup();
    let before = state_bytes(&deployment);

    assert_eq!(
        deployment.invest(&alice(), 1_001),
        Err(LiquidityError::InsufficientBalance { required: 1_001, available: 1_000 })
    );
    assert_eq!(state_bytes(&deployment), before);
}

#[test]
fn invest_overflow_is_rejected() {
    let whale = Caller::new(Address::repeat_byte(0x77));
    let clock = ManualClock::new(0);
    let vault = InMemoryVault::with_balances([(whale.address(), u64::MAX), (alice().address(), 10)]).unwrap();
    let mut deployment = Deployment::new(admin().address(), vault, RewardTokenLedger::default(), clock);
    deployment.initialize(&admin()).unwrap();

    deployment.invest(&whale, u64::MAX).unwrap();
    let before = deployment.snapshot().unwrap();

    assert!(matches!(
        deployment.invest(&alice(), 1),
        Err(LiquidityError::Overflow(_))
    ));
    assert_eq!(deployment.snapshot().unwrap(), before);
    assert_eq!(deployment.vault().balance_of(&alice().address()), 10);
}

#[test]
fn profit_distribution_is_counter_only() {
    let (mut deployment, clock) = setup();
    deployment.invest(&alice(), 500).unwrap();

    clock.advance(5).unwrap();
    deployment.distribute_profits(&admin(), 50).unwrap();
    clock.advance(7).unwrap();
    deployment.distribute_profits(&admin(), 50).unwrap();

    assert_eq!(deployment.total_profit().unwrap(), 100);
    assert_eq!(deployment.last_profit_distribution().unwrap(), 112);
    assert_eq!(deployment.reserve_value().unwrap(), 500);
    assert_eq!(deployment.total_liquidity().unwrap(), 500);
    assert_eq!(deployment.investor_stake(&alice().address()).unwrap(), 500);
}

#[test]
fn non_admin_cannot_administer() {
    let (mut deployment, _) = setup();
    deployment.invest(&alice(), 500).unwrap();
    let before = state_bytes(&deployment);

    assert_eq!(
        deployment.distribute_profits(&mallory(), 50),
        Err(LiquidityError::Unauthorized(mallory().address()))
    );
    assert_eq!(
        deployment.initialize(&mallory()),
        Err(LiquidityError::Unauthorized(mallory().address()))
    );
    assert_eq!(state_bytes(&deployment), before);
}

#[test]
fn non_admin_cannot_initialize_fresh_deployment() {
    let mut deployment: TestDeployment = Deployment::new(
        admin().address(),
        InMemoryVault::new(),
        RewardTokenLedger::default(),
        ManualClock::new(0),
    );

    assert_eq!(
        deployment.initialize(&mallory()),
        Err(LiquidityError::Unauthorized(mallory().address()))
    );
    assert_eq!(
        deployment.distribute_profits(&mallory(), 1),
        Err(LiquidityError::Unauthorized(mallory().address()))
    );
    assert!(!deployment.is_initialized());
}

#[test]
fn snapshot_serializes_to_json() {
    let (mut deployment, _) = setup();
    deployment.invest(&alice(), 500).unwrap();

    let snapshot = deployment.snapshot().unwrap();
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["total_liquidity"], 500);
    assert_eq!(json["investor_stakes"][alice().address().to_hex()], 500);
    assert_eq!(json["admin"], admin().address().to_hex());
}
