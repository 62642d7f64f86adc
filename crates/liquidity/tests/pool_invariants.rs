use ledger_core::{Address, AssetVault, Caller, InMemoryVault, ManualClock};
use liquidity::{Deployment, LiquidityError};
use proptest::prelude::*;
use rewards::RewardTokenLedger;

const INVESTORS: u8 = 4;
const STARTING_BALANCE: u64 = 10_000;

type TestDeployment = Deployment<InMemoryVault, RewardTokenLedger, ManualClock>;

#[derive(Debug, Clone)]
enum Op {
    Invest { investor: u8, amount: u64 },
    Withdraw { investor: u8, amount: u64 },
    Distribute { admin: bool, profit: u64 },
    DrainReserve { amount: u64 },
    Tick { epochs: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..INVESTORS, 0u64..4_000).prop_map(|(investor, amount)| Op::Invest { investor, amount }),
        4 => (0..INVESTORS, 0u64..4_000).prop_map(|(investor, amount)| Op::Withdraw { investor, amount }),
        2 => (any::<bool>(), 0u64..1_000).prop_map(|(admin, profit)| Op::Distribute { admin, profit }),
        1 => (0u64..2_000).prop_map(|amount| Op::DrainReserve { amount }),
        1 => (0u64..10).prop_map(|epochs| Op::Tick { epochs }),
    ]
}

fn admin() -> Caller {
    Caller::new(Address::repeat_byte(0xad))
}

fn investor(index: u8) -> Caller {
    Caller::new(Address::repeat_byte(index + 1))
}

fn setup() -> (TestDeployment, ManualClock) {
    let clock = ManualClock::new(0);
    let vault = InMemoryVault::with_balances(
        (0..INVESTORS).map(|i| (investor(i).address(), STARTING_BALANCE)),
    )
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

fn stake_sum(deployment: &TestDeployment) -> u128 {
    deployment
        .snapshot()
        .unwrap()
        .investor_stakes
        .values()
        .map(|s| *s as u128)
        .sum()
}

proptest! {
    #[test]
    fn ledger_invariants_hold(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let (mut deployment, clock) = setup();

        for op in ops {
            let profit_before = deployment.total_profit().unwrap();
            let reserve_before = deployment.reserve_value().unwrap();
            let snapshot_before = deployment.snapshot().unwrap();

            let result = match &op {
                Op::Invest { investor: i, amount } => deployment.invest(&investor(*i), *amount),
                Op::Withdraw { investor: i, amount } => deployment.withdraw(&investor(*i), *amount),
                Op::Distribute { admin: true, profit } => deployment.distribute_profits(&admin(), *profit),
                Op::Distribute { admin: false, profit } => deployment.distribute_profits(&investor(0), *profit),
                Op::DrainReserve { amount } => {
                    let reserve = deployment.pool_mut().unwrap().reserve_mut();
                    let amount = (*amount).min(reserve.value());
                    let drained = reserve.extract(amount).unwrap();
                    deployment.vault_mut().deposit(&admin().address(), drained).unwrap();
                    Ok(())
                }
                Op::Tick { epochs } => {
                    clock.advance(*epochs).unwrap();
                    Ok(())
                }
            };

            // Total liquidity always equals the sum of stakes
            prop_assert_eq!(deployment.total_liquidity().unwrap() as u128, stake_sum(&deployment));
            prop_assert!(deployment.check_invariants().is_ok());
            prop_assert!(deployment.total_profit().unwrap() >= profit_before);

            let reserve_after = deployment.reserve_value().unwrap();
            match (&op, &result) {
                (Op::Invest { amount, .. }, Ok(())) => prop_assert_eq!(reserve_after, reserve_before + amount),
                (Op::Withdraw { amount, .. }, Ok(())) => prop_assert_eq!(reserve_after, reserve_before - amount),
                (Op::Distribute { .. }, _) => prop_assert_eq!(reserve_after, reserve_before),
                (Op::Invest { .. } | Op::Withdraw { .. }, Err(_)) => {
                    prop_assert_eq!(deployment.snapshot().unwrap(), snapshot_before);
                }
                _ => {}
            }

            if let (Op::Distribute { admin: false, .. }, Err(e)) = (&op, &result) {
                prop_assert_eq!(e, &LiquidityError::Unauthorized(investor(0).address()));
            }
        }
    }

    #[test]
    fn assets_are_conserved(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let (mut deployment, _) = setup();
        let initial = INVESTORS as u128 * STARTING_BALANCE as u128;

        for op in ops {
            let _ = match op {
                Op::Invest { investor: i, amount } => deployment.invest(&investor(i), amount),
                Op::Withdraw { investor: i, amount } => deployment.withdraw(&investor(i), amount),
                _ => Ok(()),
            };

            let held = deployment.vault().total_balances() + deployment.reserve_value().unwrap() as u128;
            prop_assert_eq!(held, initial);
            prop_assert_eq!(
                deployment.rewards().circulating_supply(),
                deployment.total_liquidity().unwrap()
            );
        }
    }
}
