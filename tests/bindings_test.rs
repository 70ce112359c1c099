//! Typed bindings driven against the in-process dev chain

use std::sync::Arc;

use alloy::primitives::{TxKind, U256};
use alloy_sol_types::SolCall;

use greeter_console::domain::contract::{
    BindingError, GasLimit, GasLimitAndRequiredValue, GreeterError, GreeterEvent, IGreeter,
    METHODS,
};
use greeter_console::infrastructure::contract::Greeter;
use greeter_console::infrastructure::ethereum::{
    ContractExecutor, DevChain, GreeterState, DEV_ACCOUNT, DEV_CONTRACT,
};

fn bind(chain: &DevChain) -> Greeter {
    Greeter::new(DEV_CONTRACT, Arc::new(chain.clone()))
}

fn paid(value: u128) -> GasLimitAndRequiredValue {
    GasLimitAndRequiredValue::new(None, U256::from(value))
}

async fn greeting(greeter: &Greeter) -> String {
    greeter
        .query()
        .greet(GasLimit::default())
        .await
        .unwrap()
        .into_value()
        .unwrap()
}

async fn locked(greeter: &Greeter) -> bool {
    greeter
        .query()
        .get_lock_state(GasLimit::default())
        .await
        .unwrap()
        .into_value()
        .unwrap()
}

#[tokio::test]
async fn test_set_message_then_greet() {
    let chain = DevChain::new();
    let greeter = bind(&chain);

    let outcome = greeter.tx().set_message("hello", 100, paid(100)).await.unwrap();
    assert!(outcome.success);
    assert!(outcome.events.is_empty());
    assert_eq!(outcome.block_number, Some(1));

    assert_eq!(greeting(&greeter).await, "hello");
    assert!(!locked(&greeter).await);
}

#[tokio::test]
async fn test_set_message_below_minimum_reverts() {
    let chain = DevChain::new();
    let greeter = bind(&chain);

    let err = greeter
        .tx()
        .set_message("cheap", 99, paid(99))
        .await
        .unwrap_err();
    assert_eq!(err.contract_error(), Some(GreeterError::InsufficientBalance));
    assert_eq!(greeting(&greeter).await, "Hello ink!");
    assert_eq!(chain.block_number().unwrap(), 0);
}

#[tokio::test]
async fn test_unlock_requires_one_thousand() {
    let chain = DevChain::with_state(GreeterState::new("You won!", true, 6));
    let greeter = bind(&chain);

    let err = greeter.tx().unlock(999, paid(999)).await.unwrap_err();
    assert!(matches!(
        err,
        BindingError::Contract(GreeterError::InsufficientBalance)
    ));
    assert!(locked(&greeter).await);

    let outcome = greeter.tx().unlock(1000, paid(1000)).await.unwrap();
    assert!(outcome.events.is_empty());
    assert!(!locked(&greeter).await);
}

#[tokio::test]
async fn test_unlock_when_open_reports_not_locked() {
    let chain = DevChain::new();
    let greeter = bind(&chain);

    let outcome = greeter.tx().unlock(1000, paid(1000)).await.unwrap();
    assert_eq!(
        outcome.events,
        vec![GreeterEvent::Locked {
            message: "Contract is Not Locked!".to_string()
        }]
    );
    assert!(!locked(&greeter).await);
}

#[tokio::test]
async fn test_sixth_update_wins_and_locks() {
    let chain = DevChain::new();
    let greeter = bind(&chain);
    let start = chain.native_balance(DEV_ACCOUNT).await.unwrap();

    for round in 1..=5 {
        greeter
            .tx()
            .set_message(format!("round {round}"), 100, paid(100))
            .await
            .unwrap();
    }
    assert_eq!(greeting(&greeter).await, "round 5");
    assert_eq!(
        greeter
            .query()
            .get_balance(GasLimit::default())
            .await
            .unwrap()
            .into_value()
            .unwrap(),
        500
    );

    let outcome = greeter
        .tx()
        .set_message("round 6", 100, paid(100))
        .await
        .unwrap();
    assert!(outcome.events.is_empty());
    assert_eq!(greeting(&greeter).await, "You won!");
    assert!(locked(&greeter).await);

    // the whole pot goes back to the winner
    assert_eq!(chain.native_balance(DEV_CONTRACT).await.unwrap(), U256::ZERO);
    assert_eq!(chain.native_balance(DEV_ACCOUNT).await.unwrap(), start);

    // locked: further updates are accepted but only emit a notice
    let outcome = greeter
        .tx()
        .set_message("round 7", 100, paid(100))
        .await
        .unwrap();
    assert_eq!(
        outcome.events,
        vec![GreeterEvent::Locked {
            message: "Contract is Locked!".to_string()
        }]
    );
    assert_eq!(greeting(&greeter).await, "You won!");
    assert_eq!(chain.greeter_state().unwrap().count, 6);
}

#[tokio::test]
async fn test_mixed_methods_route_reads_and_writes() {
    let chain = DevChain::new();
    let greeter = bind(&chain);
    let methods = greeter.methods();

    methods.set_message("mixed", 100, paid(100)).await.unwrap();
    assert_eq!(chain.block_number().unwrap(), 1);

    let value = methods.greet(GasLimit::default()).await.unwrap();
    assert_eq!(value.into_value().unwrap(), "mixed");
    // reads never produce a block
    assert_eq!(chain.block_number().unwrap(), 1);
}

#[tokio::test]
async fn test_query_dry_run_reports_contract_error() {
    let chain = DevChain::new();
    let greeter = bind(&chain);

    let ret = greeter.query().unlock(10, paid(10)).await.unwrap();
    assert_eq!(
        ret.into_value().unwrap(),
        Err(GreeterError::InsufficientBalance)
    );
    let ret = greeter.query().set_message("ok", 100, paid(100)).await.unwrap();
    assert_eq!(ret.into_value().unwrap(), Ok(()));
    assert_eq!(greeting(&greeter).await, "Hello ink!");
}

#[test]
fn test_extrinsic_keeps_declared_argument_order() {
    let chain = DevChain::new();
    let greeter = bind(&chain);

    let request = greeter
        .build_extrinsic()
        .set_message("ordered", 150, paid(150));
    assert_eq!(request.to, Some(TxKind::Call(DEV_CONTRACT)));
    assert_eq!(request.value, Some(U256::from(150u64)));

    let input = request.input.input().unwrap();
    assert_eq!(input[..4], IGreeter::setMessageCall::SELECTOR);
    let decoded = IGreeter::setMessageCall::abi_decode(input).unwrap();
    assert_eq!(decoded.newMessage, "ordered");
    assert_eq!(decoded.value, 150);
}

#[test]
fn test_extrinsics_encode_every_method() {
    let chain = DevChain::new();
    let greeter = bind(&chain);
    let builder = greeter.build_extrinsic();
    // value offered to every method; only payable ones carry it
    let offered = paid(5);

    let requests = [
        ("getBalance", builder.get_balance(offered)),
        ("greet", builder.greet(offered)),
        ("setMessage", builder.set_message("first", 2000, offered)),
        ("getLockState", builder.get_lock_state(offered)),
        ("unlock", builder.unlock(1000, offered)),
    ];
    assert_eq!(requests.len(), METHODS.len());

    for ((name, request), method) in requests.iter().zip(METHODS.iter()) {
        assert_eq!(*name, method.name);
        assert_eq!(request.to, Some(TxKind::Call(DEV_CONTRACT)));
        let input = request.input.input().unwrap();
        assert_eq!(input[..4], method.selector, "{name}");
        if method.inputs.is_empty() {
            assert_eq!(input.len(), 4, "{name} takes no arguments");
        }
        let expected_value = method.payable.then(|| U256::from(5u64));
        assert_eq!(request.value, expected_value, "{name}");
    }

    let set = IGreeter::setMessageCall::abi_decode(requests[2].1.input.input().unwrap()).unwrap();
    assert_eq!((set.newMessage.as_str(), set.value), ("first", 2000));
    let unlock = IGreeter::unlockCall::abi_decode(requests[4].1.input.input().unwrap()).unwrap();
    assert_eq!(unlock.value, 1000);
    assert_eq!(
        requests[0].1.input.input().unwrap()[..],
        IGreeter::getBalanceCall::SELECTOR
    );
}

#[tokio::test]
async fn test_no_signer_cannot_send() {
    let chain = DevChain::new();
    let greeter = Greeter::new(DEV_CONTRACT, Arc::new(chain.with_signer(None)));

    assert!(greeter.caller().is_none());
    let err = greeter
        .tx()
        .set_message("anon", 100, paid(100))
        .await
        .unwrap_err();
    assert!(matches!(err, BindingError::NoSigner));
    // reads still work
    assert_eq!(greeting(&greeter).await, "Hello ink!");
}
