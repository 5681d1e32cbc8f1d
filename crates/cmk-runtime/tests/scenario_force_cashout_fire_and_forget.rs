//! ForceCashout strategy contract: the callback is invoked exactly once per
//! evaluation, the caller is still told `false` synchronously, and the
//! callback outcome is never observed (fire-and-forget).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use uuid::Uuid;

use cmk_config::GateConfig;
use cmk_gate::{LockupStrategy, TransactionSource};
use cmk_runtime::{CreditGate, ForceCashout};
use cmk_signals::{DisableSignals, ExemptFaults, OverlayTracker, RoundPhaseTracker};

struct IdleBank;

impl TransactionSource for IdleBank {
    fn current_transaction_id(&self) -> Result<Option<Uuid>> {
        Ok(None)
    }
}

fn gate_with(strategy: LockupStrategy) -> CreditGate {
    let (_dtx, d) = watch::channel(DisableSignals::new());
    let (_rtx, r) = watch::channel(RoundPhaseTracker::new());
    let (_otx, o) = watch::channel(OverlayTracker::new());

    CreditGate::builder()
        .disable_feed(d)
        .round_feed(r)
        .overlay_feed(o)
        .transaction_source(Arc::new(IdleBank))
        .gate_config(GateConfig {
            lockup_strategy: strategy,
            exempt_faults: ExemptFaults::standard(),
        })
        .build()
        .unwrap()
}

#[test]
fn callback_invoked_exactly_once_per_call_and_false_returned() {
    let gate = gate_with(LockupStrategy::ForceCashout);

    let calls = AtomicUsize::new(0);
    let cb = || {
        calls.fetch_add(1, Ordering::SeqCst);
    };

    let permitted = gate
        .can_cashout_in_lockup(true, true, Some(&cb as &ForceCashout))
        .unwrap();
    assert!(!permitted);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // At most once PER call: a second evaluation fires again.
    let permitted = gate
        .can_cashout_in_lockup(true, true, Some(&cb as &ForceCashout))
        .unwrap();
    assert!(!permitted);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn missing_callback_is_not_an_error() {
    let gate = gate_with(LockupStrategy::ForceCashout);
    assert!(!gate.can_cashout_in_lockup(true, true, None).unwrap());
}

#[test]
fn other_strategies_never_invoke_the_callback() {
    let calls = AtomicUsize::new(0);
    let cb = || {
        calls.fetch_add(1, Ordering::SeqCst);
    };

    let gate = gate_with(LockupStrategy::NotAllowed);
    assert!(!gate
        .can_cashout_in_lockup(true, true, Some(&cb as &ForceCashout))
        .unwrap());

    let gate = gate_with(LockupStrategy::Allowed);
    assert!(gate
        .can_cashout_in_lockup(true, true, Some(&cb as &ForceCashout))
        .unwrap());

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
