use crate::{LockupCashoutDecision, LockupReason, LockupStrategy, TransferFlags};

/// Evaluate whether a cash-out may proceed while the device is locked up.
///
/// Pure deterministic logic; the `ForceCashout` side effect is prescribed in
/// the decision and carried out by the caller (at most once per evaluation,
/// fire-and-forget — the callback outcome is never observed, and the caller
/// is still told no cash-out happened synchronously).
pub fn evaluate_lockup_cashout(
    strategy: LockupStrategy,
    is_locked_up: bool,
    is_allowed_to_cashout: bool,
    flags: &TransferFlags,
    transaction_open: bool,
) -> LockupCashoutDecision {
    // 1) Strategy verdicts short-circuit everything else.
    match strategy {
        LockupStrategy::NotAllowed => {
            return LockupCashoutDecision {
                permitted: false,
                force_cashout: false,
                reason: LockupReason::StrategyNotAllowed,
            };
        }
        LockupStrategy::ForceCashout => {
            return LockupCashoutDecision {
                permitted: false,
                force_cashout: true,
                reason: LockupReason::StrategyForceCashout,
            };
        }
        LockupStrategy::Allowed => {}
    }

    // 2) Nothing to cash out of.
    if !is_locked_up {
        return LockupCashoutDecision {
            permitted: false,
            force_cashout: false,
            reason: LockupReason::NotLockedUp,
        };
    }

    // 3) Caller-supplied eligibility.
    if !is_allowed_to_cashout {
        return LockupCashoutDecision {
            permitted: false,
            force_cashout: false,
            reason: LockupReason::CashoutNotAllowed,
        };
    }

    // 4) Transfer-off gate (covers open transaction, active round, and
    //    unexempted immediate faults).
    if flags.transfer_off_disabled {
        return LockupCashoutDecision {
            permitted: false,
            force_cashout: false,
            reason: LockupReason::TransferOffDisabled,
        };
    }

    // 5) Open transaction checked on its own as well: the transaction source
    //    is a live read and may have opened since the flags snapshot.
    if transaction_open {
        return LockupCashoutDecision {
            permitted: false,
            force_cashout: false,
            reason: LockupReason::TransactionOpen,
        };
    }

    LockupCashoutDecision {
        permitted: true,
        force_cashout: false,
        reason: LockupReason::Permitted,
    }
}
